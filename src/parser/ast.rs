use crate::lexer::{NumberLiteral, Position};
use crate::parser::ParserError;
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    LessThan,
}

/// Spelling and binding strength of every binary operator; higher binds
/// tighter.
const BINARY_OPERATORS: [(&str, BinaryOp, i32); 5] = [
    ("<", BinaryOp::LessThan, 10),
    ("+", BinaryOp::Add, 20),
    ("-", BinaryOp::Sub, 20),
    ("*", BinaryOp::Mul, 40),
    ("/", BinaryOp::Div, 40),
];

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        BINARY_OPERATORS
            .iter()
            .find(|(text, _, _)| *text == symbol)
            .map(|&(_, op, _)| op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::LessThan => "<",
        }
    }

    pub fn precedence(self) -> i32 {
        BINARY_OPERATORS
            .iter()
            .find(|&&(_, op, _)| op == self)
            .map_or(-1, |&(_, _, prec)| prec)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Expression variants
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        callee: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Build a binary node from the operator's spelling.
    pub fn binary(symbol: &str, lhs: Expr, rhs: Expr, pos: Position) -> Result<Self, ParserError> {
        let op = BinaryOp::from_symbol(symbol)
            .ok_or_else(|| ParserError::UnknownOperator(symbol.to_string(), pos))?;
        Ok(Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }
}

/// Function prototype: name plus positional parameter names
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
}

impl Prototype {
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// The nameless, parameterless prototype given to top-level expressions
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

/// Function definition
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub proto: Prototype,
    pub body: Expr,
}

/// A top-level form: a definition, a top-level expression wrapped as an
/// anonymous function, or an extern declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(Function),
    Prototype(Prototype),
}

/// Borrowed view over any syntax tree node, used by [`dump`].
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Expr(&'a Expr),
    Prototype(&'a Prototype),
    Function(&'a Function),
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        Node::Expr(expr)
    }
}

impl<'a> From<&'a Prototype> for Node<'a> {
    fn from(proto: &'a Prototype) -> Self {
        Node::Prototype(proto)
    }
}

impl<'a> From<&'a Function> for Node<'a> {
    fn from(func: &'a Function) -> Self {
        Node::Function(func)
    }
}

impl<'a> From<&'a Item> for Node<'a> {
    fn from(item: &'a Item) -> Self {
        match item {
            Item::Function(func) => Node::Function(func),
            Item::Prototype(proto) => Node::Prototype(proto),
        }
    }
}

/// Write the readable form of `node`.
pub fn dump<'a>(node: impl Into<Node<'a>>, out: &mut dyn fmt::Write) -> fmt::Result {
    match node.into() {
        Node::Expr(Expr::Number(value)) => write!(out, "{}", NumberLiteral(*value)),
        Node::Expr(Expr::Variable(name)) => write!(out, "%{name}"),
        Node::Expr(Expr::Binary { op, lhs, rhs }) => {
            out.write_char('(')?;
            dump(&**lhs, out)?;
            write!(out, ") {op} (")?;
            dump(&**rhs, out)?;
            out.write_char(')')
        }
        Node::Expr(Expr::Call { callee, args }) => {
            write!(out, "{callee}(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                dump(arg, out)?;
            }
            out.write_char(')')
        }
        Node::Prototype(proto) => writeln!(out, "{}({})", proto.name, proto.params.join(", ")),
        Node::Function(func) => {
            dump(&func.proto, out)?;
            out.write_str("{\n")?;
            dump(&func.body, out)?;
            out.write_str("\n}\n")
        }
    }
}

macro_rules! display_via_dump {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    dump(self, f)
                }
            }
        )*
    };
}

display_via_dump!(Expr, Prototype, Function, Item);
