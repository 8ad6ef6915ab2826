use crate::lexer::Keyword;
use crate::parser::expressions::Parser;
use crate::parser::{Function, Item, ParserError, Prototype};
use log::debug;
use std::io::{Read, Seek};

impl<R: Read + Seek> Parser<R> {
    /// Parse the whole source from its first character.
    ///
    /// A syntax error is reported once, one token is skipped and parsing
    /// resumes with the next top-level form. If any form failed the result is
    /// empty; the errors are available from [`Parser::diagnostics`]. Lexical
    /// errors abort the parse.
    pub fn parse(&mut self) -> Result<Vec<Item>, ParserError> {
        self.diagnostics.clear();
        self.scanner_mut().reset()?;
        self.advance()?;

        let mut items = Vec::new();
        loop {
            let token = self.current();
            let result = if token.is_eof() {
                break;
            } else if token.is_punct(";") {
                // Top-level semicolons are ignored.
                self.advance()?;
                continue;
            } else if token.is_keyword(Keyword::Def) {
                self.parse_definition().map(Item::Function)
            } else if token.is_keyword(Keyword::Extern) {
                self.parse_extern().map(Item::Prototype)
            } else {
                self.parse_top_level_expr().map(Item::Function)
            };

            match result {
                Ok(item) => items.push(item),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    self.report(err);
                    self.advance()?;
                }
            }
        }

        if self.diagnostics.is_empty() {
            debug!("parsed {} top-level items", items.len());
            Ok(items)
        } else {
            Ok(Vec::new())
        }
    }

    fn report(&mut self, err: ParserError) {
        debug!(
            "in source file: {}, error message: {}",
            self.scanner().source().name(),
            err
        );
        self.diagnostics.push(err);
    }

    /// definition ::= 'def' prototype expression
    fn parse_definition(&mut self) -> Result<Function, ParserError> {
        debug_assert!(self.current().is_keyword(Keyword::Def));
        self.advance()?;

        let proto = self.parse_prototype()?;
        let body = self.parse_expression()?;
        Ok(Function { proto, body })
    }

    /// external ::= 'extern' prototype
    fn parse_extern(&mut self) -> Result<Prototype, ParserError> {
        debug_assert!(self.current().is_keyword(Keyword::Extern));
        self.advance()?;

        self.parse_prototype()
    }

    /// prototype ::= identifier '(' identifier* ')'
    fn parse_prototype(&mut self) -> Result<Prototype, ParserError> {
        let name = match self.current().identifier() {
            Some(name) => name.to_string(),
            None => return Err(self.unexpected("function name in prototype")),
        };
        self.advance()?;

        self.expect_punct("(", "in prototype")?;
        self.advance()?;

        let mut params = Vec::new();
        while let Some(param) = self.current().identifier() {
            params.push(param.to_string());
            self.advance()?;
        }

        self.expect_punct(")", "in prototype")?;
        self.advance()?;

        Ok(Prototype::new(name, params))
    }

    /// toplevelexpr ::= expression
    fn parse_top_level_expr(&mut self) -> Result<Function, ParserError> {
        let body = self.parse_expression()?;
        Ok(Function {
            proto: Prototype::anonymous(),
            body,
        })
    }
}
