use anyhow::{bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use kaleidoscope_rust::lexer::Scanner;
use kaleidoscope_rust::parser::Parser;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(ClapParser)]
#[command(name = "kaleidoscope")]
#[command(about = "Scanner and parser for the Kaleidoscope language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize the input file and dump one token per line
    Lex {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file path (defaults to stdout)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Parse the input file and dump the syntax tree
    Parse {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file path (defaults to stdout)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lex { file, output } => lex_file(&file, output.as_deref())?,
        Commands::Parse { file, output } => parse_file(&file, output.as_deref())?,
    }

    Ok(())
}

/// Open the destination, creating missing parent directories.
fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(path) = output else {
        return Ok(Box::new(io::stdout().lock()));
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn lex_file(path: &Path, output: Option<&Path>) -> Result<()> {
    let mut scanner = Scanner::open(path)?;
    let mut out = open_output(output)?;

    scanner
        .dump_tokens(&mut out)
        .with_context(|| format!("failed to tokenize '{}'", path.display()))?;
    out.flush()?;

    Ok(())
}

fn parse_file(path: &Path, output: Option<&Path>) -> Result<()> {
    let mut parser = Parser::open(path)?;
    let items = parser
        .parse()
        .with_context(|| format!("failed to parse '{}'", path.display()))?;

    if !parser.diagnostics().is_empty() {
        for diagnostic in parser.diagnostics() {
            eprintln!("{}: {}", path.display(), diagnostic);
        }
        bail!(
            "failed to parse '{}': {} syntax error(s)",
            path.display(),
            parser.diagnostics().len()
        );
    }

    let mut out = open_output(output)?;
    for item in &items {
        write!(out, "{item}")?;
    }
    out.flush()?;

    Ok(())
}
