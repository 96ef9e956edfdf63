//! Formula - Command-line front end for the formula compiler
//!
//! Reads a formula document from a file (or stdin with `-`), compiles it, and
//! prints the root box with an ASCII preview of its pixels.

use anyhow::{bail, Context, Result};
use formula::{
    compile, parse, BlockFont, BlockFontConfig, FormulaError, LayoutConfig, Lexer,
};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: formula [--tokens | --ast] [--config FILE] [--cell WxH] <FILE | ->";

/// What to print for the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Render,
    Tokens,
    Ast,
}

#[derive(Debug)]
struct Options {
    mode: Mode,
    config: Option<PathBuf>,
    cell: Option<(u32, u32)>,
    input: String,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut mode = Mode::Render;
    let mut config = None;
    let mut cell = None;
    let mut input = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tokens" => mode = Mode::Tokens,
            "--ast" => mode = Mode::Ast,
            "--config" => {
                let path = args.next().context("--config needs a file")?;
                config = Some(PathBuf::from(path));
            }
            "--cell" => {
                let spec = args.next().context("--cell needs WxH")?;
                cell = Some(parse_cell(&spec)?);
            }
            "-h" | "--help" => bail!(USAGE),
            _ if input.is_none() => input = Some(arg),
            _ => bail!("unexpected argument '{}'\n{}", arg, USAGE),
        }
    }

    Ok(Options {
        mode,
        config,
        cell,
        input: input.context(USAGE)?,
    })
}

fn parse_cell(spec: &str) -> Result<(u32, u32)> {
    let (w, h) = spec
        .split_once('x')
        .with_context(|| format!("invalid cell size '{}', expected WxH", spec))?;
    Ok((
        w.parse::<u32>().with_context(|| format!("invalid cell width '{}'", w))?,
        h.parse::<u32>().with_context(|| format!("invalid cell height '{}'", h))?,
    ))
}

fn read_source(input: &str) -> Result<String> {
    if input == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        Ok(source)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read '{}'", input))
    }
}

fn run(options: Options) -> Result<()> {
    let source = read_source(&options.input)?;
    tracing::debug!(input = %options.input, bytes = source.len(), "read source");

    match options.mode {
        Mode::Tokens => {
            for token in Lexer::new(&source) {
                println!("{} | {}", token.kind, token.text.escape_debug());
            }
        }
        Mode::Ast => {
            let tree = parse(&source).map_err(FormulaError::from)?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Mode::Render => {
            let config = match &options.config {
                Some(path) => LayoutConfig::load(path)
                    .with_context(|| format!("failed to load config '{}'", path.display()))?,
                None => LayoutConfig::default(),
            };
            let font = match options.cell {
                Some((cell_width, cell_height)) => BlockFont::with_config(BlockFontConfig {
                    cell_width,
                    cell_height,
                    ..BlockFontConfig::default()
                }),
                None => BlockFont::new(),
            };

            let root = compile(&source, &font, &config)?;
            println!("{}x{}", root.width, root.height);
            if let Some(visual) = &root.visual {
                print!("{}", visual.to_ascii());
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
