//! `weft-hyphen`: the hyphenator filter — reads a WEFT container on stdin,
//! hyphenates every linguistic content word, and writes the resulting WEFT
//! to stdout (spec 6, "hyphenator" `-load`/`-style`/`-special`/`-list`).

use clap::Parser;
use std::collections::HashMap;
use std::fs::File;
use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use weft_core::error::WeftError;
use weft_core::hyphenator::{load_word_list, write_word_list, Hyphenator, PatternStyle, TexPatterns};
use weft_core::reader::WeftReader;
use weft_core::writer::WeftWriter;
use weft_core::WeftResult;

#[derive(Parser)]
#[command(about = "Hyphenate every linguistic content word of a WEFT")]
struct Args {
    /// TeX pattern file.
    #[arg(long)]
    load: Option<PathBuf>,

    /// Encoding style for the TeX pattern file (default from configuration).
    #[arg(long)]
    style: Option<String>,

    /// Specialized word list overriding pattern-derived hyphenation.
    #[arg(long)]
    special: Option<PathBuf>,

    /// Write the sorted cache as a word list to this path.
    #[arg(long)]
    list: Option<PathBuf>,

    /// Layer a TOML file over the embedded configuration defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: &Args) -> WeftResult<()> {
    let config =
        weft_cli::load_config(args.config.as_deref()).map_err(WeftError::Arg)?;
    let style_name = args.style.as_deref().unwrap_or(&config.hyphenation.default_style);
    let style = PatternStyle::parse(style_name)?;

    let patterns = match &args.load {
        Some(path) => {
            let file = File::open(path).map_err(|_| WeftError::TableMissing(path.display().to_string()))?;
            Some(Box::new(TexPatterns::load(file, style)?) as Box<dyn weft_core::hyphenator::HyphenPatterns>)
        }
        None => None,
    };

    let specialized: HashMap<String, String> = match &args.special {
        Some(path) => {
            let file = File::open(path).map_err(|_| WeftError::TableMissing(path.display().to_string()))?;
            load_word_list(file)?
        }
        None => HashMap::new(),
    };

    let mut hyphenator = Hyphenator::new(specialized, patterns);

    let mut reader = WeftReader::new(stdin().lock())?;
    let mut writer = WeftWriter::new()?;
    while let Some(tuple) = reader.read_line()? {
        let mut out = Vec::with_capacity(tuple.len());
        for (i, element) in tuple.into_iter().enumerate() {
            if i % 2 == 1 {
                out.push(hyphenator.hyphenate(&element)?);
            } else {
                out.push(element);
            }
        }
        writer.write_line(&out)?;
    }
    writer.close(stdout().lock())?;

    if let Some(path) = &args.list {
        let out_file = File::create(path)?;
        write_word_list(&hyphenator.export_word_list(), out_file)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => weft_cli::die(e),
    }
}
