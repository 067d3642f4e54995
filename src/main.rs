//! jsmd — generate markdown documentation from JSDoc-annotated JavaScript.
//!
//! Parses `@`-tagged comment blocks and the declarations following them,
//! aggregates everything into one document tree, and renders that tree
//! through a declarative JSON template. The tree itself can be written as
//! JSON for downstream tooling.

mod diag;
mod model;
mod parser;
mod render;
mod tokenizer;
mod tree;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "jsmd",
    about = "Generate markdown documentation from JSDoc-annotated JavaScript files"
)]
struct Cli {
    /// Input files, directories or glob patterns. Directories are scanned
    /// (non-recursively) for .js files. Defaults to the current directory.
    inputs: Vec<String>,

    /// Output file for the rendered documentation (stdout if omitted)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write the aggregated document tree as pretty-printed JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Template file (JSON). Falls back to the built-in markdown template.
    #[arg(short = 't', long)]
    template: Option<PathBuf>,

    /// Include @private elements in the rendered output
    #[arg(long)]
    include_private: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let inputs = if cli.inputs.is_empty() {
        vec![".".to_string()]
    } else {
        cli.inputs.clone()
    };
    let files = collect_inputs(&inputs)?;

    let mut doc_tree = tree::DocTree::new();
    let mut sink = diag::ConsoleSink;
    for path in &files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut tok = tokenizer::Tokenizer::new(&filename, &content);
        parser::parse_file(&mut tok, &mut sink, &mut doc_tree);
    }
    doc_tree.finalize();
    let document = doc_tree.into_value();

    if let Some(json_path) = &cli.json {
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(json_path, json)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
    }

    let template = render::load(cli.template.as_deref())?;
    let generator = render::engine::Generator::new(&template, cli.include_private);
    let output = generator.generate(&document)?;

    match &cli.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", output),
    }

    Ok(())
}

/// Expands the input arguments into a sorted, deduplicated file list.
/// Directories are scanned non-recursively for .js files; anything else is
/// tried as a glob pattern.
fn collect_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("js") {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}
