//! Command implementations.
//!
//! Commands never print. They return an [`Outcome`] holding the text for
//! stdout and the rendered diagnostics for stderr, and `main` decides what to
//! do with them.

use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use c6_diagnostic::Diagnostic;
use c6_ir::{dump_tree, DebugIds, FileEntry, SharedFiles};
use c6_lexer::tokenize;
use rayon::prelude::*;
use tracing::{debug, info_span};

use crate::{CliError, DriverConfig};

/// Result of one command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    /// Rendered diagnostics, one per failed file.
    pub errors: Vec<String>,
}

impl Outcome {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Read `path` and register it in the file table.
pub fn load_file(files: &SharedFiles, path: &str) -> Result<FileEntry, CliError> {
    let content: Arc<str> = std::fs::read_to_string(path)
        .map_err(|source| CliError::Read {
            path: path.to_owned(),
            source,
        })?
        .into();
    let absolute_path =
        std::fs::canonicalize(path).unwrap_or_else(|_| Path::new(path).to_path_buf());
    let index = files.add(path, &absolute_path, Arc::clone(&content));
    Ok(FileEntry {
        index,
        relative_path: path.to_owned(),
        absolute_path,
        content,
    })
}

fn render(diagnostic: &Diagnostic, file: &FileEntry) -> String {
    diagnostic.render(&file.relative_path, &file.content)
}

/// `c6c lex`: one line per token.
pub fn lex_file(files: &SharedFiles, path: &str) -> Result<Outcome, CliError> {
    let file = load_file(files, path)?;
    let mut outcome = Outcome::default();
    match tokenize(&file.content) {
        Ok(tokens) => {
            let _ = writeln!(outcome.output, "Tokens for '{path}' ({} tokens):", tokens.len());
            for token in tokens {
                let _ = writeln!(
                    outcome.output,
                    "  {token:?}  {:?}",
                    token.text(&file.content)
                );
            }
        }
        Err(err) => outcome
            .errors
            .push(render(&err.to_diagnostic(file.index), &file)),
    }
    Ok(outcome)
}

/// `c6c parse`: the AST as an indented tree.
pub fn parse_file(files: &SharedFiles, path: &str) -> Result<Outcome, CliError> {
    let file = load_file(files, path)?;
    let mut outcome = Outcome::default();
    match c6_parse::parse_file(&file.content, file.index, DebugIds::new()) {
        Ok(parsed) => {
            let _ = writeln!(outcome.output, "AST for '{path}' ({} nodes):", parsed.pool.len());
            outcome.output.push_str(&dump_tree(&parsed.pool, parsed.root, &file.content));
        }
        Err(err) => outcome
            .errors
            .push(render(&err.to_diagnostic(file.index), &file)),
    }
    Ok(outcome)
}

/// `c6c check`: parse every file on the worker pool and collect the
/// diagnostics in command-line order.
pub fn check_files(
    files: &SharedFiles,
    paths: &[String],
    config: &DriverConfig,
) -> Result<Outcome, CliError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .thread_name(|i| format!("c6-worker-{i}"))
        .build()?;
    debug!(workers = pool.current_num_threads(), files = paths.len(), "checking");

    let ids = DebugIds::new();
    let results: Vec<Result<Option<String>, CliError>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| check_one(files, &ids, path))
            .collect()
    });

    let mut outcome = Outcome::default();
    let mut checked = 0usize;
    for result in results {
        if let Some(rendered) = result? {
            outcome.errors.push(rendered);
        }
        checked += 1;
    }
    let _ = writeln!(
        outcome.output,
        "checked {checked} file{}: {} failed",
        if checked == 1 { "" } else { "s" },
        outcome.errors.len()
    );
    Ok(outcome)
}

fn check_one(files: &SharedFiles, ids: &DebugIds, path: &str) -> Result<Option<String>, CliError> {
    let _span = info_span!("check", path).entered();
    let file = load_file(files, path)?;
    match c6_parse::parse_file(&file.content, file.index, ids.clone()) {
        Ok(parsed) => {
            debug!(nodes = parsed.pool.len(), "ok");
            Ok(None)
        }
        Err(err) => {
            debug!(offset = err.offset(), code = %err.code, "failed");
            Ok(Some(render(&err.to_diagnostic(file.index), &file)))
        }
    }
}
