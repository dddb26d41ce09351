//! The c6 compiler driver.
//!
//! `c6c lex`, `c6c parse` and `c6c check` run the front end over source
//! files. The binary in `main.rs` only parses the command line and prints
//! what the functions here return.

mod commands;
mod config;
mod error;
mod logging;

pub use commands::{check_files, lex_file, load_file, parse_file, Outcome};
pub use config::{DriverConfig, THREADS_ENV};
pub use error::CliError;
pub use logging::{init_tracing, LOG_ENV};
