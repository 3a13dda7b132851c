//! A small logo dialect with an incremental parser.
//!
//! Source is submitted line by line. Every submission is tokenized,
//! fed token by token into the parser and each completed top-level
//! instruction is executed right away, appending to the drawing log.
//! Statements may span several submissions.

pub use action::Action;
pub use client::{Client, ClientConfig, ClientHandle, Inbox};
pub use parser::{ParseError, parse_statement, parse_tokens};
pub use state::{DrawCommand, InterpreterState, Snapshot, Turtle};
pub use store::{AppState, Store};

pub mod action;
pub mod client;
pub mod engine;
pub mod functions;
pub mod history;
pub mod lexer;
pub mod parser;
pub mod sharing;
pub mod state;
pub mod store;
pub mod tokens;

/// Things that can go wrong outside of the language itself.
///
/// Language errors never leave the interpreter; they end up in
/// [`InterpreterState::error`] instead.
#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("{0}")]
    IOError(#[from] std::io::Error),
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("unknown demo `{0}`")]
    UnknownDemo(String),
}

/// Install the global `tracing` subscriber.
///
/// The filter is read from `RUST_LOG` and defaults to `default`.
/// Output goes to stderr so it doesn't mix with drawing output.
pub fn init_tracing(default: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load a script saved with [`save`].
pub fn load(path: impl AsRef<std::path::Path>) -> Result<InterpreterState, LogoError> {
    let text = std::fs::read_to_string(path)?;
    Ok(InterpreterState::restore(serde_json::from_str(&text)?))
}

pub fn save(state: &InterpreterState, path: impl AsRef<std::path::Path>) -> Result<(), LogoError> {
    let text = serde_json::to_string_pretty(&state.snapshot())?;
    std::fs::write(path, text)?;
    Ok(())
}
