use thiserror::Error;

/// Handler binding violations on a leaf command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("no handler set: {path}")]
    NoHandler { path: String },

    #[error("handler already set: {path}")]
    HandlerAlreadySet { path: String },
}

/// Tree structure violations on a sub-command group.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubError {
    #[error("sub already exists: {name}")]
    GroupExists { name: String },

    #[error("command already exists: {name}")]
    CommandExists { name: String },

    #[error("missing commands: {path}")]
    MissingCommands { path: String },
}

/// Top-level error. Parser errors from clap pass through untouched.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Sub(#[from] SubError),

    #[error(transparent)]
    Parse(#[from] clap::Error),

    #[error("config error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Renders a command path for error messages, `<root>` for the empty path.
pub(crate) fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(" ")
    }
}
