//! Leaf commands and handler binding.

use clap::Command as Parser;
use tracing::{debug, instrument};

use crate::dispatch::Handler;
use crate::errors::{display_path, CommandError, Result};
use crate::node::Node;
use crate::values::Values;

/// A leaf of the command tree. Must be bound to exactly one handler.
pub struct Command<T> {
    parser: Parser,
    path: Vec<String>,
    handler: Option<Handler<T>>,
}

impl<T: 'static> Command<T> {
    pub(crate) fn new(path: Vec<String>, parser: Parser) -> Self {
        Self {
            parser,
            path,
            handler: None,
        }
    }

    /// Bind the handler invoked with the parsed values.
    pub fn handler<F>(&mut self, func: F) -> std::result::Result<&mut Self, CommandError>
    where
        F: Fn(&Values) -> T + 'static,
    {
        self.bind(Handler::new(move |values: &Values, _: &[String]| func(values)))
    }

    /// Bind a handler that also receives the tokens left over by `run_known`.
    pub fn handler_known<F>(&mut self, func: F) -> std::result::Result<&mut Self, CommandError>
    where
        F: Fn(&Values, &[String]) -> T + 'static,
    {
        self.bind(Handler::new(func))
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    #[instrument(level = "debug", skip_all, fields(path = %display_path(&self.path)))]
    fn bind(&mut self, handler: Handler<T>) -> std::result::Result<&mut Self, CommandError> {
        if self.handler.is_some() {
            return Err(CommandError::HandlerAlreadySet {
                path: display_path(&self.path),
            });
        }
        self.handler = Some(handler);
        debug!("handler bound");
        Ok(self)
    }

    /// Splits a validated command into its sub-parser and handler.
    pub(crate) fn into_parts(self) -> Result<(Parser, Handler<T>)> {
        let handler = self.handler.ok_or_else(|| CommandError::NoHandler {
            path: display_path(&self.path),
        })?;
        Ok((self.parser, handler))
    }
}

impl<T: 'static> Node for Command<T> {
    fn parser_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }

    fn path(&self) -> &[String] {
        &self.path
    }

    fn validate(&self) -> Result<()> {
        if self.handler.is_none() {
            return Err(CommandError::NoHandler {
                path: display_path(&self.path),
            }
            .into());
        }
        Ok(())
    }
}
