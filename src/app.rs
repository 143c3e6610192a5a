//! The root of a command tree and its run cycle.

use std::ffi::{OsStr, OsString};

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, Command as Parser};
use tracing::{debug, instrument, trace};

use crate::command::Command;
use crate::config::Settings;
use crate::dispatch::Handler;
use crate::errors::Result;
use crate::group::Group;
use crate::node::Node;
use crate::values::Values;

/// A command-line application: the root group plus resolve-and-invoke.
///
/// Token sequences passed to [`App::parse`] and friends exclude the program
/// name, typically `std::env::args_os().skip(1)`.
///
/// ```
/// use argtree::{App, Node};
/// use clap::{value_parser, Arg};
///
/// let mut app: App<i64> = App::new("calc");
/// app.command("double", |c| {
///     c.arg(Arg::new("n").required(true).value_parser(value_parser!(i64)))
///         .handler(|v| v.get_one::<i64>("n").copied().unwrap_or_default() * 2)?;
///     Ok(())
/// })?;
///
/// assert_eq!(app.run(["double", "21"])?, 42);
/// # Ok::<(), argtree::Error>(())
/// ```
pub struct App<T = ()> {
    root: Group<T>,
}

impl<T: 'static> App<T> {
    /// New application with a root parser named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parser(Parser::new(name.into()))
    }

    /// New application around a preconfigured root parser.
    ///
    /// The parser's settings are passed through untouched, except that it never
    /// expects a binary name in the token sequence.
    pub fn from_parser(parser: Parser) -> Self {
        Self {
            root: Group::new(Vec::new(), parser.no_binary_name(true)),
        }
    }

    /// New application configured from layered [`Settings`].
    pub fn from_settings(settings: &Settings) -> Self {
        Self::from_parser(settings.to_parser())
    }

    /// Declare an argument on the root parser.
    pub fn arg(&mut self, arg: impl Into<Arg>) -> &mut Self {
        self.root.arg(arg);
        self
    }

    /// Apply parser options to the root parser.
    pub fn configure(&mut self, f: impl FnOnce(Parser) -> Parser) -> &mut Self {
        self.root.configure(f);
        self
    }

    /// Add a top-level sub-command group.
    pub fn group<F>(&mut self, name: &str, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Group<T>) -> Result<()>,
    {
        self.root.group(name, build)?;
        Ok(self)
    }

    /// Add a top-level command.
    pub fn command<F>(&mut self, name: &str, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Command<T>) -> Result<()>,
    {
        self.root.command(name, build)?;
        Ok(self)
    }

    /// Checks that the application has at least one command or group.
    pub fn validate(&self) -> Result<()> {
        self.root.validate()
    }

    /// The assembled root parser, e.g. for rendering help.
    pub fn parser(&self) -> Parser {
        let parser = self.root.parser().clone();
        if self.root.is_empty() {
            parser
        } else {
            parser.subcommand_required(true)
        }
    }

    /// Resolve `tokens` to a handler and its parsed values.
    ///
    /// Tokens the resolved command does not declare are an error.
    #[instrument(level = "debug", skip_all)]
    pub fn parse<I, S>(&self, tokens: I) -> Result<(Handler<T>, Values)>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        debug!(commands = self.root.dispatcher().len(), "resolving");
        let matches = self.parser().try_get_matches_from(tokens)?;
        self.root.dispatcher().resolve(matches)
    }

    /// Like [`App::parse`], but returns undeclared tokens instead of failing.
    ///
    /// Every token the parser rejects as an unknown argument is set aside in
    /// order of appearance and parsing resumes with the rest, so declared
    /// arguments after an unknown token still reach the value bag.
    #[instrument(level = "debug", skip_all)]
    pub fn parse_known<I, S>(&self, tokens: I) -> Result<(Handler<T>, Values, Vec<String>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        debug!(commands = self.root.dispatcher().len(), "resolving leniently");
        let mut parser = self.parser();
        let mut remaining: Vec<OsString> = tokens.into_iter().map(Into::into).collect();
        let mut leftovers = Vec::new();
        loop {
            match parser.try_get_matches_from_mut(&remaining) {
                Ok(matches) => {
                    let (handler, values) = self.root.dispatcher().resolve(matches)?;
                    debug!(leftovers = ?leftovers, "resolved leniently");
                    return Ok((handler, values, leftovers));
                }
                Err(e) => {
                    let index = unknown_position(&mut parser, &remaining, &e).ok_or(e)?;
                    let token = remaining.remove(index);
                    trace!(index, token = ?token, "set aside");
                    leftovers.push(token.to_string_lossy().into_owned());
                }
            }
        }
    }

    /// Parse `tokens` and invoke the resolved handler.
    pub fn run<I, S>(&self, tokens: I) -> Result<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let (handler, values) = self.parse(tokens)?;
        Ok(handler.call(&values, &[]))
    }

    /// Parse `tokens` leniently and invoke the resolved handler with the leftovers.
    pub fn run_known<I, S>(&self, tokens: I) -> Result<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let (handler, values, leftovers) = self.parse_known(tokens)?;
        Ok(handler.call(&values, &leftovers))
    }
}

/// The argument an `UnknownArgument` error reports, e.g. `--bogus` or `extra`.
fn unknown_argument(err: &clap::Error) -> Option<&str> {
    if err.kind() != ErrorKind::UnknownArgument {
        return None;
    }
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => Some(arg.as_str()),
        _ => None,
    }
}

/// True if `token` is the command-line form of the reported argument.
///
/// Long options are reported without an attached `=value`.
fn spells(token: &OsStr, reported: &str) -> bool {
    token.to_str().is_some_and(|token| {
        token == reported
            || token
                .strip_prefix(reported)
                .is_some_and(|rest| rest.starts_with('=') && reported.starts_with("--"))
    })
}

/// Index of the token `err` rejects as unknown.
///
/// The same text may occur earlier as a command name or an option value.
/// Parsing is left to right, so the rejected occurrence is the first one whose
/// prefix of `tokens` already fails on it.
fn unknown_position(parser: &mut Parser, tokens: &[OsString], err: &clap::Error) -> Option<usize> {
    let reported = unknown_argument(err)?;
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| spells(token, reported))
        .map(|(index, _)| index)
        .find(|&index| match parser.try_get_matches_from_mut(&tokens[..=index]) {
            Err(e) => unknown_argument(&e) == Some(reported),
            Ok(_) => false,
        })
}
