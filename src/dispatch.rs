//! Maps resolved command paths to handlers.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use clap::error::ErrorKind;
use clap::ArgMatches;
use tracing::{debug, instrument, trace};

use crate::errors::{display_path, Result};
use crate::values::Values;

/// Callable bound to a leaf command.
///
/// Cloning is cheap; clones refer to the same function.
pub struct Handler<T> {
    func: Rc<dyn Fn(&Values, &[String]) -> T>,
}

impl<T: 'static> Handler<T> {
    pub(crate) fn new(func: impl Fn(&Values, &[String]) -> T + 'static) -> Self {
        Self {
            func: Rc::new(func),
        }
    }
}

impl<T> Handler<T> {
    /// Invoke the handler with parsed values and leftover tokens.
    pub fn call(&self, values: &Values, leftovers: &[String]) -> T {
        (self.func)(values, leftovers)
    }

    /// True when both handles refer to the same bound function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Self {
            func: Rc::clone(&self.func),
        }
    }
}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("func", &Rc::as_ptr(&self.func))
            .finish()
    }
}

/// Leaf path to handler table, filled as commands are committed.
#[derive(Debug)]
pub(crate) struct Dispatcher<T> {
    handlers: HashMap<Vec<String>, Handler<T>>,
}

impl<T> Default for Dispatcher<T> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<T> Dispatcher<T> {
    pub(crate) fn insert(&mut self, path: Vec<String>, handler: Handler<T>) {
        trace!(path = %display_path(&path), "registering handler");
        self.handlers.insert(path, handler);
    }

    /// Takes over every entry of a committed child group.
    pub(crate) fn absorb(&mut self, child: Dispatcher<T>) {
        self.handlers.extend(child.handlers);
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Finds the handler for a fully parsed invocation.
    ///
    #[instrument(level = "debug", skip_all)]
    pub(crate) fn resolve(&self, matches: ArgMatches) -> Result<(Handler<T>, Values)> {
        let (path, levels) = split_levels(matches);

        let handler = self.handlers.get(&path).cloned().ok_or_else(|| {
            clap::Error::raw(
                ErrorKind::MissingSubcommand,
                format!("'{}' requires a subcommand but one was not provided\n", display_path(&path)),
            )
        })?;
        debug!(path = %display_path(&path), "resolved");

        Ok((handler, Values::new(path, levels)))
    }
}

/// Walks the matches down the chosen subcommands.
///
/// Returns the command path and the matches of every level, root first.
fn split_levels(mut matches: ArgMatches) -> (Vec<String>, Vec<ArgMatches>) {
    let mut path = Vec::new();
    let mut levels = Vec::new();
    while let Some((name, sub)) = matches.remove_subcommand() {
        path.push(name);
        levels.push(matches);
        matches = sub;
    }
    levels.push(matches);
    (path, levels)
}
