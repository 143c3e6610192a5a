//! The parsed-value bag handed to handlers.

use std::any::Any;

use clap::parser::{MatchesError, ValuesRef};
use clap::ArgMatches;

/// Parsed values of one invocation.
///
/// Keeps the matches of every level along the resolved path. Lookups start at
/// the leaf and walk towards the root, so a handler sees the arguments of its
/// own command as well as those declared by enclosing groups and the app.
#[derive(Debug, Clone)]
pub struct Values {
    path: Vec<String>,
    levels: Vec<ArgMatches>,
}

impl Values {
    pub(crate) fn new(path: Vec<String>, levels: Vec<ArgMatches>) -> Self {
        Self { path, levels }
    }

    /// Command names of the resolved leaf.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Matches of the resolved leaf command.
    pub fn leaf(&self) -> &ArgMatches {
        // split_levels always pushes the final level
        &self.levels[self.levels.len() - 1]
    }

    /// Matches of every level, root first.
    pub fn levels(&self) -> &[ArgMatches] {
        &self.levels
    }

    /// Nearest value for `id`.
    ///
    /// `Ok(None)` if some level declares `id` but none holds a value.
    pub fn try_get_one<T: Any + Clone + Send + Sync + 'static>(
        &self,
        id: &str,
    ) -> Result<Option<&T>, MatchesError> {
        let mut unknown = None;
        let mut declared = false;
        for level in self.levels.iter().rev() {
            match level.try_get_one::<T>(id) {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => declared = true,
                Err(e @ MatchesError::UnknownArgument { .. }) => unknown = Some(e),
                Err(e) => return Err(e),
            }
        }
        match unknown {
            Some(e) if !declared => Err(e),
            _ => Ok(None),
        }
    }

    /// Nearest value for `id`.
    ///
    /// # Panics
    /// If `id` is declared nowhere along the path or `T` mismatches its value parser,
    /// like [`ArgMatches::get_one`].
    pub fn get_one<T: Any + Clone + Send + Sync + 'static>(&self, id: &str) -> Option<&T> {
        self.try_get_one(id)
            .unwrap_or_else(|e| panic!("Mismatch between definition and access of `{id}`. {e}"))
    }

    /// Nearest set of values for `id`.
    pub fn try_get_many<T: Any + Clone + Send + Sync + 'static>(
        &self,
        id: &str,
    ) -> Result<Option<ValuesRef<'_, T>>, MatchesError> {
        let mut unknown = None;
        let mut declared = false;
        for level in self.levels.iter().rev() {
            match level.try_get_many::<T>(id) {
                Ok(Some(values)) => return Ok(Some(values)),
                Ok(None) => declared = true,
                Err(e @ MatchesError::UnknownArgument { .. }) => unknown = Some(e),
                Err(e) => return Err(e),
            }
        }
        match unknown {
            Some(e) if !declared => Err(e),
            _ => Ok(None),
        }
    }

    /// Nearest set of values for `id`. Panics like [`Values::get_one`].
    pub fn get_many<T: Any + Clone + Send + Sync + 'static>(
        &self,
        id: &str,
    ) -> Option<ValuesRef<'_, T>> {
        self.try_get_many(id)
            .unwrap_or_else(|e| panic!("Mismatch between definition and access of `{id}`. {e}"))
    }

    /// State of a flag declared with `ArgAction::SetTrue` or `SetFalse`.
    pub fn get_flag(&self, id: &str) -> bool {
        self.get_one::<bool>(id).copied().unwrap_or(false)
    }

    /// True if any level holds a value for `id`, defaults included.
    pub fn contains_id(&self, id: &str) -> bool {
        self.levels
            .iter()
            .any(|level| level.try_contains_id(id).unwrap_or(false))
    }
}
