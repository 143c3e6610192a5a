//! Sub-command groups: uniquely named children and completeness.

use std::collections::HashSet;

use clap::Command as Parser;
use tracing::{debug, instrument};

use crate::command::Command;
use crate::dispatch::Dispatcher;
use crate::errors::{display_path, Result, SubError};
use crate::node::{construct, Node};

/// An interior node owning uniquely named child groups and commands.
///
/// Children are committed only after their construction scope closed and they
/// validated. A failed child leaves no trace: its name stays free and it does
/// not count towards this group's children.
#[derive(Debug)]
pub struct Group<T> {
    parser: Parser,
    path: Vec<String>,
    groups: HashSet<String>,
    commands: HashSet<String>,
    dispatcher: Dispatcher<T>,
}

impl<T: 'static> Group<T> {
    pub(crate) fn new(path: Vec<String>, parser: Parser) -> Self {
        Self {
            parser,
            path,
            groups: HashSet::new(),
            commands: HashSet::new(),
            dispatcher: Dispatcher::default(),
        }
    }

    /// Add a sub-command group named `name`, populated by `build`.
    #[instrument(level = "debug", skip(self, build), fields(parent = %display_path(&self.path)))]
    pub fn group<F>(&mut self, name: &str, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Group<T>) -> Result<()>,
    {
        self.ensure_available(name)?;
        let child = construct(Group::new(self.child_path(name), Parser::new(name.to_string())), build)?;

        self.groups.insert(name.to_string());
        self.dispatcher.absorb(child.dispatcher);
        self.attach(child.parser.subcommand_required(true));
        debug!(name, "group committed");
        Ok(self)
    }

    /// Add a command named `name`, populated by `build`.
    #[instrument(level = "debug", skip(self, build), fields(parent = %display_path(&self.path)))]
    pub fn command<F>(&mut self, name: &str, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Command<T>) -> Result<()>,
    {
        self.ensure_available(name)?;
        let path = self.child_path(name);
        let child = construct(Command::new(path.clone(), Parser::new(name.to_string())), build)?;
        let (parser, handler) = child.into_parts()?;

        self.commands.insert(name.to_string());
        self.dispatcher.insert(path, handler);
        self.attach(parser);
        debug!(name, "command committed");
        Ok(self)
    }

    /// Names of the direct child groups.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    /// Names of the direct child commands.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.commands.is_empty()
    }

    pub(crate) fn parser(&self) -> &Parser {
        &self.parser
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    fn ensure_available(&self, name: &str) -> std::result::Result<(), SubError> {
        if self.groups.contains(name) {
            return Err(SubError::GroupExists {
                name: name.to_string(),
            });
        }
        if self.commands.contains(name) {
            return Err(SubError::CommandExists {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn child_path(&self, name: &str) -> Vec<String> {
        let mut path = self.path.clone();
        path.push(name.to_string());
        path
    }

    fn attach(&mut self, child: Parser) {
        self.parser = std::mem::take(&mut self.parser).subcommand(child);
    }
}

impl<T: 'static> Node for Group<T> {
    fn parser_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }

    fn path(&self) -> &[String] {
        &self.path
    }

    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(SubError::MissingCommands {
                path: display_path(&self.path),
            }
            .into());
        }
        Ok(())
    }
}
