//! Shared behaviour of tree elements: argument forwarding and scoped construction.

use clap::{Arg, Command as Parser};
use tracing::{debug, instrument};

use crate::errors::Result;

/// Capability shared by every element of a command tree.
///
/// A node owns its `clap::Command` sub-parser. Arguments declared on the node
/// are forwarded to that parser unchanged.
pub trait Node {
    /// Sub-parser owned by this node.
    fn parser_mut(&mut self) -> &mut Parser;

    /// Command names from the root down to this node.
    fn path(&self) -> &[String];

    /// Structural check run once, when the construction scope closes successfully.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Declare an argument on this node's sub-parser.
    fn arg(&mut self, arg: impl Into<Arg>) -> &mut Self
    where
        Self: Sized,
    {
        let parser = self.parser_mut();
        *parser = std::mem::take(parser).arg(arg);
        self
    }

    /// Apply parser options (about, aliases, ...) to this node's sub-parser.
    fn configure(&mut self, f: impl FnOnce(Parser) -> Parser) -> &mut Self
    where
        Self: Sized,
    {
        let parser = self.parser_mut();
        *parser = f(std::mem::take(parser));
        self
    }
}

/// Runs a construction scope for `node`.
///
/// Validation happens only if `build` returns `Ok`. A failed scope already
/// carries its error, which is returned without validating.
#[instrument(level = "debug", skip(node, build), fields(path = ?node.path()))]
pub(crate) fn construct<N, F>(mut node: N, build: F) -> Result<N>
where
    N: Node,
    F: FnOnce(&mut N) -> Result<()>,
{
    build(&mut node)?;
    node.validate()?;
    debug!("validated");
    Ok(node)
}
