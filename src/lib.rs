//! Declare trees of commands and sub-command groups on top of `clap`.
//!
//! Every node is populated inside a construction closure. When the closure
//! returns `Ok` the node validates itself before its parent commits it:
//! a command needs exactly one handler, a group at least one child, and names
//! are unique among the direct children of a group. Token parsing, type
//! conversion and help rendering stay with clap.

pub mod app;
pub mod command;
pub mod config;
mod dispatch;
pub mod errors;
pub mod group;
pub mod node;
pub mod util;
pub mod values;

pub use app::App;
pub use command::Command;
pub use config::Settings;
pub use dispatch::Handler;
pub use errors::{CommandError, Error, Result, SubError};
pub use group::Group;
pub use node::Node;
pub use values::Values;
