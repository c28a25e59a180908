//! Spawn an interactive shell set up for a go workspace.
//!
//! The crate turns directory fragments from the command line into a [`Workspace`]
//! (working directory, `GOPATH`, `GOBIN` and `PATH`), picks a [`Shell`] binary and
//! launches it with the composed environment.
//!
//! Resolution reads everything from an [`env::Environment`] snapshot, so the same
//! code paths can be driven by fabricated environments in tests.

pub mod app;
pub mod cli;
pub mod env;
pub mod error;
pub mod logging;
pub mod path;
pub mod shell;
pub mod spaces;
pub mod workspace;

pub use error::ResolveError;
pub use shell::Shell;
pub use workspace::Workspace;
