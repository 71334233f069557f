//! relsnap command-line front end
//!
//! Shared by the `relsnap` binary and its tests.

pub mod cmd;
pub mod logging;
pub mod settings;

pub use cmd::{execute, Invocation, Operation};
pub use settings::Settings;
