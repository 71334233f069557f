//! Common utilities for integration tests

#![allow(dead_code)]

pub mod cli;
pub mod fake_zfs;

#[allow(unused_imports)]
pub use cli::{CommandResult, RelsnapCommand};
pub use fake_zfs::FakeZfs;
