//! Tessel CLI library.
//!
//! Configuration loading and the commands behind the `tessel` binary.

pub mod commands;
pub mod config;
