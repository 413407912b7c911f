//! Foundation types for PShell.
//!
//! This crate contains the types shared by every PShell crate: the closed
//! error taxonomy and the shell configuration defaults.

pub mod config;
pub mod error;
