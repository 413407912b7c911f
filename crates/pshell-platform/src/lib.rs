//! Platform helpers for PShell.
//!
//! Currently just time: turning the Unix modification times reported by the
//! filesystem into the local-time stamps printed by `info`.

pub mod time;

pub use time::Timestamp;
