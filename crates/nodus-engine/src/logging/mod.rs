//! Logging utilities.
//!
//! Centralizes logger initialization over the standard `log` facade. The
//! engine itself only emits through `log`; binaries pick the backend by
//! calling [`init_logging`] (or wiring their own).

mod init;

pub use init::{LogOptions, init_logging};
