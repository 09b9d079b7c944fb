//! User-facing message catalogue.
//!
//! Every string the CLI prints lives in [`Message`]; the `msg_*` macros in
//! [`macros`] route it either to the console or to `tracing` depending on
//! whether debug mode is enabled.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
