//! Core library for the `reprise` CLI.
//!
//! Recording stamps browser captures against a session clock and persists
//! them as a JSON action log. Replay loads such a log and re-emits every
//! action on its original timeline, with pause, seek, speed and loop
//! controls. The `reprise` binary wires both sides to stdin and stdout.
pub mod domain;
pub mod error;
pub mod record;
pub mod replay;
pub mod shutdown;

#[cfg(test)]
mod test_support;
