//! Line protocol: hashing, parsing and dispatch.
//!
//! A command line is comma-delimited, case-insensitive in its command
//! token and newline-terminated:
//!
//! ```text
//! <command>[,<arg1>[,<arg2>[...]]]\n
//! ```
//!
//! - [`hash`] implements the fixed-seed dispatch hash.
//! - [`request`] splits a line into a token and integer arguments.
//! - [`commands`] holds the static command table.
//! - [`dispatch`] resolves and executes a request against the arm.
//!
//! Malformed input never raises: it degrades into diagnostic response
//! text, and every dispatched line produces exactly one response.
pub mod commands;
pub mod dispatch;
pub mod hash;
pub mod request;

use crate::robot::config::{LINE_MAX_LEN, RESPONSE_MAX_LEN};

/// One received command line, complete and newline-stripped.
pub type Line = heapless::String<LINE_MAX_LEN>;

/// The human-readable reply to one dispatched line.
pub type Response = heapless::String<RESPONSE_MAX_LEN>;
