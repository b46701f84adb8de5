//! Request parsing.
use crate::protocol::hash::djb2;
use crate::robot::config::MAX_ARGS;
use heapless::Vec;

/// A parsed command line, alive only for the duration of one dispatch.
#[derive(Debug)]
pub struct Request<'a> {
    pub token: &'a str,
    pub hash: u32,
    pub args: Vec<i32, MAX_ARGS>,
}

impl<'a> Request<'a> {
    /// Splits a line on commas into a command token and signed integer
    /// arguments. Tokens that fail to parse become 0; arguments past
    /// [`MAX_ARGS`] are silently dropped.
    pub fn parse(line: &'a str) -> Self {
        let mut parts = line.trim().split(',');
        let token = parts.next().unwrap_or("").trim();

        let mut args = Vec::new();
        for part in parts {
            if args.push(part.trim().parse::<i32>().unwrap_or(0)).is_err() {
                break;
            }
        }

        Self {
            token,
            hash: djb2(token),
            args,
        }
    }
}
