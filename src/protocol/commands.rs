//! The static command table.
//!
//! Entries are immutable, built at compile time, and looked up by the
//! dispatch hash of the command token.
use crate::protocol::hash::djb2;
use crate::robot::joint::JointId;

/// What a resolved command is allowed to do: read its arguments, mutate
/// joint state, write into the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Ramped move of one joint, `(angle_brads, duration_ms)`.
    Move(JointId),
    /// Open or close the gripper, boolean-like argument.
    Grip,
    /// Synchronous home of every joint.
    Home,
    /// Reserved coordinated multi-joint move; accepted, parsed, no motion.
    Slew,
    /// Indicator LED on/off.
    Led,
    /// Position report for every joint.
    Status,
    /// Audio tone, `(frequency_hz, duration_ms)`.
    Tone,
}

/// One (name, hash, handler) entry of the table.
pub struct Command {
    pub name: &'static str,
    pub hash: u32,
    pub min_args: usize,
    pub action: Action,
}

const fn entry(name: &'static str, min_args: usize, action: Action) -> Command {
    Command {
        name,
        hash: djb2(name),
        min_args,
        action,
    }
}

pub static COMMANDS: [Command; 10] = [
    entry("azimuth", 2, Action::Move(JointId::Azimuth)),
    entry("shoulder", 2, Action::Move(JointId::Shoulder)),
    entry("elbow", 2, Action::Move(JointId::Varm)),
    entry("varm", 2, Action::Move(JointId::Varm)),
    entry("gripper", 1, Action::Grip),
    entry("home", 0, Action::Home),
    entry("slew", 0, Action::Slew),
    entry("led", 1, Action::Led),
    entry("status", 0, Action::Status),
    entry("tone", 2, Action::Tone),
];

pub fn lookup(hash: u32) -> Option<&'static Command> {
    COMMANDS.iter().find(|command| command.hash == hash)
}
