//! In-chat commands.

/// Prefix marking compose-box input as a command.
pub const COMMAND_SIGIL: char = ':';

/// Recognized in-chat commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `:list` - ask the relay who is online.
    List,
}

impl Command {
    /// Parse command input. `None` if the input is not a known command.
    pub fn parse(input: &str) -> Option<Self> {
        let name = input.trim().strip_prefix(COMMAND_SIGIL)?;
        match name {
            "list" => Some(Self::List),
            _ => None,
        }
    }

    /// True if the input uses the command sigil.
    pub fn is_command(input: &str) -> bool {
        input.starts_with(COMMAND_SIGIL)
    }
}
