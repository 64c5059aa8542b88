//! Prefix commands — answered before the relay pipeline runs.
//!
//! Commands work in every channel, gated or not. The bot keeps no
//! conversation state, so `!clear` only acknowledges: future context is
//! always rebuilt from the platform's own recent history anyway.

/// Leading character that marks a command (and excludes the message from
/// history reconstruction).
pub const COMMAND_PREFIX: char = '!';

type CommandHandler = fn(&[&str]) -> String;

/// Command table: name → handler, matched after prefix-stripping.
const COMMANDS: &[(&str, CommandHandler)] = &[("ping", cmd_ping), ("clear", cmd_clear)];

/// Dispatch a command message.
///
/// Returns `Some(reply)` when the text names a known command, `None` when it
/// should fall through to the conversation pipeline.
pub fn dispatch(text: &str) -> Option<String> {
    let rest = text.trim().strip_prefix(COMMAND_PREFIX)?;
    let mut tokens = rest.split_whitespace();
    let name = tokens.next()?;
    let args: Vec<&str> = tokens.collect();

    COMMANDS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, handler)| handler(&args))
}

fn cmd_ping(_args: &[&str]) -> String {
    "Pong! \u{1f3d3}".to_string()
}

fn cmd_clear(_args: &[&str]) -> String {
    "\u{2728} Fresh start! The bot will only consider recent messages from this point forward. \u{1f9f9}"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_answers_pong() {
        let reply = dispatch("!ping").expect("ping is a known command");
        assert!(reply.starts_with("Pong!"));
    }

    #[test]
    fn clear_acknowledges_without_state() {
        let reply = dispatch("!clear").expect("clear is a known command");
        assert!(reply.contains("Fresh start"));
    }

    #[test]
    fn trailing_arguments_are_tolerated() {
        assert!(dispatch("!ping now please").is_some());
    }

    #[test]
    fn unknown_command_falls_through() {
        assert_eq!(dispatch("!frobnicate"), None);
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(dispatch("hello there"), None);
        assert_eq!(dispatch("ping"), None);
    }

    #[test]
    fn bare_prefix_is_not_a_command() {
        assert_eq!(dispatch("!"), None);
        assert_eq!(dispatch("!   "), None);
    }
}
