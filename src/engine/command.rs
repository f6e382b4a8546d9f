use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::geometry::{Side, Size};
use crate::pane::{PaneContent, PaneId};

/// Structural commands accepted by the engine.
///
/// The set is closed and matched exhaustively, so an unhandled command is a
/// compile error rather than a runtime fallthrough. Text front ends parse
/// the external form via [`FromStr`]; structured front ends can use the
/// `serde` representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Divide the active pane in half; the new pane takes the named side.
    Split(Side),
    /// Exchange the active pane with its neighbor on the named side.
    Swap(Side),
    /// Close the active pane and let its neighbors absorb the space.
    Close,
    /// Move the active pointer to the neighbor on the named side.
    Switch(Side),
    /// Rescale the container; every pane follows proportionally.
    Resize(Size),
    /// Attach content: creates the root pane on an empty board, otherwise
    /// replaces the active pane's content handle.
    New(PaneContent),
}

impl Command {
    /// Short tag for log fields.
    pub const fn describe(&self) -> &'static str {
        match self {
            Command::Split(_) => "split",
            Command::Swap(_) => "swap",
            Command::Close => "close",
            Command::Switch(_) => "switch",
            Command::Resize(_) => "resize",
            Command::New(_) => "new",
        }
    }
}

impl FromStr for Command {
    type Err = EngineError;

    /// Parse the text form used by script front ends:
    /// `split right`, `swap above`, `switch left`, `close`,
    /// `resize <height> <width>`, `new <content>`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };

        let require_side = |rest: &str| -> Result<Side, EngineError> {
            if rest.is_empty() {
                return Err(EngineError::MalformedCommand(trimmed.to_string()));
            }
            rest.parse()
        };

        match head {
            "split" => Ok(Command::Split(require_side(rest)?)),
            "swap" => Ok(Command::Swap(require_side(rest)?)),
            "switch" => Ok(Command::Switch(require_side(rest)?)),
            "close" => {
                if rest.is_empty() {
                    Ok(Command::Close)
                } else {
                    Err(EngineError::MalformedCommand(trimmed.to_string()))
                }
            }
            "resize" => {
                // Dimensions arrive height-first, matching the command wire
                // order used by the hosting application.
                let mut dims = rest.split_whitespace();
                let height = dims.next().and_then(|d| d.parse::<u16>().ok());
                let width = dims.next().and_then(|d| d.parse::<u16>().ok());
                match (height, width, dims.next()) {
                    (Some(height), Some(width), None) => {
                        Ok(Command::Resize(Size::new(width, height)))
                    }
                    _ => Err(EngineError::MalformedCommand(trimmed.to_string())),
                }
            }
            "new" => Ok(Command::New(rest.to_string())),
            "" => Err(EngineError::MalformedCommand(line.to_string())),
            other => Err(EngineError::UnknownCommand(other.to_string())),
        }
    }
}

/// What a dispatched command changed.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub layout_changed: bool,
    pub active_changed: bool,
    pub content_changed: bool,
    pub created: Option<PaneId>,
    pub removed: Option<PaneId>,
}

impl CommandOutcome {
    pub fn is_noop(&self) -> bool {
        !self.layout_changed && !self.active_changed && !self.content_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sided_commands() {
        assert_eq!("split right".parse::<Command>().unwrap(), Command::Split(Side::Right));
        assert_eq!("swap above".parse::<Command>().unwrap(), Command::Swap(Side::Above));
        assert_eq!("switch left".parse::<Command>().unwrap(), Command::Switch(Side::Left));
    }

    #[test]
    fn parses_close_without_arguments() {
        assert_eq!("close".parse::<Command>().unwrap(), Command::Close);
        assert!(matches!(
            "close now".parse::<Command>(),
            Err(EngineError::MalformedCommand(_))
        ));
    }

    #[test]
    fn resize_takes_height_then_width() {
        let cmd = "resize 600 800".parse::<Command>().unwrap();
        assert_eq!(cmd, Command::Resize(Size::new(800, 600)));
    }

    #[test]
    fn new_keeps_the_rest_of_the_line_as_content() {
        let cmd = "new scratch buffer #2".parse::<Command>().unwrap();
        assert_eq!(cmd, Command::New("scratch buffer #2".to_string()));
    }

    #[test]
    fn bad_side_token_aborts_the_parse() {
        assert!(matches!(
            "split sideways".parse::<Command>(),
            Err(EngineError::UnknownSide(t)) if t == "sideways"
        ));
        assert!(matches!(
            "split".parse::<Command>(),
            Err(EngineError::MalformedCommand(_))
        ));
    }

    #[test]
    fn unknown_verb_is_reported() {
        assert!(matches!(
            "explode".parse::<Command>(),
            Err(EngineError::UnknownCommand(v)) if v == "explode"
        ));
    }

    #[test]
    fn command_serde_round_trip() {
        let cmd = Command::Split(Side::Below);
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(serde_json::from_str::<Command>(&json).unwrap(), cmd);
    }
}
