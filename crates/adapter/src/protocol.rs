//! Protocol module - line-delimited JSON messages for the headless driver.
//!
//! Every message is one JSON object with a `type` field. Outbound messages
//! carry a `seq` that increases by one per message sent.

use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{DropOutcome, GameEvent, GameSnapshot};
use crate::types::{GameCommand, Rotation, ShapeId};

/// Maximum number of commands accepted in one `command` message.
pub const MAX_COMMANDS: usize = 16;

// ============== Client -> Game Messages ==============

/// Commands in one `command` message, applied in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandList(pub ArrayVec<GameCommand, MAX_COMMANDS>);

impl CommandList {
    pub fn iter(&self) -> impl Iterator<Item = &GameCommand> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for CommandList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = CommandList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "an array of at most {} commands", MAX_COMMANDS)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = ArrayVec::new();
                while let Some(cmd) = seq.next_element::<GameCommand>()? {
                    out.try_push(cmd)
                        .map_err(|_| serde::de::Error::custom("too many commands"))?;
                }
                Ok(CommandList(out))
            }
        }

        deserializer.deserialize_seq(V)
    }
}

impl Serialize for CommandList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

/// Inbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Apply state machine commands in order.
    Command { commands: CommandList },
    /// Release a shape at a pixel position.
    Drop {
        shape_id: ShapeId,
        x: f32,
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<Rotation>,
    },
    /// The screen the generator lays puzzles out in.
    Viewport { width: f32, height: f32 },
    /// Request an observation without changing anything.
    Observe,
}

impl InboundMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            InboundMessage::Command { .. } => "command",
            InboundMessage::Drop { .. } => "drop",
            InboundMessage::Viewport { .. } => "viewport",
            InboundMessage::Observe => "observe",
        }
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    UnknownShape,
    InvalidViewport,
}

/// Outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Observation {
        seq: u64,
        snapshot: GameSnapshot,
        events: Vec<GameEvent>,
    },
    DropResult {
        seq: u64,
        shape_id: ShapeId,
        outcome: DropOutcome,
    },
    Error {
        seq: u64,
        code: ErrorCode,
        message: String,
    },
}

impl OutboundMessage {
    pub fn seq(&self) -> u64 {
        match self {
            OutboundMessage::Observation { seq, .. }
            | OutboundMessage::DropResult { seq, .. }
            | OutboundMessage::Error { seq, .. } => *seq,
        }
    }

    /// Serialize as one protocol line (no trailing newline).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ============== Errors ==============

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unknown message type `{0}`")]
    UnknownType(String),
    #[error("unknown shape {0}")]
    UnknownShape(ShapeId),
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

impl ProtocolError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProtocolError::InvalidJson(_) | ProtocolError::UnknownType(_) => ErrorCode::InvalidJson,
            ProtocolError::UnknownShape(_) => ErrorCode::UnknownShape,
            ProtocolError::InvalidViewport { .. } => ErrorCode::InvalidViewport,
        }
    }
}

/// Parse one inbound line.
pub fn parse_message(line: &str) -> Result<InboundMessage, ProtocolError> {
    match serde_json::from_str::<InboundMessage>(line) {
        Ok(msg) => Ok(msg),
        Err(e) => {
            // Report an unrecognized `type` separately from a malformed body.
            #[derive(Deserialize)]
            struct TypeOnly {
                #[serde(rename = "type")]
                msg_type: Option<String>,
            }
            let msg_type = serde_json::from_str::<TypeOnly>(line)?.msg_type;
            match msg_type {
                Some(t) if !matches!(t.as_str(), "command" | "drop" | "viewport" | "observe") => {
                    Err(ProtocolError::UnknownType(t))
                }
                _ => Err(ProtocolError::InvalidJson(e)),
            }
        }
    }
}

/// Create an error message.
pub fn create_error(seq: u64, err: &ProtocolError) -> OutboundMessage {
    OutboundMessage::Error {
        seq,
        code: err.code(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;

    #[test]
    fn test_parse_command_list() {
        let msg = parse_message(
            r#"{"type":"command","commands":[{"cmd":"setDifficulty","difficulty":"hard"},{"cmd":"start"}]}"#,
        )
        .unwrap();
        let InboundMessage::Command { commands } = msg else {
            panic!("expected command, got {:?}", msg);
        };
        let cmds: Vec<_> = commands.iter().copied().collect();
        assert_eq!(
            cmds,
            vec![
                GameCommand::SetDifficulty {
                    difficulty: Difficulty::Hard
                },
                GameCommand::Start
            ]
        );
    }

    #[test]
    fn test_parse_drop_with_optional_rotation() {
        let msg = parse_message(r#"{"type":"drop","shape_id":12,"x":100.5,"y":40}"#).unwrap();
        assert_eq!(
            msg,
            InboundMessage::Drop {
                shape_id: ShapeId(12),
                x: 100.5,
                y: 40.0,
                rotation: None
            }
        );

        let msg =
            parse_message(r#"{"type":"drop","shape_id":12,"x":1,"y":2,"rotation":270}"#).unwrap();
        assert!(matches!(
            msg,
            InboundMessage::Drop {
                rotation: Some(Rotation::Deg270),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_viewport_and_observe() {
        assert_eq!(
            parse_message(r#"{"type":"viewport","width":800,"height":600}"#).unwrap(),
            InboundMessage::Viewport {
                width: 800.0,
                height: 600.0
            }
        );
        assert_eq!(
            parse_message(r#"{"type":"observe"}"#).unwrap(),
            InboundMessage::Observe
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_message("not json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidJson);

        let err = parse_message(r#"{"type":"teleport"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownType(ref t) if t == "teleport"));
        assert_eq!(err.code(), ErrorCode::InvalidJson);

        let err = parse_message(r#"{"type":"drop","x":1,"y":2}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidJson(_)));

        let err = parse_message(r#"{"type":"command","commands":[{"cmd":"fly"}]}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidJson);
    }

    #[test]
    fn test_command_list_is_bounded() {
        let many = vec![r#"{"cmd":"reset"}"#; MAX_COMMANDS + 1].join(",");
        let line = format!(r#"{{"type":"command","commands":[{}]}}"#, many);
        assert!(parse_message(&line).is_err());
    }

    #[test]
    fn test_error_message_shape() {
        let msg = create_error(3, &ProtocolError::UnknownShape(ShapeId(0xab)));
        let value: serde_json::Value = serde_json::from_str(&msg.to_line().unwrap()).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["seq"], 3);
        assert_eq!(value["code"], "unknown_shape");
        assert_eq!(value["message"], "unknown shape shape-000000ab");
    }
}
