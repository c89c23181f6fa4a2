//! Session: drives one game from protocol messages.
//!
//! The session is the headless presentation collaborator. It applies commands,
//! evaluates drops, asks for a puzzle whenever one is needed and reports the
//! resulting snapshot together with the drained notifications.

use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::core::{DropPoint, GameState, RandomSource, SimpleRng};
use crate::protocol::{create_error, parse_message, InboundMessage, OutboundMessage, ProtocolError};
use crate::types::{Viewport, DEFAULT_SNAP_THRESHOLD};

/// Screen assumed until the client sends a `viewport` message.
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1000.0,
    height: 800.0,
};

pub struct Session<R: RandomSource = SimpleRng> {
    state: GameState,
    rng: R,
    viewport: Viewport,
    threshold: f32,
    seq: u64,
}

impl Session<SimpleRng> {
    /// Build a session from runtime configuration.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_entropy(),
        };
        info!(
            seed = rng.seed(),
            threshold = config.snap_threshold,
            difficulty = %config.difficulty,
            "session created"
        );
        let mut session = Self::with_rng(rng, config.snap_threshold);
        session.state.set_difficulty(config.difficulty);
        session
    }
}

impl<R: RandomSource> Session<R> {
    pub fn with_rng(rng: R, threshold: f32) -> Self {
        Self {
            state: GameState::new(),
            rng,
            viewport: DEFAULT_VIEWPORT,
            threshold,
            seq: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Handle one protocol line. Malformed lines produce a single error reply.
    pub fn handle_line(&mut self, line: &str) -> Vec<OutboundMessage> {
        match parse_message(line) {
            Ok(msg) => self.handle(msg),
            Err(err) => {
                warn!(error = %err, "rejected message");
                vec![self.error(&err)]
            }
        }
    }

    /// Handle one decoded message.
    pub fn handle(&mut self, msg: InboundMessage) -> Vec<OutboundMessage> {
        debug!(msg = msg.as_str(), "inbound");
        let mut out = Vec::with_capacity(2);

        match msg {
            InboundMessage::Command { commands } => {
                for cmd in commands.iter() {
                    self.state.apply(*cmd);
                    // A started or advanced stage gets its puzzle before the
                    // next command is applied.
                    self.state.ensure_puzzle(self.viewport, &mut self.rng);
                }
            }
            InboundMessage::Drop {
                shape_id,
                x,
                y,
                rotation,
            } => {
                let Some(slot) = self.state.puzzle().and_then(|p| p.slot(shape_id)) else {
                    let err = ProtocolError::UnknownShape(shape_id);
                    warn!(error = %err, "rejected drop");
                    return vec![self.error(&err)];
                };
                let point = DropPoint {
                    x,
                    y,
                    rotation: rotation.unwrap_or(slot.shape.rotation),
                };
                let outcome = self.state.drop_shape(shape_id, point, self.threshold);
                let seq = self.next_seq();
                out.push(OutboundMessage::DropResult {
                    seq,
                    shape_id,
                    outcome,
                });
            }
            InboundMessage::Viewport { width, height } => {
                let viewport = Viewport::new(width, height);
                if !viewport.is_valid() {
                    return vec![self.error(&ProtocolError::InvalidViewport { width, height })];
                }
                self.viewport = viewport;
            }
            InboundMessage::Observe => {}
        }

        self.state.ensure_puzzle(self.viewport, &mut self.rng);
        out.push(self.observation());
        out
    }

    /// Snapshot plus every notification queued since the last observation.
    pub fn observation(&mut self) -> OutboundMessage {
        let seq = self.next_seq();
        OutboundMessage::Observation {
            seq,
            snapshot: self.state.snapshot(),
            events: self.state.take_events(),
        }
    }

    fn error(&mut self, err: &ProtocolError) -> OutboundMessage {
        let seq = self.next_seq();
        create_error(seq, err)
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

impl Default for Session<SimpleRng> {
    fn default() -> Self {
        Self::with_rng(SimpleRng::default(), DEFAULT_SNAP_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DropOutcome, GameEvent};
    use crate::protocol::ErrorCode;
    use crate::types::{Difficulty, GamePhase};

    fn session() -> Session {
        Session::with_rng(SimpleRng::new(5), DEFAULT_SNAP_THRESHOLD)
    }

    fn observation(msg: &OutboundMessage) -> (&crate::core::GameSnapshot, &[GameEvent]) {
        match msg {
            OutboundMessage::Observation {
                snapshot, events, ..
            } => (snapshot, events),
            other => panic!("expected observation, got {:?}", other),
        }
    }

    #[test]
    fn test_start_generates_puzzle() {
        let mut s = session();
        let out = s.handle_line(r#"{"type":"command","commands":[{"cmd":"start"}]}"#);
        assert_eq!(out.len(), 1);
        let (snap, events) = observation(&out[0]);
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.puzzle.as_ref().map(|p| p.len()), Some(3));
        assert_eq!(events, &[GameEvent::PuzzleReady { stage: 1 }]);

        // Events are drained once.
        let out = s.handle_line(r#"{"type":"observe"}"#);
        assert!(observation(&out[0]).1.is_empty());
        assert_eq!(out[0].seq(), 2);
    }

    #[test]
    fn test_drop_on_target_snaps() {
        let mut s = session();
        s.handle_line(r#"{"type":"command","commands":[{"cmd":"start"}]}"#);
        let puzzle = s.state().puzzle().unwrap().clone();
        let slot = &puzzle.shapes[0];
        let target = puzzle.target(slot.shape.id.into()).unwrap();

        let line = format!(
            r#"{{"type":"drop","shape_id":{},"x":{},"y":{}}}"#,
            slot.shape.id.0,
            target.x + 10.0,
            target.y
        );
        let out = s.handle_line(&line);
        assert_eq!(out.len(), 2);
        match &out[0] {
            OutboundMessage::DropResult { outcome, .. } => {
                assert!(outcome.is_snapped());
                assert_eq!(outcome.target_id(), Some(target.id));
            }
            other => panic!("expected drop_result, got {:?}", other),
        }
        let (snap, events) = observation(&out[1]);
        assert!(snap.placed_shape_ids.contains(&slot.shape.id));
        assert!(events.contains(&GameEvent::ShapeSnapped {
            shape_id: slot.shape.id,
            target_id: target.id
        }));
    }

    #[test]
    fn test_far_drop_misses() {
        let mut s = session();
        s.handle_line(r#"{"type":"command","commands":[{"cmd":"start"}]}"#);
        let id = s.state().puzzle().unwrap().shapes[0].shape.id;
        let out = s.handle_line(&format!(
            r#"{{"type":"drop","shape_id":{},"x":-500,"y":-500}}"#,
            id.0
        ));
        match &out[0] {
            OutboundMessage::DropResult { outcome, .. } => {
                assert!(matches!(outcome, DropOutcome::Missed { .. }));
            }
            other => panic!("expected drop_result, got {:?}", other),
        }
        assert!(s.state().placed_shape_ids().is_empty());
    }

    #[test]
    fn test_errors_keep_the_session_alive() {
        let mut s = session();
        let out = s.handle_line("{oops");
        assert!(matches!(
            out[0],
            OutboundMessage::Error {
                code: ErrorCode::InvalidJson,
                ..
            }
        ));

        let out = s.handle_line(r#"{"type":"drop","shape_id":1,"x":0,"y":0}"#);
        assert!(matches!(
            out[0],
            OutboundMessage::Error {
                code: ErrorCode::UnknownShape,
                ..
            }
        ));

        let out = s.handle_line(r#"{"type":"viewport","width":0,"height":600}"#);
        assert!(matches!(
            out[0],
            OutboundMessage::Error {
                code: ErrorCode::InvalidViewport,
                ..
            }
        ));
        assert_eq!(s.viewport(), DEFAULT_VIEWPORT);

        let out = s.handle_line(r#"{"type":"observe"}"#);
        assert_eq!(observation(&out[0]).0.phase, GamePhase::Menu);
        assert_eq!(out[0].seq(), 4);
    }

    #[test]
    fn test_config_sets_difficulty_and_seed() {
        let config = RuntimeConfig {
            seed: Some(9),
            difficulty: Difficulty::Hard,
            ..RuntimeConfig::default()
        };
        let mut a = Session::from_config(&config);
        let mut b = Session::from_config(&config);
        assert_eq!(a.state().difficulty(), Difficulty::Hard);

        let start = r#"{"type":"command","commands":[{"cmd":"start"}]}"#;
        assert_eq!(a.handle_line(start), b.handle_line(start));
    }
}
