//! Per-turn state machine for a streamed (or unary) response.
//!
//! `Idle → AwaitingResponse → Streaming → Complete`, with any state able to move
//! to `Failed`. The accumulator holds the in-progress model text; the display is
//! always rebuilt from it, never appended to.

use std::fmt;

/// Shown after the text while a response is still streaming.
pub const CURSOR_GLYPH: char = '▌';

/// Max accumulated response size (2MB); further chunks are dropped.
pub const MAX_CONTENT_BYTES: usize = 2 * 1024 * 1024;

/// Model turn recorded when a request fails before any text arrived.
pub const FAILURE_PLACEHOLDER: &str =
    "Sorry, an error occurred and no answer could be produced.";

/// Model turn recorded when the stream ends without any text.
pub const EMPTY_RESPONSE_NOTICE: &str = "(The model returned an empty response.)";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingResponse,
    Streaming,
    Complete,
    Failed,
}

impl TurnState {
    /// A request is in flight; new submissions are refused.
    pub fn is_busy(self) -> bool {
        matches!(self, TurnState::AwaitingResponse | TurnState::Streaming)
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnState::Idle => "idle",
            TurnState::AwaitingResponse => "waiting",
            TurnState::Streaming => "streaming",
            TurnState::Complete => "complete",
            TurnState::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Default)]
pub struct StreamingTurn {
    state: TurnState,
    accumulator: String,
    truncated: bool,
}

impl StreamingTurn {
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Text received so far.
    pub fn text(&self) -> &str {
        &self.accumulator
    }

    /// Start a new turn. Returns false (and changes nothing) while one is in flight.
    pub fn submit(&mut self) -> bool {
        if self.state.is_busy() {
            log::warn!("submit ignored: turn is {}", self.state);
            return false;
        }
        self.state = TurnState::AwaitingResponse;
        self.accumulator.clear();
        self.truncated = false;
        true
    }

    /// Append a delta. The first chunk moves the turn to `Streaming`.
    pub fn push_chunk(&mut self, chunk: &str) {
        match self.state {
            TurnState::AwaitingResponse => self.state = TurnState::Streaming,
            TurnState::Streaming => {}
            other => {
                log::warn!("chunk ignored: turn is {}", other);
                return;
            }
        }
        // Nothing is kept after the first dropped chunk.
        if self.truncated {
            return;
        }
        if self.accumulator.len() + chunk.len() <= MAX_CONTENT_BYTES {
            self.accumulator.push_str(chunk);
        } else {
            log::warn!("response exceeded {} bytes; truncating", MAX_CONTENT_BYTES);
            self.truncated = true;
        }
    }

    /// End of stream. Returns the final text for the transcript, or `None` if no
    /// request was in flight.
    pub fn finish(&mut self) -> Option<String> {
        if !self.state.is_busy() {
            log::warn!("finish ignored: turn is {}", self.state);
            return None;
        }
        self.state = TurnState::Complete;
        if self.accumulator.trim().is_empty() {
            return Some(EMPTY_RESPONSE_NOTICE.to_string());
        }
        Some(self.accumulator.clone())
    }

    /// Transport or API failure. Partial text is kept and a failure notice appended.
    pub fn fail(&mut self, error: &str) -> String {
        self.state = TurnState::Failed;
        if self.accumulator.trim().is_empty() {
            FAILURE_PLACEHOLDER.to_string()
        } else {
            format!("{}\n\n[Response interrupted: {}]", self.accumulator, error)
        }
    }

    /// What to render right now. Replaces the previous render entirely.
    pub fn display(&self) -> String {
        match self.state {
            TurnState::AwaitingResponse | TurnState::Streaming => {
                format!("{}{}", self.accumulator, CURSOR_GLYPH)
            }
            _ => self.accumulator.clone(),
        }
    }

    /// Back to `Idle`, dropping any text. Used by a session reset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let mut turn = StreamingTurn::default();
        assert_eq!(turn.state(), TurnState::Idle);
        assert!(turn.submit());
        assert_eq!(turn.state(), TurnState::AwaitingResponse);
        turn.push_chunk("Hel");
        assert_eq!(turn.state(), TurnState::Streaming);
        turn.push_chunk("lo");
        assert_eq!(turn.display(), format!("Hello{}", CURSOR_GLYPH));
        assert_eq!(turn.finish().as_deref(), Some("Hello"));
        assert_eq!(turn.state(), TurnState::Complete);
        assert_eq!(turn.display(), "Hello");
    }

    #[test]
    fn display_is_rebuilt_from_accumulator() {
        let mut turn = StreamingTurn::default();
        turn.submit();
        turn.push_chunk("a");
        let first = turn.display();
        let second = turn.display();
        assert_eq!(first, second);
        assert_eq!(first.matches('a').count(), 1);
    }

    #[test]
    fn submit_refused_while_busy() {
        let mut turn = StreamingTurn::default();
        assert!(turn.submit());
        turn.push_chunk("x");
        assert!(!turn.submit());
        assert_eq!(turn.text(), "x");
        assert_eq!(turn.state(), TurnState::Streaming);
    }

    #[test]
    fn failure_keeps_partial_text_and_appends_notice() {
        let mut turn = StreamingTurn::default();
        turn.submit();
        turn.push_chunk("Partial answer");
        let text = turn.fail("connection reset");
        assert_eq!(turn.state(), TurnState::Failed);
        assert!(text.starts_with("Partial answer"));
        assert!(text.contains("connection reset"));
    }

    #[test]
    fn failure_without_text_uses_placeholder() {
        let mut turn = StreamingTurn::default();
        turn.submit();
        assert_eq!(turn.fail("timeout"), FAILURE_PLACEHOLDER);
    }

    #[test]
    fn empty_stream_completes_with_notice() {
        let mut turn = StreamingTurn::default();
        turn.submit();
        assert_eq!(turn.finish().as_deref(), Some(EMPTY_RESPONSE_NOTICE));
        assert_eq!(turn.state(), TurnState::Complete);
    }

    #[test]
    fn chunks_outside_a_request_are_ignored() {
        let mut turn = StreamingTurn::default();
        turn.push_chunk("stray");
        assert_eq!(turn.state(), TurnState::Idle);
        assert_eq!(turn.text(), "");
        assert_eq!(turn.finish(), None);
    }

    #[test]
    fn chunks_after_the_size_cap_are_all_dropped() {
        let mut turn = StreamingTurn::default();
        turn.submit();
        turn.push_chunk(&"a".repeat(MAX_CONTENT_BYTES - 10));
        turn.push_chunk(&"B".repeat(100));
        turn.push_chunk("tail");
        let text = turn.finish().unwrap();
        assert_eq!(text.len(), MAX_CONTENT_BYTES - 10);
        assert!(text.bytes().all(|b| b == b'a'));
    }

    #[test]
    fn new_turn_after_failure_starts_clean() {
        let mut turn = StreamingTurn::default();
        turn.submit();
        turn.push_chunk("old");
        turn.fail("boom");
        assert!(turn.submit());
        assert_eq!(turn.text(), "");
    }
}
