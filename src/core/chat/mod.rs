//! Conversation state: transcript, per-turn streaming state, session, turn driver.

mod driver;
mod dual;
mod session;
mod transcript;
mod turn;

pub use driver::{ResponseMode, TurnOutcome, consume_stream, run_turn};
pub use dual::{DualOutput, split_dual};
pub use session::{GenerationSettings, PendingTurn, Session, SessionError};
pub use transcript::{Role, Transcript, Turn};
pub use turn::{
    CURSOR_GLYPH, EMPTY_RESPONSE_NOTICE, FAILURE_PLACEHOLDER, MAX_CONTENT_BYTES, StreamingTurn,
    TurnState,
};
