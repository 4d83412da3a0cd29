//! Transcript to display blocks.

use crate::core::chat::{Role, split_dual};
use crate::core::prompt::DUAL_SENTINEL;

use super::App;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Speaker {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DisplayBlock {
    pub speaker: Speaker,
    /// Set for one half of a dual-language answer.
    pub variant: Option<(usize, usize)>,
    pub text: String,
    pub streaming: bool,
}

impl DisplayBlock {
    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            variant: None,
            text: text.into(),
            streaming: false,
        }
    }
}

impl App {
    /// Completed turns (dual answers split in two), then the in-flight response.
    pub(crate) fn display_blocks(&self) -> Vec<DisplayBlock> {
        let mut blocks = Vec::new();
        for turn in self.session.transcript().turns() {
            match turn.role() {
                Role::User => blocks.push(DisplayBlock::new(Speaker::User, turn.text())),
                Role::Model if turn.text().contains(DUAL_SENTINEL) => {
                    let output = split_dual(turn.text());
                    let parts = output.segments();
                    let n = parts.len();
                    for (i, text) in parts.into_iter().enumerate() {
                        blocks.push(DisplayBlock {
                            variant: (n > 1).then_some((i + 1, n)),
                            ..DisplayBlock::new(Speaker::Model, text)
                        });
                    }
                }
                Role::Model => blocks.push(DisplayBlock::new(Speaker::Model, turn.text())),
            }
        }
        if self.is_busy() {
            blocks.push(DisplayBlock {
                streaming: true,
                ..DisplayBlock::new(Speaker::Model, self.session.turn().display())
            });
        }
        blocks
    }
}
