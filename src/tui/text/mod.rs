//! Text layout helpers for the transcript view.

mod wrap;

pub(crate) use wrap::wrap_lines;
