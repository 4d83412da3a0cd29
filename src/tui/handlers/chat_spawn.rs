//! Background work: one chat request or one model resolution per thread.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use tokio::runtime::Runtime;

use crate::core::chat::{PendingTurn, consume_stream};
use crate::core::config::Config;
use crate::core::llm::GeminiClient;
use crate::core::models::{FailureMode, resolve_for_config};

use super::{PendingChat, PendingResolution};

/// Stream the response for `pending`. Deltas arrive on `stream_rx`; the
/// outcome (after the last delta) on `result_rx`.
pub fn spawn_chat(rt: &Arc<Runtime>, config: &Config, pending: PendingTurn) -> PendingChat {
    let (stream_tx, stream_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();
    let client = GeminiClient::new(config);
    let idle = config.request_timeout;
    let rt_clone = Arc::clone(rt);

    thread::spawn(move || {
        let request = pending.request();
        let result = rt_clone.block_on(consume_stream(&client, &request, idle, |delta| {
            let _ = stream_tx.send(delta.to_string());
        }));
        let _ = result_tx.send(result);
    });

    PendingChat {
        stream_rx,
        result_rx,
    }
}

/// Resolve the session model off the UI thread.
pub fn spawn_resolution(rt: &Arc<Runtime>, config: Arc<Config>) -> PendingResolution {
    let (tx, rx) = mpsc::channel();
    let rt_clone = Arc::clone(rt);
    thread::spawn(move || {
        let client = GeminiClient::new(&config);
        let result = rt_clone.block_on(resolve_for_config(
            config.as_ref(),
            &client,
            FailureMode::Degrade,
        ));
        let _ = tx.send(result);
    });
    rx
}
