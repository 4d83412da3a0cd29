//! Runs one conversation turn against a [`TextGenerator`].

use std::time::Duration;

use futures::StreamExt;
use tokio::time::timeout;

use crate::core::llm::{ChatError, ChatRequest, TextGenerator};

use super::session::{Session, SessionError};
use super::turn::StreamingTurn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseMode {
    #[default]
    Stream,
    Unary,
}

#[derive(Debug)]
pub enum TurnOutcome {
    Complete(String),
    /// `text` is what was recorded in the transcript (partial text or placeholder).
    Failed { text: String, error: ChatError },
}

/// Pull deltas until the stream ends. `idle` bounds the wait for the stream to
/// open and for each next chunk.
pub async fn consume_stream<G, F>(
    generator: &G,
    request: &ChatRequest<'_>,
    idle: Duration,
    mut on_chunk: F,
) -> Result<(), ChatError>
where
    G: TextGenerator,
    F: FnMut(&str),
{
    let secs = idle.as_secs();
    let mut stream = timeout(idle, generator.stream(request))
        .await
        .map_err(|_| ChatError::Timeout(secs))??;
    loop {
        match timeout(idle, stream.next()).await {
            Err(_) => return Err(ChatError::Timeout(secs)),
            Ok(None) => return Ok(()),
            Ok(Some(Err(e))) => return Err(e),
            Ok(Some(Ok(delta))) => on_chunk(&delta),
        }
    }
}

/// Submit `prompt` on `session` and drive it to completion or failure.
/// `on_update` receives each delta along with the turn so callers can either
/// print the delta or re-render the full display.
pub async fn run_turn<G, F>(
    session: &mut Session,
    generator: &G,
    prompt: &str,
    mode: ResponseMode,
    idle: Duration,
    mut on_update: F,
) -> Result<TurnOutcome, SessionError>
where
    G: TextGenerator,
    F: FnMut(&str, &StreamingTurn),
{
    let pending = session.begin_turn(prompt)?;
    let request = pending.request();

    let result = match mode {
        ResponseMode::Stream => {
            consume_stream(generator, &request, idle, |delta| {
                session.push_chunk(delta);
                on_update(delta, session.turn());
            })
            .await
        }
        ResponseMode::Unary => match timeout(idle, generator.generate(&request)).await {
            Err(_) => Err(ChatError::Timeout(idle.as_secs())),
            Ok(Err(e)) => Err(e),
            Ok(Ok(text)) => {
                session.push_chunk(&text);
                on_update(&text, session.turn());
                Ok(())
            }
        },
    };

    Ok(match result {
        Ok(()) => {
            let text = session
                .complete_turn()
                .map(|t| t.text().to_string())
                .unwrap_or_default();
            TurnOutcome::Complete(text)
        }
        Err(error) => {
            let text = session.fail_turn(&error).text().to_string();
            TurnOutcome::Failed { text, error }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat::{
        EMPTY_RESPONSE_NOTICE, FAILURE_PLACEHOLDER, GenerationSettings, Role, TurnState,
    };
    use crate::core::llm::DeltaStream;
    use crate::core::models::Resolution;
    use std::sync::Mutex;

    /// Replays scripted deltas and records the history length of each request.
    struct ScriptedGenerator {
        deltas: Vec<Result<String, ChatError>>,
        seen_history: Mutex<Vec<usize>>,
        seen_prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(deltas: Vec<Result<&str, ChatError>>) -> Self {
            Self {
                deltas: deltas.into_iter().map(|d| d.map(str::to_string)).collect(),
                seen_history: Mutex::new(Vec::new()),
                seen_prompts: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, request: &ChatRequest<'_>) {
            self.seen_history.lock().unwrap().push(request.history.len());
            self.seen_prompts.lock().unwrap().push(request.prompt.to_string());
        }

        fn replay(&self) -> Vec<Result<String, ChatError>> {
            self.deltas
                .iter()
                .map(|d| match d {
                    Ok(s) => Ok(s.clone()),
                    Err(ChatError::ApiMessage(m)) => Err(ChatError::ApiMessage(m.clone())),
                    Err(e) => Err(ChatError::ApiMessage(e.to_string())),
                })
                .collect()
        }
    }

    impl TextGenerator for ScriptedGenerator {
        async fn stream(&self, request: &ChatRequest<'_>) -> Result<DeltaStream, ChatError> {
            self.record(request);
            Ok(Box::pin(futures::stream::iter(self.replay())))
        }

        async fn generate(&self, request: &ChatRequest<'_>) -> Result<String, ChatError> {
            self.record(request);
            let mut out = String::new();
            for d in self.replay() {
                out.push_str(&d?);
            }
            Ok(out)
        }
    }

    /// Opens a stream that never yields.
    struct StalledGenerator;

    impl TextGenerator for StalledGenerator {
        async fn stream(&self, _request: &ChatRequest<'_>) -> Result<DeltaStream, ChatError> {
            Ok(Box::pin(futures::stream::pending()))
        }

        async fn generate(&self, _request: &ChatRequest<'_>) -> Result<String, ChatError> {
            futures::future::pending().await
        }
    }

    fn session() -> Session {
        let mut s = Session::new(GenerationSettings {
            system_instruction: None,
            temperature: 1.0,
        });
        s.set_resolution(Resolution::explicit("gemini-1.5-flash"));
        s
    }

    const IDLE: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn streamed_turn_accumulates_deltas_in_order() {
        let mut s = session();
        let generator = ScriptedGenerator::new(vec![Ok("Hel"), Ok("lo"), Ok("!")]);
        let mut displays = Vec::new();

        let outcome = run_turn(&mut s, &generator, "hi", ResponseMode::Stream, IDLE, |_, turn| {
            displays.push(turn.display())
        })
        .await
        .unwrap();

        assert!(matches!(outcome, TurnOutcome::Complete(ref t) if t == "Hello!"));
        assert_eq!(displays.len(), 3);
        assert!(displays[1].starts_with("Hello"));
        assert_eq!(s.transcript().len(), 2);
        assert_eq!(s.transcript().last_model_text(), Some("Hello!"));
        assert_eq!(s.turn().state(), TurnState::Complete);
    }

    #[tokio::test]
    async fn prior_turns_are_forwarded_but_not_the_new_prompt() {
        let mut s = session();
        let generator = ScriptedGenerator::new(vec![Ok("ok")]);
        run_turn(&mut s, &generator, "one", ResponseMode::Stream, IDLE, |_, _| {})
            .await
            .unwrap();
        run_turn(&mut s, &generator, "two", ResponseMode::Stream, IDLE, |_, _| {})
            .await
            .unwrap();

        assert_eq!(*generator.seen_history.lock().unwrap(), vec![0, 2]);
        assert_eq!(*generator.seen_prompts.lock().unwrap(), vec!["one", "two"]);
        assert_eq!(s.transcript().len(), 4);
    }

    #[tokio::test]
    async fn unary_mode_records_one_model_turn() {
        let mut s = session();
        let generator = ScriptedGenerator::new(vec![Ok("full "), Ok("answer")]);
        let outcome = run_turn(&mut s, &generator, "q", ResponseMode::Unary, IDLE, |_, _| {})
            .await
            .unwrap();
        assert!(matches!(outcome, TurnOutcome::Complete(ref t) if t == "full answer"));
    }

    #[tokio::test]
    async fn mid_stream_error_keeps_partial_text_and_session_recovers() {
        let mut s = session();
        let generator = ScriptedGenerator::new(vec![
            Ok("partial"),
            Err(ChatError::ApiMessage("quota exceeded".to_string())),
        ]);
        let outcome = run_turn(&mut s, &generator, "q", ResponseMode::Stream, IDLE, |_, _| {})
            .await
            .unwrap();
        match outcome {
            TurnOutcome::Failed { text, .. } => {
                assert!(text.starts_with("partial"));
                assert!(text.contains("quota exceeded"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(s.transcript().turns()[1].role(), Role::Model);

        let ok = ScriptedGenerator::new(vec![Ok("fine")]);
        let outcome = run_turn(&mut s, &ok, "again", ResponseMode::Stream, IDLE, |_, _| {})
            .await
            .unwrap();
        assert!(matches!(outcome, TurnOutcome::Complete(_)));
        assert_eq!(s.transcript().len(), 4);
    }

    #[tokio::test]
    async fn empty_stream_completes_with_notice() {
        let mut s = session();
        let generator = ScriptedGenerator::new(vec![]);
        let outcome = run_turn(&mut s, &generator, "q", ResponseMode::Stream, IDLE, |_, _| {})
            .await
            .unwrap();
        assert!(matches!(outcome, TurnOutcome::Complete(ref t) if t == EMPTY_RESPONSE_NOTICE));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_stream_times_out() {
        let mut s = session();
        let outcome = run_turn(
            &mut s,
            &StalledGenerator,
            "q",
            ResponseMode::Stream,
            Duration::from_secs(1),
            |_, _| {},
        )
        .await
        .unwrap();
        match outcome {
            TurnOutcome::Failed { text, error } => {
                assert_eq!(text, FAILURE_PLACEHOLDER);
                assert!(matches!(error, ChatError::Timeout(1)));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(!s.turn().state().is_busy());
    }

    #[tokio::test]
    async fn submission_without_model_is_refused() {
        let mut s = Session::new(GenerationSettings {
            system_instruction: None,
            temperature: 1.0,
        });
        let generator = ScriptedGenerator::new(vec![Ok("x")]);
        let err = run_turn(&mut s, &generator, "q", ResponseMode::Stream, IDLE, |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NoModel));
        assert!(generator.seen_prompts.lock().unwrap().is_empty());
    }
}
