//! Full-screen chat with the resolved Gemini model.

mod app;
mod constants;
mod draw;
mod handlers;
mod shortcuts;
mod text;

use crossterm::event::{self, Event};
use crossterm::execute;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::core::chat::GenerationSettings;
use crate::core::config::Config;

use app::App;
use draw::draw;
use handlers::{HandleResult, PendingChat, PendingResolution};

/// Guard that restores terminal state on drop (including on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
        let _ = execute!(
            std::io::stdout(),
            crossterm::event::PopKeyboardEnhancementFlags
        );
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the TUI loop. Uses a dedicated Tokio runtime for resolution and chat calls.
pub fn run(config: Arc<Config>) -> io::Result<()> {
    use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, enable_raw_mode};
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    let _guard = TerminalGuard;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    execute!(stdout, Clear(ClearType::All))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let rt = Arc::new(
        Runtime::new().map_err(|e| io::Error::other(format!("Failed to create runtime: {}", e)))?,
    );

    // Shift+Enter is only distinguishable with the kitty keyboard protocol.
    let _ = execute!(
        io::stdout(),
        crossterm::event::PushKeyboardEnhancementFlags(
            crossterm::event::KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        )
    );

    let mut config = config;
    let mut app = App::new(GenerationSettings::from_config(&config));
    app.start_resolution();
    let mut pending_resolution: Option<PendingResolution> =
        Some(handlers::spawn_resolution(&rt, Arc::clone(&config)));
    let mut pending_chat: Option<PendingChat> = None;

    loop {
        if let Some(ref rx) = pending_resolution
            && let Ok(result) = rx.try_recv()
        {
            match &result {
                Ok(r) => log::info!("session model: {}", r.model),
                Err(e) => log::error!("model resolution failed: {}", e),
            }
            app.apply_resolution(result);
            pending_resolution = None;
        }

        if let Some(ref chat) = pending_chat {
            while let Ok(chunk) = chat.stream_rx.try_recv() {
                app.push_chunk(&chunk);
            }
            if let Ok(result) = chat.result_rx.try_recv() {
                // The worker sends every delta before the result.
                while let Ok(chunk) = chat.stream_rx.try_recv() {
                    app.push_chunk(&chunk);
                }
                app.finish_turn(result);
                pending_chat = None;
            }
        }

        terminal.draw(|f| draw(f, &mut app, f.area()))?;

        if event::poll(Duration::from_millis(constants::EVENT_POLL_TIMEOUT_MS))?
            && let Event::Key(key) = event::read()?
        {
            let result = handlers::handle_key(
                key,
                handlers::HandleKeyContext {
                    app: &mut app,
                    config: &mut config,
                    pending_chat: &mut pending_chat,
                    pending_resolution: &mut pending_resolution,
                    rt: &rt,
                },
            );
            if result == HandleResult::Break {
                break;
            }
        }
    }

    terminal.show_cursor()?;
    Ok(())
}
