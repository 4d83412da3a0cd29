//! Application run modes: logger init, single prompt, compose, TUI launch.

use std::io::{self, Write};
use std::sync::Arc;

use crate::cli::{Args, ComposeArgs};
use crate::core;
use crate::core::chat::{
    DualOutput, GenerationSettings, ResponseMode, Session, TurnOutcome, run_turn, split_dual,
};
use crate::core::config::Config;
use crate::core::llm::GeminiClient;
use crate::core::models::{FailureMode, Resolution, ResolveError, resolve_for_config};
use crate::core::prompt::{self, GenerationRequest, LanguageSpec};
use crate::core::templates::TemplateForm;

/// Initialize env_logger. In TUI mode, writes to file to avoid corrupting the display.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.is_tui()
        && let Some(dir) = core::paths::cache_dir()
        && std::fs::create_dir_all(&dir).is_ok()
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("{}.log", core::app::NAME)))
    {
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    let _ = logger.try_init();
}

/// Message shown when no model can be used with the current credential.
pub fn blocking_message(e: &ResolveError) -> String {
    match e {
        ResolveError::InvalidCredential(_) | ResolveError::AllCandidatesFailed { .. } => format!(
            "{}\nGeneration is disabled. Set a working key with GEMINI_API_KEY or `{} config set-api-key`.",
            e,
            core::app::NAME
        ),
        other => format!("Could not select a model: {}", other),
    }
}

/// Resolve the session model or exit with a blocking message. Degraded
/// resolutions print their warning to stderr.
async fn resolve_or_exit(config: &Config, client: &GeminiClient) -> Resolution {
    match resolve_for_config(config, client, FailureMode::Degrade).await {
        Ok(resolution) => {
            if let Some(w) = &resolution.warning {
                eprintln!("Warning: {}", w);
            }
            resolution
        }
        Err(e) => {
            eprintln!("Error: {}", blocking_message(&e));
            std::process::exit(1);
        }
    }
}

fn read_prompt(arg: &str) -> io::Result<String> {
    if arg == "-" {
        io::read_to_string(io::stdin())
    } else {
        Ok(arg.to_string())
    }
}

fn response_mode(args: &Args) -> ResponseMode {
    if args.no_stream {
        ResponseMode::Unary
    } else {
        ResponseMode::Stream
    }
}

/// Print a failure the way every blocking path does and exit non-zero.
fn exit_with_error(e: &dyn std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// Send one prompt in a fresh session. Streamed deltas go straight to stdout
/// unless `print_deltas` is false. Returns the final text; a failed turn exits.
async fn send_once(
    config: &Config,
    prompt: &str,
    mode: ResponseMode,
    print_deltas: bool,
) -> String {
    let client = GeminiClient::new(config);
    let mut session = Session::new(GenerationSettings::from_config(config));
    session.set_resolution(resolve_or_exit(config, &client).await);

    let stream_to_stdout = print_deltas && mode == ResponseMode::Stream;
    let outcome = run_turn(
        &mut session,
        &client,
        prompt,
        mode,
        config.request_timeout,
        |delta, _| {
            if stream_to_stdout {
                let _ = io::stdout().write_all(delta.as_bytes());
                let _ = io::stdout().flush();
            }
        },
    )
    .await
    .unwrap_or_else(|e| exit_with_error(&e));

    if stream_to_stdout {
        println!();
    }
    match outcome {
        TurnOutcome::Complete(text) => text,
        TurnOutcome::Failed { error, .. } => exit_with_error(&error),
    }
}

/// Run single prompt mode: print the response to stdout.
pub async fn run_single_prompt(
    args: &Args,
    prompt_arg: &str,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = read_prompt(prompt_arg)?;
    let prompt = prompt.trim();
    if prompt.is_empty() {
        eprintln!("Error: empty prompt");
        std::process::exit(1);
    }

    let mode = response_mode(args);
    let text = send_once(config, prompt, mode, true).await;
    if mode == ResponseMode::Unary {
        println!("{}", text);
    }
    Ok(())
}

/// Fill a form from the template (if any) and the explicit flags.
pub fn build_request(compose: &ComposeArgs) -> Result<GenerationRequest, String> {
    let mut form = TemplateForm::default();
    if let Some(name) = &compose.template {
        let catalog = core::cli::load_catalog();
        let template = catalog
            .find(name)
            .ok_or_else(|| format!("unknown template '{}'", name))?;
        form.select(template);
    }
    if let Some(persona) = &compose.persona {
        form.set_persona(persona.clone());
    }
    if let Some(task) = &compose.task {
        form.set_task(task.clone());
    }
    if !compose.tags.is_empty() {
        form.set_tags(compose.tags.clone());
    }
    form.context = compose.context.clone().unwrap_or_default();
    form.tone = compose.tone.clone().unwrap_or_default();
    form.output_format = compose.format;

    if compose.lang.is_some() || compose.source_lang.is_some() || compose.target_lang.is_some() {
        let defaults = LanguageSpec::default();
        form.language = Some(LanguageSpec {
            mode: compose.lang.unwrap_or_default(),
            source: compose.source_lang.clone().unwrap_or(defaults.source),
            target: compose.target_lang.clone().unwrap_or(defaults.target),
        });
    }
    log::debug!("compose form built from template {:?}", form.selected());
    Ok(form.to_request())
}

/// Validate a request, printing warnings. Returns false when submission must stop.
fn check_warnings(request: &GenerationRequest, force: bool) -> bool {
    let warnings = prompt::validate(request);
    let mut blocked = false;
    for w in &warnings {
        eprintln!("Warning: {}", w);
        blocked |= w.blocks_submission();
    }
    if blocked && !force {
        eprintln!("Error: add --task (or pick a template), or pass --force to send anyway");
        return false;
    }
    true
}

/// Run the `compose` command. `--dry-run` needs no credential.
pub async fn run_compose(
    args: &Args,
    compose: &ComposeArgs,
    config: Option<&Config>,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = match build_request(compose) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let text = prompt::compose(&request);
    let parsed = prompt::parse_sections(&text);
    log::debug!(
        "composed prompt: persona={:?} task={:?} tone={:?} constraints={}",
        parsed.persona(),
        parsed.task(),
        parsed.tone(),
        parsed.tags().len()
    );

    if compose.dry_run {
        println!("{}", text);
        return Ok(());
    }
    if !check_warnings(&request, compose.force) {
        std::process::exit(2);
    }
    let Some(config) = config else {
        return Err("configuration is required to send a prompt".into());
    };

    if !request.is_dual() {
        let mode = response_mode(args);
        let answer = send_once(config, &text, mode, true).await;
        if mode == ResponseMode::Unary {
            println!("{}", answer);
        }
        return Ok(());
    }

    // Dual-language output is split only once the full text is in.
    let answer = send_once(config, &text, response_mode(args), false).await;
    let languages = request.language.unwrap_or_default();
    match split_dual(&answer) {
        DualOutput::Split { first, second } => {
            println!("[{}]\n{}\n", languages.source.trim(), first);
            println!("[{}]\n{}", languages.target.trim(), second);
        }
        DualOutput::Single(text) => {
            eprintln!("Warning: the response did not contain two language variants");
            println!("{}", text);
        }
    }
    Ok(())
}

/// Launch the TUI in a blocking thread. Returns on panic or IO error.
pub async fn launch_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(config);
    let join_result: Result<io::Result<()>, tokio::task::JoinError> =
        tokio::task::spawn_blocking(move || crate::tui::run(config)).await;

    match join_result {
        Ok(io_result) => io_result?,
        Err(join_err) => {
            if let Ok(panic) = join_err.try_into_panic() {
                let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("{:?}", panic)
                };
                eprintln!("TUI panic: {}", msg);
            }
            return Err(
                Box::new(io::Error::other("TUI thread panicked")) as Box<dyn std::error::Error>
            );
        }
    }
    Ok(())
}
