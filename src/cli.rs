//! CLI definitions: argument parsing, subcommands, and help text.

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

use crate::core::prompt::{LanguageMode, OutputFormat};

const AFTER_HELP: &str = "\
EXAMPLES:
  gemini-studio                         Launch interactive chat (TUI)
  gemini-studio -p \"explain X\"          Single prompt, stream response to stdout
  gemini-studio -p - < notes.txt        Read prompt from stdin
  gemini-studio compose -t translator --context \"Bonjour\" --lang dual
  gemini-studio compose --task \"Plan a trip\" --format bullets --dry-run
  gemini-studio models --probe          Ping the probe candidates with your key
  gemini-studio templates show email    Show a template's defaults
  gemini-studio config set-api-key      Store a key read from stdin
  gemini-studio completions zsh         Generate zsh completions
";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Chat and prompt composer for Gemini models",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Send a single prompt then exit (without opening the TUI)
    #[arg(
        short = 'p',
        long,
        help = "Provide a prompt to get an immediate response (use '-' to read from stdin)"
    )]
    pub prompt: Option<String>,

    /// Use this model instead of resolving one
    #[arg(short = 'm', long, global = true, help = "Model ID (e.g. gemini-1.5-flash)")]
    pub model: Option<String>,

    /// Disable streaming in prompt mode (wait for full response before printing)
    #[arg(
        long,
        global = true,
        help = "Wait for the full response instead of streaming"
    )]
    pub no_stream: bool,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a prompt from a template and structured fields, then send it
    Compose(ComposeArgs),
    /// List generation-capable models in priority order
    Models {
        /// Probe the fixed candidate table instead of listing
        #[arg(long)]
        probe: bool,
        /// Filter models by id or name
        #[arg(long)]
        query: Option<String>,
    },
    /// List prompt templates
    Templates {
        #[command(subcommand)]
        subcommand: Option<TemplatesSubcommand>,
        /// Filter templates by name or description
        #[arg(long)]
        query: Option<String>,
    },
    /// Show config paths, endpoints, and API key status
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum TemplatesSubcommand {
    /// Show one template's persona, task and tags
    Show { name: String },
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Store the API key in the config directory (reads stdin when omitted)
    SetApiKey { api_key: Option<String> },
}

#[derive(ClapArgs, Debug, Default)]
pub struct ComposeArgs {
    /// Template that pre-fills persona, task and tags
    #[arg(short = 't', long)]
    pub template: Option<String>,
    /// Who the model should act as
    #[arg(long)]
    pub persona: Option<String>,
    /// What the model should do
    #[arg(long)]
    pub task: Option<String>,
    /// Free-text background or input material
    #[arg(long)]
    pub context: Option<String>,
    /// Constraint tag (repeatable); replaces the template's tags
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub tone: Option<String>,
    /// paragraphs, bullets, table, json or markdown
    #[arg(long)]
    pub format: Option<OutputFormat>,
    /// source, target or dual
    #[arg(long)]
    pub lang: Option<LanguageMode>,
    #[arg(long, value_name = "LANGUAGE")]
    pub source_lang: Option<String>,
    #[arg(long, value_name = "LANGUAGE")]
    pub target_lang: Option<String>,
    /// Print the composed prompt and exit without calling the API
    #[arg(long)]
    pub dry_run: bool,
    /// Send even when validation reports a blocking warning
    #[arg(long)]
    pub force: bool,
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// No prompt and no subcommand: the interactive chat.
    pub fn is_tui(&self) -> bool {
        self.prompt.is_none() && self.command.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags_map_to_levels() {
        assert_eq!(Args::parse_from(["gemini-studio"]).log_level(), "warn");
        assert_eq!(Args::parse_from(["gemini-studio", "-vv"]).log_level(), "debug");
        assert_eq!(Args::parse_from(["gemini-studio", "-q", "-v"]).log_level(), "error");
    }

    #[test]
    fn compose_parses_selectors() {
        let args = Args::parse_from([
            "gemini-studio",
            "compose",
            "--task",
            "t",
            "--tag",
            "a",
            "--tag",
            "b",
            "--format",
            "json",
            "--lang",
            "dual",
            "--dry-run",
        ]);
        match args.command {
            Some(Commands::Compose(c)) => {
                assert_eq!(c.tags, vec!["a", "b"]);
                assert_eq!(c.format, Some(OutputFormat::Json));
                assert_eq!(c.lang, Some(LanguageMode::Dual));
                assert!(c.dry_run);
            }
            _ => panic!("expected compose"),
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["gemini-studio", "compose", "--format", "xml"]).is_err());
    }

    #[test]
    fn no_arguments_means_tui() {
        assert!(Args::parse_from(["gemini-studio"]).is_tui());
        assert!(!Args::parse_from(["gemini-studio", "-p", "hi"]).is_tui());
        assert!(!Args::parse_from(["gemini-studio", "models"]).is_tui());
    }
}
