//! CLI-only commands: config info, key storage, model listing, templates.
//!
//! These run without opening the TUI and produce plain text output.

use std::io::{self, Read};

use crate::core::api_key;
use crate::core::app;
use crate::core::config::{self, Config, ConfigError};
use crate::core::llm::GeminiClient;
use crate::core::models::{
    self, GeminiModelLister, ModelInfo, ModelLister, Probe, ProbeTable, ResolveError,
};
use crate::core::paths;
use crate::core::templates::{Template, TemplateCatalog};

fn display_path(path: Option<std::path::PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Run the `config` command: paths, endpoints, credential source, resolution policy.
pub fn run_config() {
    println!("Config:       {}", display_path(paths::config_dir()));
    println!("Templates:    {}", display_path(paths::templates_path()));
    println!(
        "Log file:     {}",
        display_path(paths::cache_dir().map(|d| d.join(format!("{}.log", app::NAME))))
    );

    match config::load() {
        Ok(c) => {
            let model = match &c.model_id {
                Some(m) => m.clone(),
                None => format!("auto ({} policy)", c.resolve_policy),
            };
            println!("API key:      set ({})", c.key_source);
            println!("Model:        {}", model);
            println!("Fallback:     {}", c.fallback_model);
            println!("Temperature:  {}", c.temperature);
            println!("Timeout:      {}s", c.request_timeout.as_secs());
            println!("Listing API:  {}", c.api_base);
            println!("Chat API:     {}", c.openai_base);
        }
        Err(ConfigError::MissingApiKey) => {
            println!("API key:      not set");
        }
        Err(e) => {
            println!("API key:      unknown");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run the `config set-api-key` command: store the key (argument or stdin).
pub fn run_config_set_api_key(api_key: Option<String>) {
    let key = match api_key {
        Some(k) if !k.trim().is_empty() => k.trim().to_string(),
        _ => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
            let trimmed = buf.trim().to_string();
            if trimmed.is_empty() {
                eprintln!("Error: no API key provided");
                std::process::exit(1);
            }
            trimmed
        }
    };

    match api_key::store_api_key(&key) {
        Ok(path) => println!("API key saved to {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Generation-capable models in priority order.
fn ranked_models(models: &[ModelInfo]) -> Vec<&ModelInfo> {
    models::rank_candidates(models)
        .iter()
        .filter_map(|id| models.iter().find(|m| &m.id == id))
        .collect()
}

fn exit_on_resolve_error(e: ResolveError) -> ! {
    eprintln!("Error: {}", e);
    if matches!(e, ResolveError::InvalidCredential(_)) {
        eprintln!("Set a valid key with GEMINI_API_KEY or `{} config set-api-key`.", app::NAME);
    }
    std::process::exit(1);
}

/// Run the `models` command. Listing policy prints ranked candidates; `probe`
/// pings each entry of the probe table and reports which ones answer.
pub async fn run_models(config: &Config, probe: bool, query: Option<&str>) {
    if probe {
        run_models_probe(config).await;
        return;
    }

    let lister = GeminiModelLister::new(config).unwrap_or_else(|e| exit_on_resolve_error(e));
    let all = lister
        .list_models()
        .await
        .unwrap_or_else(|e| exit_on_resolve_error(e));
    let matching: Vec<ModelInfo> = match query {
        Some(q) => models::filter_models(&all, q).into_iter().cloned().collect(),
        None => all.clone(),
    };
    let filtered = ranked_models(&matching);

    if filtered.is_empty() {
        println!("No models found.");
        return;
    }

    let id_w = filtered.iter().map(|m| m.id.len()).max().unwrap_or(20).max(20);
    let name_w = filtered
        .iter()
        .map(|m| m.display_name.len())
        .max()
        .unwrap_or(30)
        .max(30);

    println!("{:<id_w$}  {:<name_w$}  {:>7}", "ID", "Name", "Tier");
    println!("{}  {}  -------", "-".repeat(id_w), "-".repeat(name_w));
    for m in &filtered {
        let tier = models::tier_of(&m.id).to_string();
        println!("{:<id_w$}  {:<name_w$}  {:>7}", m.id, m.display_name, tier);
    }

    println!(
        "\n{} model(s) listed ({} reported by the provider)",
        filtered.len(),
        all.len()
    );
}

async fn run_models_probe(config: &Config) {
    let client = GeminiClient::new(config);
    let table = ProbeTable::default();
    let mut selected: Option<&str> = None;

    for candidate in table.candidates() {
        match client.probe(candidate).await {
            Ok(()) => {
                println!("{:<28}  ok", candidate);
                selected.get_or_insert(candidate.as_str());
            }
            Err(ResolveError::InvalidCredential(msg)) => {
                exit_on_resolve_error(ResolveError::InvalidCredential(msg))
            }
            Err(e) => println!("{:<28}  failed: {}", candidate, e),
        }
    }

    match selected {
        Some(model) => println!("\nSelected: {}", model),
        None => {
            eprintln!("\nNo candidate answered; generation is blocked for this key.");
            std::process::exit(1);
        }
    }
}

/// Load the template catalog, printing a warning if user templates were skipped.
pub fn load_catalog() -> TemplateCatalog {
    let (catalog, warning) = TemplateCatalog::load();
    if let Some(msg) = warning {
        eprintln!("Warning: {}", msg);
    }
    catalog
}

/// Run the `templates` command: list built-in and user templates.
pub fn run_templates(query: Option<&str>) {
    let catalog = load_catalog();
    let templates: Vec<&Template> = match query {
        Some(q) => catalog.filter(q),
        None => catalog.all().iter().collect(),
    };
    if templates.is_empty() {
        println!("No templates found.");
        return;
    }
    let name_w = templates.iter().map(|t| t.name.len()).max().unwrap_or(12).max(12);
    for t in templates {
        let origin = if t.is_custom { "user" } else { "built-in" };
        println!("{:<name_w$}  {:<8}  {}", t.name, origin, t.description);
    }
}

fn print_template(t: &Template) {
    println!("Name:        {}", t.name);
    if !t.description.is_empty() {
        println!("Description: {}", t.description);
    }
    println!("Persona:     {}", t.persona);
    println!("Task:        {}", t.task);
    if !t.tags.is_empty() {
        println!("Tags:");
        for tag in &t.tags {
            println!("  - {}", tag);
        }
    }
}

/// Run the `templates show <name>` command.
pub fn run_template_show(name: &str) {
    let catalog = load_catalog();
    match catalog.find(name) {
        Some(t) => print_template(t),
        None => {
            eprintln!("Error: unknown template '{}'", name);
            std::process::exit(1);
        }
    }
}
