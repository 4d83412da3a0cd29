//! Build script: validates builtin-templates.json at compile time.

use std::path::PathBuf;

fn main() {
    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR set by Cargo");
    let config_path: PathBuf = [&manifest_dir, "config", "builtin-templates.json"]
        .iter()
        .collect();
    println!("cargo:rerun-if-changed={}", config_path.display());
    let json = std::fs::read_to_string(&config_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read {}: {}. builtin-templates.json must exist and be valid.",
            config_path.display(),
            e
        )
    });
    #[derive(serde::Deserialize)]
    #[allow(dead_code)]
    struct BuiltinTemplateEntry {
        name: String,
        description: String,
        persona: String,
        task: String,
        #[serde(default)]
        tags: Vec<String>,
    }
    let entries: Vec<BuiltinTemplateEntry> = serde_json::from_str(&json).unwrap_or_else(|e| {
        panic!(
            "builtin-templates.json is invalid JSON: {}. Fix the file and rebuild.",
            e
        )
    });
    let mut seen = std::collections::HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.name.to_lowercase()) {
            panic!("builtin-templates.json: duplicate template name '{}'", entry.name);
        }
        if entry.task.trim().is_empty() {
            panic!("builtin-templates.json: template '{}' has an empty task", entry.name);
        }
    }
}
