pub mod api_key;
pub mod app;
pub mod chat;
pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod paths;
pub mod prompt;
pub mod templates;
pub mod util;
