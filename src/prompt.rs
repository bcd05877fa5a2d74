//! System prompt loading: file override in dev, embedded default otherwise.

use std::fs;
use std::path::PathBuf;

pub const DEFAULT_PROMPT_PATH: &str = "prompts/legal_assistant.txt";
pub const ENV_PROMPT_PATH: &str = "PROMPT_PATH";

const DEFAULT_PROMPT: &str = include_str!("../prompts/legal_assistant.txt");

/// Read the system prompt at startup. Falls back to the embedded template
/// when the file is missing.
pub fn load_system_prompt() -> String {
    let path = std::env::var(ENV_PROMPT_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROMPT_PATH));
    fs::read_to_string(&path).unwrap_or_else(|_| DEFAULT_PROMPT.to_string())
}
