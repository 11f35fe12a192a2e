pub mod chart;
pub mod config;

pub use config::api_key::{ApiKey, KeySource};
pub use config::state::{State, WindowSpec};
pub use config::theme::Theme;

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

pub const SAVED_STATE_PATH: &str = "saved-state.json";

#[derive(thiserror::Error, Debug, Clone)]
pub enum InternalError {
    #[error("Filesystem error: {0}")]
    Fs(String),
    #[error("Serialization error: {0}")]
    Serde(String),
}

pub fn write_json_to_file(json: &str, file_name: &str) -> Result<(), InternalError> {
    let path = data_path(Some(file_name));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| InternalError::Fs(e.to_string()))?;
    }

    let mut file = File::create(&path).map_err(|e| InternalError::Fs(e.to_string()))?;
    file.write_all(json.as_bytes())
        .map_err(|e| InternalError::Fs(e.to_string()))?;

    Ok(())
}

pub fn read_from_file(file_name: &str) -> Result<State, InternalError> {
    let path = data_path(Some(file_name));

    let mut file = File::open(&path).map_err(|e| InternalError::Fs(e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| InternalError::Fs(e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| InternalError::Serde(e.to_string()))
}

/// Loads the saved state, falling back to defaults on any problem.
pub fn load_saved_state() -> State {
    match read_from_file(SAVED_STATE_PATH) {
        Ok(state) => state,
        Err(InternalError::Fs(e)) => {
            log::info!("No saved state ({e}), starting with defaults");
            State::default()
        }
        Err(e) => {
            log::warn!("Failed to load saved state, starting with defaults: {e}");
            State::default()
        }
    }
}

pub fn save_state(state: &State) -> Result<(), InternalError> {
    let json =
        serde_json::to_string_pretty(state).map_err(|e| InternalError::Serde(e.to_string()))?;

    write_json_to_file(&json, SAVED_STATE_PATH)
}

/// Application data directory, or a file inside it.
///
/// `TICKER_VIEW_DATA_PATH` overrides the platform default.
pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let base = if let Ok(path) = std::env::var("TICKER_VIEW_DATA_PATH") {
        PathBuf::from(path)
    } else {
        dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ticker-view")
    };

    match path_name {
        Some(name) => base.join(name),
        None => base,
    }
}
