use std::path::{Path, PathBuf};

pub const ENV_VAR: &str = "STOCK_API_KEY";
pub const CONFIG_FILE: &str = "config.properties";
pub const CONFIG_KEY: &str = "stock.api.key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    ConfigFile(PathBuf),
    Missing,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Environment => write!(f, "environment variable {ENV_VAR}"),
            KeySource::ConfigFile(path) => write!(f, "{}", path.display()),
            KeySource::Missing => write!(f, "nowhere"),
        }
    }
}

/// Provider API key, resolved once at startup and handed to whoever fetches.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
    source: KeySource,
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &if self.is_missing() { "" } else { "<hidden>" })
            .field("source", &self.source)
            .finish()
    }
}

impl ApiKey {
    /// Environment first, then `config.properties` in the working directory,
    /// then the one in the data directory.
    pub fn resolve() -> Self {
        let files = [PathBuf::from(CONFIG_FILE), crate::data_path(Some(CONFIG_FILE))];

        Self::resolve_with(|name| std::env::var(name).ok(), &files)
    }

    pub fn resolve_with(env: impl Fn(&str) -> Option<String>, files: &[PathBuf]) -> Self {
        if let Some(value) = env(ENV_VAR).filter(|v| !v.is_empty()) {
            return Self {
                value,
                source: KeySource::Environment,
            };
        }

        for path in files {
            match read_property(path, CONFIG_KEY) {
                Some(value) if !value.is_empty() => {
                    return Self {
                        value,
                        source: KeySource::ConfigFile(path.clone()),
                    };
                }
                _ => continue,
            }
        }

        Self::missing()
    }

    pub fn missing() -> Self {
        Self {
            value: String::new(),
            source: KeySource::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> &KeySource {
        &self.source
    }
}

fn read_property(path: &Path, key: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => property(&contents, key),
        Err(e) => {
            log::debug!("Skipping {}: {e}", path.display());
            None
        }
    }
}

/// Value of `key` in `.properties` text: `key=value` or `key: value` lines,
/// `#` and `!` comments.
pub fn property(contents: &str, key: &str) -> Option<String> {
    contents
        .lines()
        .map(str::trim_start)
        .filter(|line| !line.is_empty() && !line.starts_with(['#', '!']))
        .find_map(|line| {
            let (k, v) = line.split_once(['=', ':'])?;
            (k.trim() == key).then(|| v.trim().to_string())
        })
}
