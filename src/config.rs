//! Interpreter settings, resolved from flags, environment and an optional
//! `bf.toml` in the user's config directory (in that order of precedence).
//!
//! The file only needs an `[interpreter]` section with `key = value` lines:
//!
//! ```toml
//! [interpreter]
//! cell_size = 16
//! memory_size = 65536
//! runtime_units = "us"
//! eof = "zero"
//! ```

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use cross_xdg::BaseDirs;
use tracing::debug;

use crate::executor::EofPolicy;
use crate::tape::{CellWidth, DEFAULT_MEMORY_SIZE, MAX_MEMORY_SIZE};
use crate::timing::TimeUnit;

/// Env var naming an explicit config file, bypassing the XDG lookup.
pub const CONFIG_PATH_ENV: &str = "BF_CONFIG";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config error: invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Fully resolved settings for one interpreter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub cell_width: CellWidth,
    pub memory_size: usize,
    pub runtime_units: TimeUnit,
    pub eof: EofPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_width: CellWidth::Eight,
            memory_size: DEFAULT_MEMORY_SIZE,
            runtime_units: TimeUnit::Milliseconds,
            eof: EofPolicy::Error,
        }
    }
}

/// Values given explicitly on the command line; `None` falls through to
/// the environment, then the config file, then the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub cell_width: Option<CellWidth>,
    pub memory_size: Option<usize>,
    pub runtime_units: Option<TimeUnit>,
    pub eof: Option<EofPolicy>,
}

impl Config {
    /// Resolve against the real process environment and config file.
    pub fn load(flags: &Overrides) -> Result<Self, ConfigError> {
        let file = config_path()
            .and_then(|path| {
                let content = fs::read_to_string(&path).ok()?;
                debug!(path = %path.display(), "loaded config file");
                Some(parse_file(&content))
            })
            .unwrap_or_default();
        Self::resolve(flags, |key| env::var(key).ok(), &file)
    }

    /// Resolve with an injectable environment lookup and parsed file.
    pub fn resolve<E>(
        flags: &Overrides,
        env: E,
        file: &HashMap<String, String>,
    ) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let layers = Layers { env: &env, file };
        Ok(Self {
            cell_width: layers.pick(
                flags.cell_width,
                "BF_CELL_SIZE",
                "cell_size",
                |s| s.parse(),
                defaults.cell_width,
            )?,
            memory_size: layers.pick(
                flags.memory_size,
                "BF_MEMORY_SIZE",
                "memory_size",
                parse_memory_size,
                defaults.memory_size,
            )?,
            runtime_units: layers.pick(
                flags.runtime_units,
                "BF_RUNTIME_UNITS",
                "runtime_units",
                |s| s.parse(),
                defaults.runtime_units,
            )?,
            eof: layers.pick(flags.eof, "BF_EOF", "eof", |s| s.parse(), defaults.eof)?,
        })
    }
}

struct Layers<'a, E> {
    env: &'a E,
    file: &'a HashMap<String, String>,
}

impl<E: Fn(&str) -> Option<String>> Layers<'_, E> {
    fn pick<T>(
        &self,
        flag: Option<T>,
        env_key: &str,
        file_key: &str,
        parse: impl Fn(&str) -> Result<T, String>,
        default: T,
    ) -> Result<T, ConfigError> {
        if let Some(v) = flag {
            return Ok(v);
        }
        let (key, raw) = match (self.env)(env_key) {
            Some(raw) => (env_key.to_string(), raw),
            None => match self.file.get(file_key) {
                Some(raw) => (format!("{file_key} in bf.toml"), raw.clone()),
                None => return Ok(default),
            },
        };
        parse(&raw).map_err(|reason| ConfigError::Invalid { key, value: raw, reason })
    }
}

/// Parse a cell count; must be at least one and at most [`MAX_MEMORY_SIZE`].
pub fn parse_memory_size(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("memory size must be at least 1 cell".to_string()),
        Ok(n) if n > MAX_MEMORY_SIZE => Err(format!("memory size must be at most {MAX_MEMORY_SIZE} cells")),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("memory size must be a positive integer ({e})")),
    }
}

/// `$BF_CONFIG`, or `bf.toml` under the XDG config home.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(explicit) = env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(explicit));
    }

    let base_dirs = BaseDirs::new().ok()?;

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let config_home = base_dirs.config_home();

    let mut path = PathBuf::from(config_home);
    path.push("bf.toml");
    Some(path)
}

/// Collect `key = value` pairs from the `[interpreter]` section. Values may
/// be quoted; comments and other sections are skipped.
pub fn parse_file(content: &str) -> HashMap<String, String> {
    let mut in_section = false;
    let mut map = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_section = &line[1..line.len() - 1] == "interpreter";
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((key, val_raw)) = line.split_once('=') {
            let val_raw = val_raw.trim();
            let val = val_raw
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(val_raw);
            map.insert(key.trim().to_string(), val.to_string());
        }
    }
    map
}
