//! # AriaRadio Configuration Module
//!
//! Configuration management for AriaRadio:
//! - Loading configuration from a YAML file
//! - Falling back to the embedded default configuration
//! - Type-safe getters with defaults for every value the application reads
//! - Thread-safe singleton access pattern
//!
//! ## Usage
//!
//! ```no_run
//! use ariaconfig::get_config;
//!
//! let config = get_config();
//! let port = config.get_http_port();
//! let stream_url = config.get_stream_url();
//! println!("Serving on port {port}, streaming {stream_url}");
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::{info, warn};

/// Embedded default configuration
const DEFAULT_CONFIG: &str = include_str!("ariaradio.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load AriaRadio configuration"));
}

const ENV_CONFIG_DIR: &str = "ARIARADIO_CONFIG";
const CONFIG_FILE_NAME: &str = "ariaradio.yaml";

// Default values for configuration
const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_RETRY_INTERVAL_MS: u64 = 1000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const DEFAULT_STREAM_URL: &str = "http://192.168.50.3:8000/stream";
const DEFAULT_METADATA_URL: &str = "http://192.168.50.3:4002/metadata/nowplaying.txt";

/// Configuration manager for AriaRadio
///
/// Holds the parsed YAML tree behind a mutex and persists every `set_value`
/// back to the configuration file.
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        // 1. Provided directory
        if !directory.is_empty() {
            return directory.to_string();
        }

        // 2. Environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Trying to load config from env");
            return env_path;
        }

        // 3. Current directory
        if Path::new(".ariaradio").exists() {
            return ".ariaradio".to_string();
        }

        // 4. Home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(".ariaradio");
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        // Default fallback
        ".ariaradio".to_string()
    }

    /// Validates and prepares a config directory
    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(anyhow!("Config path is not a directory"));
        }

        // Test write permission
        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")?;
        fs::remove_file(&test_file)?;

        Ok(())
    }

    /// Load the configuration from `directory` (resolved as documented on
    /// [`Config::find_config_dir`] when empty). A missing file falls back to
    /// the embedded defaults, which are written out for future editing.
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::find_config_dir(directory);
        let dir_path = Path::new(&config_dir);
        Self::validate_config_dir(dir_path)?;

        let path = dir_path.join(CONFIG_FILE_NAME);
        let data: Value = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content)?
        } else {
            info!(path = %path.display(), "No configuration file, writing defaults");
            fs::write(&path, DEFAULT_CONFIG)?;
            serde_yaml::from_str(DEFAULT_CONFIG)?
        };

        Ok(Self {
            config_dir,
            path: path.to_string_lossy().to_string(),
            data: Mutex::new(data),
        })
    }

    /// The resolved configuration directory
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Get a value by dotted path (e.g. `"stream.url"`). Missing keys yield
    /// `Value::Null`.
    pub fn get_value(&self, path: &str) -> Result<Value> {
        let data = self
            .data
            .lock()
            .map_err(|_| anyhow!("Config lock poisoned"))?;

        let mut current = &*data;
        for key in path.split('.') {
            match current.get(key) {
                Some(value) => current = value,
                None => return Ok(Value::Null),
            }
        }
        Ok(current.clone())
    }

    /// Set a value by dotted path, creating intermediate mappings as needed,
    /// and persist the file.
    pub fn set_value(&self, path: &str, value: Value) -> Result<()> {
        {
            let mut data = self
                .data
                .lock()
                .map_err(|_| anyhow!("Config lock poisoned"))?;

            let mut current = &mut *data;
            let keys: Vec<&str> = path.split('.').collect();
            for key in &keys[..keys.len() - 1] {
                if !current.is_mapping() {
                    *current = Value::Mapping(Mapping::new());
                }
                let map = current
                    .as_mapping_mut()
                    .ok_or_else(|| anyhow!("Config node is not a mapping"))?;
                let entry = Value::String((*key).to_string());
                if !map.contains_key(&entry) {
                    map.insert(entry.clone(), Value::Mapping(Mapping::new()));
                }
                current = map
                    .get_mut(&entry)
                    .ok_or_else(|| anyhow!("Config node vanished"))?;
            }

            let last = keys
                .last()
                .ok_or_else(|| anyhow!("Empty configuration path"))?;
            if !current.is_mapping() {
                *current = Value::Mapping(Mapping::new());
            }
            current
                .as_mapping_mut()
                .ok_or_else(|| anyhow!("Config node is not a mapping"))?
                .insert(Value::String((*last).to_string()), value);
        }
        self.save()
    }

    fn save(&self) -> Result<()> {
        let data = self
            .data
            .lock()
            .map_err(|_| anyhow!("Config lock poisoned"))?;
        let content = serde_yaml::to_string(&*data)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    // ========================================================================
    // Typed getters
    // ========================================================================

    /// Live audio stream URL
    pub fn get_stream_url(&self) -> String {
        match self.get_value("stream.url") {
            Ok(Value::String(url)) => url,
            _ => DEFAULT_STREAM_URL.to_string(),
        }
    }

    /// Codec fallback hints (short names, e.g. "mp3", "aac")
    pub fn get_stream_formats(&self) -> Vec<String> {
        match self.get_value("stream.formats") {
            Ok(Value::Sequence(seq)) => seq
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => vec!["mp3".to_string(), "aac".to_string()],
        }
    }

    /// Reconnect period in milliseconds
    pub fn get_retry_interval_ms(&self) -> u64 {
        self.get_u64("session.retry_interval_ms", DEFAULT_RETRY_INTERVAL_MS)
    }

    /// Now-playing resource URL
    pub fn get_metadata_url(&self) -> String {
        match self.get_value("metadata.url") {
            Ok(Value::String(url)) => url,
            _ => DEFAULT_METADATA_URL.to_string(),
        }
    }

    /// Now-playing poll interval in milliseconds
    pub fn get_metadata_poll_ms(&self) -> u64 {
        self.get_u64("metadata.poll_interval_ms", DEFAULT_POLL_INTERVAL_MS)
    }

    /// HTTP port of the command/status surface. A configured value outside
    /// the valid port range falls back to the default.
    pub fn get_http_port(&self) -> u16 {
        let port = self.get_u64("server.port", DEFAULT_HTTP_PORT as u64);
        u16::try_from(port).unwrap_or_else(|_| {
            warn!(port, "Configured HTTP port out of range, using default");
            DEFAULT_HTTP_PORT
        })
    }

    /// Update the HTTP port
    pub fn set_http_port(&self, port: u16) -> Result<()> {
        self.set_value(
            "server.port",
            Value::Number(serde_yaml::Number::from(port as u64)),
        )
    }

    fn get_u64(&self, path: &str, default: u64) -> u64 {
        match self.get_value(path) {
            Ok(Value::Number(n)) => n.as_u64().unwrap_or(default),
            _ => default,
        }
    }
}

/// Get the global configuration singleton
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}
