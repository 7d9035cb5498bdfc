// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Configuration file and environment overrides.
//!
//! `~/.config/flowgen/config.toml`, all keys optional:
//!
//! ```toml
//! endpoint = "http://127.0.0.1:8000/generate_flowchart"
//! export_dir = "."
//! log_path = "/home/me/.config/flowgen/logs"
//! debug = false
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

use crate::api::DEFAULT_ENDPOINT;

pub const ENDPOINT_ENV: &str = "FLOWGEN_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Full URL of the generation endpoint.
    pub endpoint: String,
    /// Directory `flowchart.png` is written to.
    pub export_dir: PathBuf,
    /// Directory for log files.
    pub log_path: PathBuf,
    /// Log at debug level.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            export_dir: PathBuf::from("."),
            log_path: config_dir().join("logs"),
            debug: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    Endpoint { endpoint: String, reason: String },
    #[error("invalid env {name}: value is not unicode")]
    Env { name: &'static str },
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Loads `path`, or the default path when `None`. A missing default file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path, true),
            None => Self::read(&Self::default_path(), false),
        }
    }

    fn read(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };

        Self::parse(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies `FLOWGEN_ENDPOINT` when set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        match std::env::var(ENDPOINT_ENV) {
            Ok(value) if !value.trim().is_empty() => {
                self.endpoint = value.trim().to_owned();
                Ok(())
            }
            Ok(_) | Err(std::env::VarError::NotPresent) => Ok(()),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::Env { name: ENDPOINT_ENV }),
        }
    }

    /// Parses and checks the endpoint URL.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        parse_endpoint(&self.endpoint)
    }
}

pub fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Endpoint { endpoint: endpoint.to_owned(), reason };
    let url = Url::parse(endpoint).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}' (expected http or https)"))),
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config").join("flowgen")
}

#[cfg(test)]
mod tests {
    use super::{parse_endpoint, Config, ConfigError, ENDPOINT_ENV};
    use std::path::PathBuf;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("").expect("parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.endpoint, "http://127.0.0.1:8000/generate_flowchart");
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
endpoint = "https://flows.example.com/generate_flowchart"
export_dir = "/tmp/exports"
log_path = "/tmp/logs"
debug = true
"#,
        )
        .expect("parse");
        assert_eq!(config.endpoint, "https://flows.example.com/generate_flowchart");
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/logs"));
        assert!(config.debug);
    }

    #[test]
    fn rejects_unknown_keys() {
        Config::parse("endpont = \"typo\"").unwrap_err();
    }

    #[test]
    fn missing_default_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("config.toml");
        assert_eq!(Config::read(&missing, false).expect("defaults"), Config::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("config.toml");
        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn endpoint_env_overrides_file_unless_blank() {
        let mut config = Config::parse("endpoint = \"http://file.example/generate_flowchart\"")
            .expect("parse");

        std::env::set_var(ENDPOINT_ENV, "   ");
        config.apply_env().expect("blank env");
        assert_eq!(config.endpoint, "http://file.example/generate_flowchart");

        std::env::set_var(ENDPOINT_ENV, " http://env.example/generate_flowchart ");
        config.apply_env().expect("env");
        assert_eq!(config.endpoint, "http://env.example/generate_flowchart");

        std::env::remove_var(ENDPOINT_ENV);
        let mut untouched = Config::default();
        untouched.apply_env().expect("unset env");
        assert_eq!(untouched, Config::default());
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debug = true\n").expect("write config");

        let config = Config::load(Some(&path)).expect("load");
        assert!(config.debug);
        assert_eq!(config.endpoint, Config::default().endpoint);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debug = maybe\n").expect("write config");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("config.toml"), "{err}");
    }

    #[test]
    fn endpoint_must_be_http() {
        parse_endpoint("http://127.0.0.1:8000/generate_flowchart").expect("http");
        parse_endpoint("https://example.com/generate_flowchart").expect("https");
        parse_endpoint("ftp://example.com/generate_flowchart").unwrap_err();
        parse_endpoint("not a url").unwrap_err();
    }
}
