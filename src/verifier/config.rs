//! Verifier configuration
//!
//! Defaults probe everything and capture panics. Values can come from YAML or
//! from the environment (`GATEWAY_VERIFIER_PROBE`, `GATEWAY_VERIFIER_CAPTURE_PANICS`).

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{Error, ErrorContext};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Invoke implemented capabilities inside the sandbox. When off, only
    /// declarations, surface and arity are checked and the provider is never
    /// constructed.
    pub probe_callability: bool,
    /// Treat a panicking operation as a failed invocation instead of unwinding
    /// out of the verifier.
    pub capture_panics: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            probe_callability: true,
            capture_panics: true,
        }
    }
}

impl VerifierConfig {
    pub const PROBE_ENV: &'static str = "GATEWAY_VERIFIER_PROBE";
    pub const CAPTURE_PANICS_ENV: &'static str = "GATEWAY_VERIFIER_CAPTURE_PANICS";

    pub fn with_probe_callability(mut self, probe: bool) -> Self {
        self.probe_callability = probe;
        self
    }

    pub fn with_capture_panics(mut self, capture: bool) -> Self {
        self.capture_panics = capture;
        self
    }

    /// Load from process environment; unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (environment, secrets store, test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(Self::PROBE_ENV) {
            config.probe_callability = parse_flag(Self::PROBE_ENV, &raw)?;
        }
        if let Some(raw) = lookup(Self::CAPTURE_PANICS_ENV) {
            config.capture_panics = parse_flag(Self::CAPTURE_PANICS_ENV, &raw)?;
        }
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                "invalid verifier configuration",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("verifier_config"),
            )
        })
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::configuration_with_context(
            "expected a boolean flag",
            ErrorContext::new()
                .with_field_path(key)
                .with_details(format!("got '{}'", other))
                .with_source("verifier_config"),
        )),
    }
}
