// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{DEFAULT_SANDBOX, Sandbox};

/// Persistent print settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Sandbox tokens for the print frame. `None` disables sandboxing.
    pub default_sandbox: Option<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            default_sandbox: Some(DEFAULT_SANDBOX.into()),
            log_filter: "info".into(),
        }
    }
}

impl PrintConfig {
    /// Sandbox policy described by this config.
    pub fn sandbox(&self) -> Sandbox {
        match &self.default_sandbox {
            Some(tokens) => Sandbox::Tokens(tokens.clone()),
            None => Sandbox::Disabled,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a config file written by [`PrintConfig::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
