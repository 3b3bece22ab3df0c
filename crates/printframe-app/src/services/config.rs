// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config loading. Native builds read `printframe.json` from the data
// directory (or `PRINTFRAME_CONFIG`); the browser build uses defaults.

use printframe_core::PrintConfig;

pub const CONFIG_FILE: &str = "printframe.json";

#[cfg(not(target_arch = "wasm32"))]
pub fn load_config() -> PrintConfig {
    let path = std::env::var_os("PRINTFRAME_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| super::data_dir::data_dir().join(CONFIG_FILE));
    load_from(&path)
}

#[cfg(target_arch = "wasm32")]
pub fn load_config() -> PrintConfig {
    PrintConfig::default()
}

/// Read a config file, falling back to defaults if it is missing or invalid.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_from(path: &std::path::Path) -> PrintConfig {
    match PrintConfig::load(path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "config loaded");
            config
        }
        Err(printframe_core::PrintframeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            PrintConfig::default()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            PrintConfig::default()
        }
    }
}
