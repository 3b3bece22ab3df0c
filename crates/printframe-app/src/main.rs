// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printframe demo
//
// Entry point. Loads config, initialises logging, and launches the Dioxus UI.
// Printing needs a browser DOM: the desktop build runs against the headless
// bridge, where every print request is a no-op.

mod hooks;
mod pages;
mod services;

use dioxus::prelude::*;

use printframe_core::PrintConfig;

use pages::print::Print;

fn main() {
    let config = services::config::load_config();
    init_logging(&config);

    tracing::info!("printframe starting");
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!("no browser DOM on this target; print requests will be skipped");

    dioxus::LaunchBuilder::new()
        .with_context(config)
        .launch(app);
}

#[cfg(target_arch = "wasm32")]
fn init_logging(_config: &PrintConfig) {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging(config: &PrintConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();
}

/// Root component.
fn app() -> Element {
    rsx! {
        div { class: "app-container",
            style: "max-width: 640px; margin: 0 auto; padding: 16px; font-family: system-ui, -apple-system, sans-serif;",
            Print {}
        }
    }
}
