// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print page — print a URL or a snippet of HTML through `use_print`.

use dioxus::prelude::*;

use printframe_bridge::PlatformWindow;
use printframe_core::PrintConfig;
use printframe_core::types::ValueSource;
use printframe_print::PrintOptions;

use crate::hooks::use_print;

const BUTTON_STYLE: &str = "padding: 12px 24px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px;";

#[component]
pub fn Print() -> Element {
    let config = use_context::<PrintConfig>();
    let printer = use_print(None, move || {
        PrintOptions::<PlatformWindow>::from_config(&config)
    });
    let mut url = use_signal(|| String::from("https://example.com/"));
    let mut html = use_signal(|| String::from("<h1>Hello from printframe</h1>"));

    let pending = *printer.pending.read();
    let last_print = printer.controller().last_cycle().map(|record| {
        format!(
            "Last print ({}) finished at {}",
            record.kind,
            record.finished_at.format("%H:%M:%S")
        )
    });
    let url_printer = printer.clone();
    let source_printer = printer.clone();

    rsx! {
        div {
            h1 { "Print" }

            section { style: "margin: 16px 0;",
                h3 { "Print a page" }
                input {
                    style: "width: 100%; padding: 8px; margin-bottom: 8px;",
                    value: "{url}",
                    oninput: move |evt| url.set(evt.value()),
                }
                button {
                    style: BUTTON_STYLE,
                    disabled: pending,
                    onclick: move |_| {
                        url_printer.print_url(Some(ValueSource::getter(move || url.read().clone())), None);
                    },
                    if pending { "Printing..." } else { "Print URL" }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Print HTML" }
                textarea {
                    style: "width: 100%; height: 120px; padding: 8px; margin-bottom: 8px; font-family: monospace;",
                    value: "{html}",
                    oninput: move |evt| html.set(evt.value()),
                }
                button {
                    style: BUTTON_STYLE,
                    disabled: pending,
                    onclick: move |_| {
                        source_printer.print_source(Some(ValueSource::getter(move || html.read().clone())), None);
                    },
                    if pending { "Printing..." } else { "Print HTML" }
                }
            }

            if let Some(msg) = last_print {
                p { style: "color: #666; font-size: 14px;", "{msg}" }
            }
        }
    }
}
