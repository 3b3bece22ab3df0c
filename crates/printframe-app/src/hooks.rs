// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `use_print` — the print controller as a Dioxus hook.

use dioxus::prelude::*;

use printframe_bridge::{HostWindow, PlatformWindow};
use printframe_core::types::ValueSource;
use printframe_print::{PrintController, PrintHandle, PrintOptions};

/// Handle returned by [`use_print`].
#[derive(Clone)]
pub struct UsePrint<W: HostWindow = PlatformWindow> {
    /// `true` while a print cycle is in flight.
    pub pending: Signal<bool>,
    controller: PrintController<W>,
}

impl<W: HostWindow> UsePrint<W> {
    /// Print a URL (or the hook's initial value). Completion is awaited in
    /// the background; watch `pending` for progress.
    pub fn print_url(&self, url: Option<ValueSource>, options: Option<PrintOptions<W>>) {
        track(self.controller.print_url(url, options));
    }

    /// Print inline HTML (or the hook's initial value).
    pub fn print_source(&self, html: Option<ValueSource>, options: Option<PrintOptions<W>>) {
        track(self.controller.print_source(html, options));
    }

    pub fn controller(&self) -> &PrintController<W> {
        &self.controller
    }
}

fn track(handle: PrintHandle) {
    if !handle.started() {
        return;
    }
    spawn(async move {
        handle.await;
        tracing::debug!("print handle settled");
    });
}

/// Create a print controller that lives as long as the calling component.
///
/// `defaults` is only evaluated on the first render.
pub fn use_print<W: HostWindow>(
    initial: Option<ValueSource>,
    defaults: impl FnOnce() -> PrintOptions<W>,
) -> UsePrint<W> {
    let controller = use_hook(|| PrintController::new(initial, defaults()));
    let pending = use_signal(|| controller.is_pending());

    // Mirror the controller's flag into the signal.
    let source = controller.clone();
    use_hook(move || {
        let mut rx = source.subscribe();
        let mut pending = pending;
        spawn(async move {
            while rx.changed().await.is_ok() {
                let value = *rx.borrow_and_update();
                pending.set(value);
            }
        });
    });

    UsePrint {
        pending,
        controller,
    }
}
