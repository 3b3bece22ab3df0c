// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! printframe — host DOM bridge abstractions.
//!
//! The print controller talks to the page only through the traits in
//! [`traits`]. In the browser they are backed by `web-sys`; everywhere else
//! (and in tests) by the headless [`memory`] DOM.

pub mod memory;
pub mod traits;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use traits::{FrameEvent, Handler, HostDocument, HostWindow, PrintFrame};

/// Window type for the current compilation target.
#[cfg(target_arch = "wasm32")]
pub type PlatformWindow = web::WebWindow;

/// Window type for the current compilation target.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformWindow = memory::MemoryWindow;
