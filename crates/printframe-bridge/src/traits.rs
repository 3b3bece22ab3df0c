// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the DOM operations a print cycle
// needs. The browser implementation lives in `web`, the headless one in
// `memory`.

use printframe_core::error::Result;

/// One-shot event callback.
pub type Handler = Box<dyn FnOnce()>;

/// Events raised by a frame's nested browsing context that end a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// `beforeunload`: the nested document is going away.
    BeforeUnload,
    /// `afterprint`: the print dialog was closed.
    AfterPrint,
}

impl FrameEvent {
    /// DOM event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BeforeUnload => "beforeunload",
            Self::AfterPrint => "afterprint",
        }
    }
}

/// A top-level browsing context.
pub trait HostWindow: Clone + 'static {
    type Document: HostDocument;

    /// The environment's global window, if there is one.
    fn ambient() -> Option<Self>;

    /// The document currently loaded in this window.
    fn document(&self) -> Option<Self::Document>;
}

/// A document print frames can be attached to.
pub trait HostDocument: Clone + 'static {
    type Frame: PrintFrame;

    /// Create a detached inline frame element.
    fn create_frame(&self) -> Result<Self::Frame>;

    /// Append the frame to `<body>`, which starts loading it.
    fn append_to_body(&self, frame: &Self::Frame) -> Result<()>;
}

/// An inline frame element and its nested browsing context.
pub trait PrintFrame: Clone + 'static {
    /// Hide the frame without affecting layout.
    fn hide(&self) -> Result<()>;

    /// Set the `sandbox` attribute. Must be called before attachment to take
    /// effect on the first load.
    fn set_sandbox(&self, tokens: &str) -> Result<()>;

    fn set_src(&self, url: &str) -> Result<()>;

    fn set_srcdoc(&self, html: &str) -> Result<()>;

    /// Run `handler` once when the frame finishes loading.
    fn on_load(&self, handler: Handler) -> Result<()>;

    /// Run `handler` once when the nested context raises `event`.
    fn on_content_event(&self, event: FrameEvent, handler: Handler) -> Result<()>;

    /// Open the print dialog for the nested context.
    fn print_content(&self) -> Result<()>;

    /// Detach the frame from its document.
    fn remove(&self) -> Result<()>;
}
