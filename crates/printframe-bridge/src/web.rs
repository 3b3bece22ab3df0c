// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Browser bridge over `web-sys`.
//
// Listeners are registered with `once: true` and backed by
// `Closure::once_into_js`, so the JS side frees each closure after it runs.

use printframe_core::error::{PrintframeError, Result};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Document, EventTarget, HtmlIFrameElement, Window};

use crate::traits::{FrameEvent, Handler, HostDocument, HostWindow, PrintFrame};

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn listen_once(target: &EventTarget, event: &str, handler: Handler) -> Result<()> {
    let callback = Closure::once_into_js(move || handler());
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.unchecked_ref(),
            &options,
        )
        .map_err(|e| PrintframeError::Listener {
            event: event.into(),
            detail: describe(&e),
        })
}

/// `window` of the page.
#[derive(Clone, Debug)]
pub struct WebWindow(Window);

impl From<Window> for WebWindow {
    fn from(window: Window) -> Self {
        Self(window)
    }
}

impl HostWindow for WebWindow {
    type Document = WebDocument;

    fn ambient() -> Option<Self> {
        web_sys::window().map(Self)
    }

    fn document(&self) -> Option<WebDocument> {
        self.0.document().map(WebDocument)
    }
}

/// A page document.
#[derive(Clone, Debug)]
pub struct WebDocument(Document);

impl From<Document> for WebDocument {
    fn from(document: Document) -> Self {
        Self(document)
    }
}

impl HostDocument for WebDocument {
    type Frame = WebFrame;

    fn create_frame(&self) -> Result<WebFrame> {
        let element = self
            .0
            .create_element("iframe")
            .map_err(|e| PrintframeError::FrameCreate(describe(&e)))?;
        element
            .dyn_into::<HtmlIFrameElement>()
            .map(WebFrame)
            .map_err(|_| PrintframeError::FrameCreate("element is not an iframe".into()))
    }

    fn append_to_body(&self, frame: &WebFrame) -> Result<()> {
        let body = self.0.body().ok_or(PrintframeError::NoDocument)?;
        body.append_with_node_1(&frame.0)
            .map_err(|e| PrintframeError::FrameAttach(describe(&e)))
    }
}

/// An `<iframe>` element.
#[derive(Clone, Debug)]
pub struct WebFrame(HtmlIFrameElement);

impl WebFrame {
    fn content_window(&self) -> Option<Window> {
        self.0.content_window()
    }
}

impl PrintFrame for WebFrame {
    fn hide(&self) -> Result<()> {
        self.0
            .style()
            .set_property("display", "none")
            .map_err(|e| PrintframeError::Dom(describe(&e)))
    }

    fn set_sandbox(&self, tokens: &str) -> Result<()> {
        self.0
            .set_attribute("sandbox", tokens)
            .map_err(|e| PrintframeError::Dom(describe(&e)))
    }

    fn set_src(&self, url: &str) -> Result<()> {
        self.0.set_src(url);
        Ok(())
    }

    fn set_srcdoc(&self, html: &str) -> Result<()> {
        self.0.set_srcdoc(html);
        Ok(())
    }

    fn on_load(&self, handler: Handler) -> Result<()> {
        listen_once(&self.0, "load", handler)
    }

    fn on_content_event(&self, event: FrameEvent, handler: Handler) -> Result<()> {
        let window = self.content_window().ok_or_else(|| PrintframeError::Listener {
            event: event.name().into(),
            detail: "frame has no content window".into(),
        })?;
        listen_once(&window, event.name(), handler)
    }

    fn print_content(&self) -> Result<()> {
        let window = self
            .content_window()
            .ok_or_else(|| PrintframeError::PrintDialog("frame has no content window".into()))?;
        window
            .print()
            .map_err(|e| PrintframeError::PrintDialog(describe(&e)))
    }

    fn remove(&self) -> Result<()> {
        self.0.remove();
        Ok(())
    }
}
