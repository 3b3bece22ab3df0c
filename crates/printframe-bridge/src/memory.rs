// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless in-memory DOM for desktop/CI builds and tests.
//
// Frames record every attribute set on them and queue their listeners; the
// owner fires `load`, `beforeunload` and `afterprint` by hand. Failures can be
// injected per document to exercise the controller's best-effort paths.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use printframe_core::error::{PrintframeError, Result};
use tracing::trace;

use crate::traits::{FrameEvent, Handler, HostDocument, HostWindow, PrintFrame};

thread_local! {
    static AMBIENT: RefCell<Option<MemoryWindow>> = const { RefCell::new(None) };
}

/// In-memory window. Optionally installed as this thread's ambient window.
#[derive(Clone, Debug, Default)]
pub struct MemoryWindow {
    document: Option<MemoryDocument>,
}

impl MemoryWindow {
    pub fn new(document: MemoryDocument) -> Self {
        Self {
            document: Some(document),
        }
    }

    /// A window with no document loaded.
    pub fn detached() -> Self {
        Self { document: None }
    }

    /// Make this the window returned by [`HostWindow::ambient`] on the
    /// current thread.
    pub fn install_ambient(&self) {
        AMBIENT.with(|a| *a.borrow_mut() = Some(self.clone()));
    }

    pub fn clear_ambient() {
        AMBIENT.with(|a| *a.borrow_mut() = None);
    }
}

impl HostWindow for MemoryWindow {
    type Document = MemoryDocument;

    fn ambient() -> Option<Self> {
        AMBIENT.with(|a| a.borrow().clone())
    }

    fn document(&self) -> Option<MemoryDocument> {
        self.document.clone()
    }
}

#[derive(Debug, Default)]
struct DocumentState {
    body: Vec<MemoryFrame>,
    frames_created: usize,
    fail_create: bool,
    fail_append: bool,
    fail_remove: bool,
    fail_listen: bool,
    fail_print: bool,
}

/// In-memory document with a flat `<body>`.
#[derive(Clone, Debug, Default)]
pub struct MemoryDocument {
    inner: Rc<RefCell<DocumentState>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames currently attached to the body, in insertion order.
    pub fn frames(&self) -> Vec<MemoryFrame> {
        self.inner.borrow().body.clone()
    }

    /// Total number of frames ever created by this document.
    pub fn frames_created(&self) -> usize {
        self.inner.borrow().frames_created
    }

    pub fn fail_create(&self, fail: bool) {
        self.inner.borrow_mut().fail_create = fail;
    }

    pub fn fail_append(&self, fail: bool) {
        self.inner.borrow_mut().fail_append = fail;
    }

    pub fn fail_remove(&self, fail: bool) {
        self.inner.borrow_mut().fail_remove = fail;
    }

    /// Make listener registration on nested contexts fail.
    pub fn fail_listen(&self, fail: bool) {
        self.inner.borrow_mut().fail_listen = fail;
    }

    /// Make the print dialog fail to open.
    pub fn fail_print(&self, fail: bool) {
        self.inner.borrow_mut().fail_print = fail;
    }
}

impl HostDocument for MemoryDocument {
    type Frame = MemoryFrame;

    fn create_frame(&self) -> Result<MemoryFrame> {
        let mut doc = self.inner.borrow_mut();
        if doc.fail_create {
            return Err(PrintframeError::FrameCreate("injected failure".into()));
        }
        doc.frames_created += 1;
        Ok(MemoryFrame {
            inner: Rc::new(RefCell::new(FrameState::default())),
            document: Rc::downgrade(&self.inner),
        })
    }

    fn append_to_body(&self, frame: &MemoryFrame) -> Result<()> {
        let mut doc = self.inner.borrow_mut();
        if doc.fail_append {
            return Err(PrintframeError::FrameAttach("injected failure".into()));
        }
        doc.body.push(frame.clone());
        Ok(())
    }
}

#[derive(Default)]
struct FrameState {
    hidden: bool,
    sandbox: Option<String>,
    src: Option<String>,
    srcdoc: Option<String>,
    load_handlers: Vec<Handler>,
    content_handlers: Vec<(FrameEvent, Handler)>,
    print_calls: usize,
}

/// In-memory `<iframe>`.
#[derive(Clone)]
pub struct MemoryFrame {
    inner: Rc<RefCell<FrameState>>,
    document: Weak<RefCell<DocumentState>>,
}

impl std::fmt::Debug for MemoryFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("MemoryFrame")
            .field("hidden", &state.hidden)
            .field("sandbox", &state.sandbox)
            .field("src", &state.src)
            .field("srcdoc", &state.srcdoc)
            .field("print_calls", &state.print_calls)
            .finish()
    }
}

impl MemoryFrame {
    fn document_flag(&self, flag: impl Fn(&DocumentState) -> bool) -> bool {
        self.document
            .upgrade()
            .is_some_and(|doc| flag(&doc.borrow()))
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.borrow().hidden
    }

    pub fn sandbox(&self) -> Option<String> {
        self.inner.borrow().sandbox.clone()
    }

    pub fn src(&self) -> Option<String> {
        self.inner.borrow().src.clone()
    }

    pub fn srcdoc(&self) -> Option<String> {
        self.inner.borrow().srcdoc.clone()
    }

    /// How many times the print dialog was opened for this frame.
    pub fn print_calls(&self) -> usize {
        self.inner.borrow().print_calls
    }

    pub fn is_attached(&self) -> bool {
        self.document.upgrade().is_some_and(|doc| {
            doc.borrow()
                .body
                .iter()
                .any(|f| Rc::ptr_eq(&f.inner, &self.inner))
        })
    }

    /// Number of listeners still waiting for `event`.
    pub fn pending_listeners(&self, event: FrameEvent) -> usize {
        self.inner
            .borrow()
            .content_handlers
            .iter()
            .filter(|(e, _)| *e == event)
            .count()
    }

    /// Finish loading: run and drop every `load` listener.
    pub fn fire_load(&self) {
        let handlers = std::mem::take(&mut self.inner.borrow_mut().load_handlers);
        trace!(count = handlers.len(), "firing load");
        for handler in handlers {
            handler();
        }
    }

    /// Raise `event` on the nested context: run and drop its listeners.
    pub fn fire(&self, event: FrameEvent) {
        let handlers: Vec<Handler> = {
            let mut state = self.inner.borrow_mut();
            let (matching, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut state.content_handlers)
                .into_iter()
                .partition(|(e, _)| *e == event);
            state.content_handlers = rest;
            matching.into_iter().map(|(_, h)| h).collect()
        };
        trace!(event = event.name(), count = handlers.len(), "firing content event");
        for handler in handlers {
            handler();
        }
    }
}

impl PrintFrame for MemoryFrame {
    fn hide(&self) -> Result<()> {
        self.inner.borrow_mut().hidden = true;
        Ok(())
    }

    fn set_sandbox(&self, tokens: &str) -> Result<()> {
        self.inner.borrow_mut().sandbox = Some(tokens.into());
        Ok(())
    }

    fn set_src(&self, url: &str) -> Result<()> {
        self.inner.borrow_mut().src = Some(url.into());
        Ok(())
    }

    fn set_srcdoc(&self, html: &str) -> Result<()> {
        self.inner.borrow_mut().srcdoc = Some(html.into());
        Ok(())
    }

    fn on_load(&self, handler: Handler) -> Result<()> {
        self.inner.borrow_mut().load_handlers.push(handler);
        Ok(())
    }

    fn on_content_event(&self, event: FrameEvent, handler: Handler) -> Result<()> {
        // A detached iframe has no nested browsing context.
        if !self.is_attached() {
            return Err(PrintframeError::Listener {
                event: event.name().into(),
                detail: "frame has no content window".into(),
            });
        }
        if self.document_flag(|d| d.fail_listen) {
            return Err(PrintframeError::Listener {
                event: event.name().into(),
                detail: "injected failure".into(),
            });
        }
        self.inner.borrow_mut().content_handlers.push((event, handler));
        Ok(())
    }

    fn print_content(&self) -> Result<()> {
        if !self.is_attached() {
            return Err(PrintframeError::PrintDialog(
                "frame has no content window".into(),
            ));
        }
        if self.document_flag(|d| d.fail_print) {
            return Err(PrintframeError::PrintDialog("injected failure".into()));
        }
        self.inner.borrow_mut().print_calls += 1;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let Some(doc) = self.document.upgrade() else {
            return Ok(());
        };
        let mut doc = doc.borrow_mut();
        if doc.fail_remove {
            return Err(PrintframeError::FrameRemove("injected failure".into()));
        }
        doc.body.retain(|f| !Rc::ptr_eq(&f.inner, &self.inner));
        Ok(())
    }
}
