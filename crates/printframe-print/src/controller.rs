// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print controller — renders a URL or inline HTML in a hidden frame, opens the
// print dialog on it, and removes the frame once printing is over.
//
// At most one cycle runs per controller. Calls made while a cycle is pending,
// without a document, or without anything to print return a handle that is
// already settled and touch nothing.

use std::cell::RefCell;
use std::rc::Rc;

use printframe_bridge::{HostDocument, HostWindow, PlatformWindow, PrintFrame};
use printframe_core::config::PrintConfig;
use printframe_core::error::Result;
use printframe_core::types::{CompletionTrigger, CycleRecord, PrintRequest, Sandbox, ValueSource};
use tokio::sync::{oneshot, watch};
use tracing::{debug, field, instrument, warn};

use crate::cycle::Cycle;
use crate::handle::PrintHandle;
use crate::pending::PendingFlag;

/// Where and how to print.
///
/// Unset `window`/`document` fall back to the controller's defaults and then
/// to the ambient window.
#[derive(Clone)]
pub struct PrintOptions<W: HostWindow> {
    pub window: Option<W>,
    pub document: Option<W::Document>,
    pub sandbox: Sandbox,
}

impl<W: HostWindow> Default for PrintOptions<W> {
    fn default() -> Self {
        Self {
            window: None,
            document: None,
            sandbox: Sandbox::default(),
        }
    }
}

impl<W: HostWindow> PrintOptions<W> {
    /// Options carrying the sandbox policy from a config file.
    pub fn from_config(config: &PrintConfig) -> Self {
        Self {
            sandbox: config.sandbox(),
            ..Self::default()
        }
    }

    pub fn with_window(mut self, window: W) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_document(mut self, document: W::Document) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_sandbox(mut self, sandbox: Sandbox) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Explicit document, else the explicit window's document.
    fn own_document(&self) -> Option<W::Document> {
        self.document
            .clone()
            .or_else(|| self.window.as_ref().and_then(W::document))
    }
}

type FrameOf<W> = <<W as HostWindow>::Document as HostDocument>::Frame;

/// State reachable from in-flight cycles.
pub(crate) struct Shared {
    pub(crate) pending: PendingFlag,
    pub(crate) last_cycle: RefCell<Option<CycleRecord>>,
}

struct Inner<W: HostWindow> {
    initial: Option<ValueSource>,
    defaults: PrintOptions<W>,
    shared: Rc<Shared>,
}

/// Prints URLs or HTML through a hidden, sandboxed frame.
///
/// Cloning is cheap; clones share the pending flag.
pub struct PrintController<W: HostWindow = PlatformWindow> {
    inner: Rc<Inner<W>>,
}

impl<W: HostWindow> Clone for PrintController<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<W: HostWindow> PrintController<W> {
    /// `initial` is used whenever a print call passes no value of its own.
    pub fn new(initial: Option<ValueSource>, defaults: PrintOptions<W>) -> Self {
        Self {
            inner: Rc::new(Inner {
                initial,
                defaults,
                shared: Rc::new(Shared {
                    pending: PendingFlag::new(),
                    last_cycle: RefCell::new(None),
                }),
            }),
        }
    }

    pub fn pending(&self) -> &PendingFlag {
        &self.inner.shared.pending
    }

    pub fn is_pending(&self) -> bool {
        self.inner.shared.pending.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.shared.pending.subscribe()
    }

    /// The most recently finished cycle.
    pub fn last_cycle(&self) -> Option<CycleRecord> {
        self.inner.shared.last_cycle.borrow().clone()
    }

    /// Print the page at `url` (or the initial value).
    pub fn print_url(
        &self,
        url: Option<ValueSource>,
        options: Option<PrintOptions<W>>,
    ) -> PrintHandle {
        match self.resolve_value(url) {
            Some(value) => self.print(PrintRequest::Url(value), options),
            None => {
                debug!("nothing to print");
                PrintHandle::settled()
            }
        }
    }

    /// Print an HTML string (or the initial value) rendered inline.
    pub fn print_source(
        &self,
        html: Option<ValueSource>,
        options: Option<PrintOptions<W>>,
    ) -> PrintHandle {
        match self.resolve_value(html) {
            Some(value) => self.print(PrintRequest::Inline(value), options),
            None => {
                debug!("nothing to print");
                PrintHandle::settled()
            }
        }
    }

    /// A value passed to the call wins over the initial value. An empty
    /// literal counts as no value; a cell or getter that reads empty does not
    /// fall back.
    fn resolve_value(&self, value: Option<ValueSource>) -> Option<String> {
        match value {
            Some(ValueSource::Static(s)) if s.is_empty() => self.resolve_initial(),
            Some(source) => source.resolve(),
            None => self.resolve_initial(),
        }
    }

    fn resolve_initial(&self) -> Option<String> {
        self.inner.initial.as_ref().and_then(ValueSource::resolve)
    }

    /// Per-call options > controller defaults > ambient window.
    fn resolve_document(&self, options: Option<&PrintOptions<W>>) -> Option<W::Document> {
        options
            .and_then(PrintOptions::own_document)
            .or_else(|| self.inner.defaults.own_document())
            .or_else(|| W::ambient().and_then(|w| w.document()))
    }

    #[instrument(skip_all, fields(kind = %request.kind(), cycle_id = field::Empty))]
    fn print(&self, request: PrintRequest, options: Option<PrintOptions<W>>) -> PrintHandle {
        let options = options.as_ref();
        let Some(document) = self.resolve_document(options) else {
            debug!("no document available");
            return PrintHandle::settled();
        };
        let shared = &self.inner.shared;
        if shared.pending.get() {
            debug!("a print cycle is already pending");
            return PrintHandle::settled();
        }
        shared.pending.set(true);

        let sandbox = &options.unwrap_or(&self.inner.defaults).sandbox;
        let (tx, rx) = oneshot::channel();
        let cycle: Rc<Cycle<FrameOf<W>>> =
            Rc::new(Cycle::new(request.kind(), tx, Rc::downgrade(shared)));
        tracing::Span::current().record("cycle_id", field::display(cycle.id()));

        if let Err(e) = mount_frame(&document, &request, sandbox, &cycle) {
            warn!(error = %e, "print frame setup failed");
            cycle.finish(CompletionTrigger::SetupFailed);
        }
        PrintHandle::cycle(rx)
    }
}

/// Build the hidden frame and attach it; attachment starts the load.
fn mount_frame<D: HostDocument>(
    document: &D,
    request: &PrintRequest,
    sandbox: &Sandbox,
    cycle: &Rc<Cycle<D::Frame>>,
) -> Result<()> {
    let frame = document.create_frame()?;
    cycle.adopt(frame.clone());

    let on_load = Rc::clone(cycle);
    frame.on_load(Box::new(move || on_load.start_print()))?;
    frame.hide()?;
    if let Some(tokens) = sandbox.tokens() {
        frame.set_sandbox(tokens)?;
    }
    match request {
        PrintRequest::Url(url) => frame.set_src(url)?,
        PrintRequest::Inline(html) => frame.set_srcdoc(html)?,
    }
    document.append_to_body(&frame)?;
    debug!(payload_len = request.value().len(), "print frame attached");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use printframe_bridge::FrameEvent;
    use printframe_bridge::memory::{MemoryDocument, MemoryFrame, MemoryWindow};
    use printframe_core::types::{DEFAULT_SANDBOX, RequestKind};
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll, Waker};

    fn poll_once(handle: &mut PrintHandle) -> Poll<()> {
        let mut cx = Context::from_waker(Waker::noop());
        Pin::new(handle).poll(&mut cx)
    }

    /// Controller bound to a fresh document through its default options.
    fn setup(initial: Option<ValueSource>) -> (PrintController<MemoryWindow>, MemoryDocument) {
        let doc = MemoryDocument::new();
        let defaults = PrintOptions::default().with_window(MemoryWindow::new(doc.clone()));
        (PrintController::new(initial, defaults), doc)
    }

    fn only_frame(doc: &MemoryDocument) -> MemoryFrame {
        let frames = doc.frames();
        assert_eq!(frames.len(), 1, "expected exactly one attached frame");
        frames.into_iter().next().expect("one frame")
    }

    #[test]
    fn print_url_attaches_hidden_sandboxed_frame() {
        let (ctl, doc) = setup(None);
        let mut rx = ctl.subscribe();
        assert!(!ctl.is_pending());

        let mut handle = ctl.print_url(Some("https://example.com/doc.pdf".into()), None);
        assert!(handle.started());
        assert!(ctl.is_pending());
        assert!(rx.has_changed().expect("sender alive"));
        assert!(*rx.borrow_and_update());

        let frame = only_frame(&doc);
        assert!(frame.is_hidden());
        assert_eq!(frame.src().as_deref(), Some("https://example.com/doc.pdf"));
        assert_eq!(frame.srcdoc(), None);
        assert_eq!(frame.sandbox().as_deref(), Some(DEFAULT_SANDBOX));
        assert_eq!(frame.print_calls(), 0);
        assert_eq!(poll_once(&mut handle), Poll::Pending);

        frame.fire_load();
        assert_eq!(frame.print_calls(), 1);
        assert_eq!(frame.pending_listeners(FrameEvent::BeforeUnload), 1);
        assert_eq!(frame.pending_listeners(FrameEvent::AfterPrint), 1);
        assert!(ctl.is_pending());

        frame.fire(FrameEvent::AfterPrint);
        assert!(!ctl.is_pending());
        assert!(doc.frames().is_empty());
        assert_eq!(poll_once(&mut handle), Poll::Ready(()));
    }

    #[test]
    fn print_source_without_sandbox() {
        let (ctl, doc) = setup(None);
        let options = PrintOptions::default()
            .with_document(doc.clone())
            .with_sandbox(Sandbox::Disabled);

        let handle = ctl.print_source(Some("<h1>Hi</h1>".into()), Some(options));
        assert!(handle.started());

        let frame = only_frame(&doc);
        assert_eq!(frame.srcdoc().as_deref(), Some("<h1>Hi</h1>"));
        assert_eq!(frame.src(), None);
        assert_eq!(frame.sandbox(), None);
    }

    #[test]
    fn initial_value_is_used_without_argument() {
        let (ctl, doc) = setup(Some("https://example.com/default.pdf".into()));
        ctl.print_url(None, None);
        assert_eq!(
            only_frame(&doc).src().as_deref(),
            Some("https://example.com/default.pdf")
        );
    }

    #[test]
    fn initial_value_is_read_at_call_time() {
        let cell = Rc::new(RefCell::new(String::new()));
        let (ctl, doc) = setup(Some(cell.clone().into()));

        assert!(!ctl.print_source(None, None).started());
        assert_eq!(doc.frames_created(), 0);

        *cell.borrow_mut() = "<p>later</p>".into();
        assert!(ctl.print_source(None, None).started());
        assert_eq!(only_frame(&doc).srcdoc().as_deref(), Some("<p>later</p>"));
    }

    #[test]
    fn nothing_to_print_is_a_no_op() {
        let (ctl, doc) = setup(None);
        let mut handle = ctl.print_url(None, None);
        assert!(!handle.started());
        assert_eq!(poll_once(&mut handle), Poll::Ready(()));

        let mut handle = ctl.print_source(Some("".into()), None);
        assert_eq!(poll_once(&mut handle), Poll::Ready(()));

        assert!(!ctl.is_pending());
        assert_eq!(doc.frames_created(), 0);
    }

    #[test]
    fn empty_literal_falls_back_to_initial() {
        let (ctl, doc) = setup(Some("https://example.com/default.pdf".into()));
        assert!(ctl.print_url(Some("".into()), None).started());
        assert_eq!(
            only_frame(&doc).src().as_deref(),
            Some("https://example.com/default.pdf")
        );
    }

    #[test]
    fn empty_cell_or_getter_does_not_fall_back() {
        let (ctl, doc) = setup(Some("https://example.com/default.pdf".into()));
        let cell = Rc::new(RefCell::new(String::new()));
        assert!(!ctl.print_url(Some(cell.into()), None).started());
        assert!(!ctl.print_url(Some(ValueSource::getter(String::new)), None).started());
        assert_eq!(doc.frames_created(), 0);
    }

    #[test]
    fn print_dialog_failure_finishes_cycle() {
        let (ctl, doc) = setup(None);
        doc.fail_print(true);
        let mut handle = ctl.print_url(Some("https://example.com".into()), None);
        let frame = only_frame(&doc);
        assert!(ctl.is_pending());
        assert_eq!(poll_once(&mut handle), Poll::Pending);

        frame.fire_load();
        assert!(!ctl.is_pending());
        assert_eq!(poll_once(&mut handle), Poll::Ready(()));
        assert!(doc.frames().is_empty());
        assert_eq!(
            ctl.last_cycle().expect("record").trigger,
            CompletionTrigger::SetupFailed
        );
    }

    #[test]
    fn no_armed_listener_finishes_cycle() {
        let (ctl, doc) = setup(None);
        doc.fail_listen(true);
        let mut handle = ctl.print_source(Some("<p>x</p>".into()), None);
        let frame = only_frame(&doc);
        assert!(ctl.is_pending());

        frame.fire_load();
        // The dialog still opened, but nothing could end the cycle later.
        assert_eq!(frame.print_calls(), 1);
        assert!(!ctl.is_pending());
        assert_eq!(poll_once(&mut handle), Poll::Ready(()));
        assert_eq!(
            ctl.last_cycle().expect("record").trigger,
            CompletionTrigger::SetupFailed
        );
    }

    #[test]
    fn second_call_while_pending_is_a_no_op() {
        let (ctl, doc) = setup(None);
        let first = ctl.print_url(Some("https://example.com/a.pdf".into()), None);
        let mut second = ctl.print_url(Some("https://example.com/b.pdf".into()), None);

        assert!(first.started());
        assert!(!second.started());
        assert_eq!(poll_once(&mut second), Poll::Ready(()));
        assert_eq!(doc.frames_created(), 1);
        assert_eq!(
            only_frame(&doc).src().as_deref(),
            Some("https://example.com/a.pdf")
        );
    }

    #[test]
    fn both_triggers_reset_pending_once() {
        let (ctl, doc) = setup(None);
        let mut rx = ctl.subscribe();
        ctl.print_source(Some("<p>x</p>".into()), None);
        rx.borrow_and_update();

        let frame = only_frame(&doc);
        frame.fire_load();
        frame.fire(FrameEvent::BeforeUnload);
        assert!(rx.has_changed().expect("sender alive"));
        assert!(!*rx.borrow_and_update());
        let record = ctl.last_cycle().expect("record");
        assert_eq!(record.trigger, CompletionTrigger::BeforeUnload);
        assert_eq!(record.kind, RequestKind::Inline);

        frame.fire(FrameEvent::AfterPrint);
        assert!(!rx.has_changed().expect("sender alive"));
        assert_eq!(ctl.last_cycle().expect("record").id, record.id);
    }

    #[test]
    fn controller_can_print_again_after_completion() {
        let (ctl, doc) = setup(None);
        ctl.print_url(Some("https://example.com/1".into()), None);
        let frame = only_frame(&doc);
        frame.fire_load();
        frame.fire(FrameEvent::AfterPrint);

        assert!(ctl.print_url(Some("https://example.com/2".into()), None).started());
        assert_eq!(doc.frames_created(), 2);
        assert_eq!(only_frame(&doc).src().as_deref(), Some("https://example.com/2"));
    }

    #[test]
    fn no_document_is_a_no_op() {
        MemoryWindow::clear_ambient();
        let ctl: PrintController<MemoryWindow> =
            PrintController::new(None, PrintOptions::default().with_window(MemoryWindow::detached()));
        let mut handle = ctl.print_url(Some("https://example.com".into()), None);
        assert!(!handle.started());
        assert_eq!(poll_once(&mut handle), Poll::Ready(()));
        assert!(!ctl.is_pending());
    }

    #[test]
    fn ambient_window_is_the_last_fallback() {
        let doc = MemoryDocument::new();
        MemoryWindow::new(doc.clone()).install_ambient();

        let ctl: PrintController<MemoryWindow> = PrintController::new(None, PrintOptions::default());
        assert!(ctl.print_url(Some("https://example.com".into()), None).started());
        assert_eq!(doc.frames().len(), 1);

        MemoryWindow::clear_ambient();
    }

    #[test]
    fn per_call_document_overrides_default() {
        let (ctl, default_doc) = setup(None);
        let other = MemoryDocument::new();

        ctl.print_url(
            Some("https://example.com".into()),
            Some(PrintOptions::default().with_document(other.clone())),
        );
        assert_eq!(default_doc.frames_created(), 0);
        assert_eq!(other.frames().len(), 1);
    }

    #[test]
    fn per_call_options_replace_default_sandbox() {
        let doc = MemoryDocument::new();
        let defaults = PrintOptions::default()
            .with_document(doc.clone())
            .with_sandbox(Sandbox::Tokens("allow-modals".into()));
        let ctl = PrintController::<MemoryWindow>::new(None, defaults);

        // Per-call options are used as a whole, so the sandbox reverts to
        // the built-in default rather than the controller's.
        ctl.print_url(Some("https://example.com".into()), Some(PrintOptions::default()));
        assert_eq!(only_frame(&doc).sandbox().as_deref(), Some(DEFAULT_SANDBOX));
    }

    #[test]
    fn setup_failure_does_not_leave_pending_stuck() {
        let (ctl, doc) = setup(None);
        doc.fail_append(true);

        let mut handle = ctl.print_url(Some("https://example.com".into()), None);
        assert!(handle.started());
        assert!(!ctl.is_pending());
        assert_eq!(poll_once(&mut handle), Poll::Ready(()));
        assert_eq!(
            ctl.last_cycle().expect("record").trigger,
            CompletionTrigger::SetupFailed
        );

        doc.fail_append(false);
        assert!(ctl.print_url(Some("https://example.com".into()), None).started());
    }

    #[test]
    fn frame_creation_failure_settles() {
        let (ctl, doc) = setup(None);
        doc.fail_create(true);
        let mut handle = ctl.print_source(Some("<p>x</p>".into()), None);
        assert_eq!(poll_once(&mut handle), Poll::Ready(()));
        assert!(!ctl.is_pending());
    }

    #[test]
    fn removal_failure_is_ignored() {
        let (ctl, doc) = setup(None);
        let mut handle = ctl.print_url(Some("https://example.com".into()), None);
        let frame = only_frame(&doc);
        frame.fire_load();

        doc.fail_remove(true);
        frame.fire(FrameEvent::AfterPrint);
        assert!(!ctl.is_pending());
        assert_eq!(poll_once(&mut handle), Poll::Ready(()));
        // The frame is left behind.
        assert!(frame.is_attached());
    }

    #[test]
    fn pending_until_completion_signal() {
        let (ctl, doc) = setup(None);
        ctl.print_url(Some("https://example.com".into()), None);
        let frame = only_frame(&doc);
        assert!(ctl.is_pending());
        frame.fire_load();
        assert!(ctl.is_pending());
        frame.fire(FrameEvent::BeforeUnload);
        assert!(!ctl.is_pending());
    }

    #[tokio::test]
    async fn handle_resolves_when_awaited() {
        let (ctl, doc) = setup(None);
        let handle = ctl.print_url(Some("https://example.com/report".into()), None);
        let frame = only_frame(&doc);
        frame.fire_load();
        frame.fire(FrameEvent::AfterPrint);

        handle.await;
        let record = ctl.last_cycle().expect("record");
        assert_eq!(record.kind, RequestKind::Url);
        assert!(record.finished_at >= record.started_at);
    }

    #[tokio::test]
    async fn clones_share_pending_state() {
        let (ctl, doc) = setup(None);
        let clone = ctl.clone();
        let handle = clone.print_source(Some("<p>shared</p>".into()), None);
        assert!(ctl.is_pending());
        assert!(!ctl.print_source(Some("<p>other</p>".into()), None).started());

        let frame = only_frame(&doc);
        frame.fire_load();
        frame.fire(FrameEvent::BeforeUnload);
        handle.await;
        assert!(!clone.is_pending());
    }
}
