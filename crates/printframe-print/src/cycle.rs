// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One print cycle: the frame it owns and the completion slot shared by every
// trigger that can end it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use printframe_bridge::{FrameEvent, PrintFrame};
use printframe_core::types::{CompletionTrigger, CycleId, CycleRecord, RequestKind};
use tokio::sync::oneshot;
use tracing::{debug, info, trace, warn};

use crate::controller::Shared;

pub(crate) struct Cycle<F: PrintFrame> {
    id: CycleId,
    kind: RequestKind,
    started_at: DateTime<Utc>,
    frame: RefCell<Option<F>>,
    done: RefCell<Option<oneshot::Sender<()>>>,
    owner: Weak<Shared>,
}

impl<F: PrintFrame> Cycle<F> {
    pub(crate) fn new(kind: RequestKind, done: oneshot::Sender<()>, owner: Weak<Shared>) -> Self {
        Self {
            id: CycleId::new(),
            kind,
            started_at: Utc::now(),
            frame: RefCell::new(None),
            done: RefCell::new(Some(done)),
            owner,
        }
    }

    pub(crate) fn id(&self) -> CycleId {
        self.id
    }

    pub(crate) fn adopt(&self, frame: F) {
        *self.frame.borrow_mut() = Some(frame);
    }

    /// Runs on frame load: arm both completion triggers, then open the print
    /// dialog on the nested context.
    pub(crate) fn start_print(self: &Rc<Self>) {
        let Some(frame) = self.frame.borrow().clone() else {
            return;
        };

        let mut armed = 0;
        for (event, trigger) in [
            (FrameEvent::BeforeUnload, CompletionTrigger::BeforeUnload),
            (FrameEvent::AfterPrint, CompletionTrigger::AfterPrint),
        ] {
            let cycle = Rc::clone(self);
            match frame.on_content_event(event, Box::new(move || cycle.finish(trigger))) {
                Ok(()) => armed += 1,
                Err(e) => debug!(cycle_id = %self.id, error = %e, "listener registration failed"),
            }
        }

        debug!(cycle_id = %self.id, "opening print dialog");
        if let Err(e) = frame.print_content() {
            warn!(cycle_id = %self.id, error = %e, "print dialog failed");
            self.finish(CompletionTrigger::SetupFailed);
        } else if armed == 0 {
            // Nothing left that could end the cycle.
            self.finish(CompletionTrigger::SetupFailed);
        }
    }

    /// Completion handler. Only the first call does anything.
    pub(crate) fn finish(&self, trigger: CompletionTrigger) {
        let Some(done) = self.done.borrow_mut().take() else {
            trace!(cycle_id = %self.id, ?trigger, "cycle already finished");
            return;
        };

        let frame = self.frame.borrow_mut().take();
        if let Some(frame) = frame {
            // Best effort: a frame that cannot be removed is left behind.
            if let Err(e) = frame.remove() {
                debug!(cycle_id = %self.id, error = %e, "frame removal failed, ignoring");
            }
        }

        if let Some(owner) = self.owner.upgrade() {
            owner.pending.set(false);
            *owner.last_cycle.borrow_mut() = Some(CycleRecord {
                id: self.id,
                kind: self.kind,
                started_at: self.started_at,
                finished_at: Utc::now(),
                trigger,
            });
        }

        // The caller may have dropped its handle.
        let _ = done.send(());
        info!(cycle_id = %self.id, kind = %self.kind, ?trigger, "print cycle finished");
    }
}
