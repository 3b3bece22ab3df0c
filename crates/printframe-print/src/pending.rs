// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Observable "print in flight" flag.

use std::rc::Rc;

use tokio::sync::watch;

/// Shared boolean that is `true` while a print cycle is running.
///
/// Only the controller writes it. Readers either poll [`PendingFlag::get`]
/// or [`PendingFlag::subscribe`] for change notifications.
#[derive(Clone, Debug)]
pub struct PendingFlag {
    tx: Rc<watch::Sender<bool>>,
}

impl PendingFlag {
    pub(crate) fn new() -> Self {
        Self {
            tx: Rc::new(watch::Sender::new(false)),
        }
    }

    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Store `value`, notifying subscribers only on an actual transition.
    /// Returns whether the value changed.
    pub(crate) fn set(&self, value: bool) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}
