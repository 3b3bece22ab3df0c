// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Future returned by every print call.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// Resolves to `()` once the print cycle it belongs to has been cleaned up.
///
/// Never fails. Calls that were skipped (nothing to print, no document, a
/// cycle already in flight) get a handle that is ready immediately.
#[derive(Debug)]
pub struct PrintHandle {
    rx: Option<oneshot::Receiver<()>>,
    started: bool,
}

impl PrintHandle {
    pub(crate) fn settled() -> Self {
        Self {
            rx: None,
            started: false,
        }
    }

    pub(crate) fn cycle(rx: oneshot::Receiver<()>) -> Self {
        Self {
            rx: Some(rx),
            started: true,
        }
    }

    /// Whether this call actually started a print cycle.
    pub fn started(&self) -> bool {
        self.started
    }
}

impl Future for PrintHandle {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(());
        };
        match Pin::new(rx).poll(cx) {
            // A dropped sender means the cycle can no longer complete; treat
            // it as settled rather than hanging the caller.
            Poll::Ready(_) => {
                self.rx = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
