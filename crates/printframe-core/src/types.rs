// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for printframe.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sandbox tokens applied when the caller does not say otherwise.
pub const DEFAULT_SANDBOX: &str = "allow-modals allow-same-origin";

/// Unique identifier for one print cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleId(pub Uuid);

impl CycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the hidden frame should load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrintRequest {
    /// Navigate the frame to this URL (`src`).
    Url(String),
    /// Render this HTML directly in the frame (`srcdoc`).
    Inline(String),
}

impl PrintRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Url(_) => RequestKind::Url,
            Self::Inline(_) => RequestKind::Inline,
        }
    }

    /// The URL or HTML payload.
    pub fn value(&self) -> &str {
        match self {
            Self::Url(v) | Self::Inline(v) => v,
        }
    }
}

/// Discriminant of a [`PrintRequest`], used in logs and cycle records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Url,
    Inline,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url => f.write_str("url"),
            Self::Inline => f.write_str("inline"),
        }
    }
}

/// Sandbox policy for the print frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sandbox {
    /// No `sandbox` attribute at all.
    Disabled,
    /// Space-separated capability tokens, e.g. `"allow-modals"`.
    Tokens(String),
}

impl Sandbox {
    /// The attribute value to apply, if any.
    pub fn tokens(&self) -> Option<&str> {
        match self {
            Self::Disabled => None,
            Self::Tokens(t) => Some(t),
        }
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::Tokens(DEFAULT_SANDBOX.into())
    }
}

/// A string that is either fixed, held in a shared cell, or computed on
/// demand. Resolved each time a print is requested.
#[derive(Clone)]
pub enum ValueSource {
    Static(String),
    Shared(Rc<RefCell<String>>),
    Getter(Rc<dyn Fn() -> String>),
}

impl ValueSource {
    /// Wrap a closure that is evaluated at print time.
    pub fn getter(f: impl Fn() -> String + 'static) -> Self {
        Self::Getter(Rc::new(f))
    }

    /// Current value. Empty strings mean "nothing to print".
    pub fn resolve(&self) -> Option<String> {
        let value = match self {
            Self::Static(s) => s.clone(),
            Self::Shared(cell) => cell.borrow().clone(),
            Self::Getter(f) => f(),
        };
        (!value.is_empty()).then_some(value)
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(s) => f.debug_tuple("Static").field(s).finish(),
            Self::Shared(cell) => f.debug_tuple("Shared").field(&*cell.borrow()).finish(),
            Self::Getter(_) => f.write_str("Getter(..)"),
        }
    }
}

impl From<&str> for ValueSource {
    fn from(s: &str) -> Self {
        Self::Static(s.to_owned())
    }
}

impl From<String> for ValueSource {
    fn from(s: String) -> Self {
        Self::Static(s)
    }
}

impl From<Rc<RefCell<String>>> for ValueSource {
    fn from(cell: Rc<RefCell<String>>) -> Self {
        Self::Shared(cell)
    }
}

/// Which signal ended a print cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionTrigger {
    /// The nested context was about to unload.
    BeforeUnload,
    /// The print dialog closed.
    AfterPrint,
    /// Frame setup failed before any listener could fire.
    SetupFailed,
}

/// Summary of a finished print cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub id: CycleId,
    pub kind: RequestKind,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub trigger: CompletionTrigger,
}
