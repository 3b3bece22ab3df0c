// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for printframe.

use thiserror::Error;

/// Top-level error type for all printframe operations.
///
/// Bridge implementations return these; the print controller logs and
/// discards them rather than surfacing them to callers.
#[derive(Debug, Error)]
pub enum PrintframeError {
    // -- Frame lifecycle --
    #[error("could not create print frame: {0}")]
    FrameCreate(String),

    #[error("could not attach print frame to the document body: {0}")]
    FrameAttach(String),

    #[error("could not remove print frame: {0}")]
    FrameRemove(String),

    #[error("could not register {event} listener: {detail}")]
    Listener { event: String, detail: String },

    #[error("print dialog could not be opened: {0}")]
    PrintDialog(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("no document available")]
    NoDocument,

    // -- Configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintframeError>;
