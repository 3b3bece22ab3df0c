// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printframe Print — the print controller. It sits between the core domain
// types in `printframe-core` and the DOM reached through `printframe-bridge`.

pub mod controller;
mod cycle;
pub mod handle;
pub mod pending;

pub use controller::{PrintController, PrintOptions};
pub use handle::PrintHandle;
pub use pending::PendingFlag;
