// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grauwerk Print — capability probing, grayscale option selection, and
// monochrome job dispatch through the OS print system. The OS side is
// reached only through `PrintBackend`; CUPS command-line tools on unix.

pub mod backend;
pub mod capabilities;
pub mod dispatcher;
pub mod gray_policy;
pub mod printers;
pub mod request;
pub mod spool;

pub use backend::{PlatformBackend, PrintBackend, PrintTimeouts, Submission, platform_backend};
pub use capabilities::{PrinterCapabilities, probe_capabilities};
pub use dispatcher::{Dispatched, MonochromeDispatcher};
pub use gray_policy::{job_options, select_gray};
pub use printers::enumerate_printers;
pub use request::PrintRequest;
