//! Pipeline module.
//!
//! This module provides the [`Auditor`] that runs the whole audit: load,
//! profile, detect, score and report.

mod auditor;

pub use auditor::{Auditor, AuditorBuilder};
