//! Quotelog Core — quote providers, the append-only sample log, the poll
//! scheduler, and the workbook report builder.
//!
//! The system is a linear pipeline:
//! - `quote` — last-price providers (Yahoo Finance, deterministic synthetic)
//! - `log` — append-only CSV log of timestamped samples
//! - `scheduler` — the tick loop with cooperative cancellation
//! - `report` — post-run workbook with trend chart and per-symbol summary
//!
//! The log has one writer during a run (the scheduler) and one reader
//! strictly afterward (the report builder); temporal exclusion, not locking.

pub mod config;
pub mod log;
pub mod manifest;
pub mod quote;
pub mod report;
pub mod sample;
pub mod scheduler;
