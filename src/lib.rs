//! Batch pipeline for daily web server access logs
//!
//! One run walks a fixed five-stage chain: scan for the source log, extract
//! one IP address per line, drop a blocked address, pack the result into a
//! tar archive, and notify a configured endpoint. Stages hand data to each
//! other through files in a configured log directory; the first stage error
//! halts the run and leaves earlier artifacts on disk for diagnosis.

pub mod archive;
pub mod config;
pub mod error;
pub mod notify;
pub mod pipeline;
pub mod runner;
pub mod state;
