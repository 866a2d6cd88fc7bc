//! Pipeline stages for the daily web log run
//!
//! The individual stages that make up the pipeline, in execution order:
//! 1. ScanStage - Check the source log exists
//! 2. ExtractStage - Extract one IP address per log line
//! 3. FilterStage - Drop the blocked address
//! 4. ArchiveStage - Pack the filtered data into a tar archive
//! 5. NotifyStage - Report completion to the configured endpoint

pub mod archive;
pub mod extract;
pub mod filter;
pub mod notify;
pub mod scan;

// Re-export stages
pub use archive::ArchiveStage;
pub use extract::{ExtractStage, RECORD_DELIMITER};
pub use filter::FilterStage;
pub use notify::NotifyStage;
pub use scan::ScanStage;
