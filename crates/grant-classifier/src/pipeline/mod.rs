//! Batch ETL: classify, optionally review, then persist with bounded
//! concurrency and retries.

mod rest;
mod retry;
mod runner;
mod sink;
mod summary;

pub use rest::RestSink;
pub use retry::RetryPolicy;
pub use runner::{BatchReport, BatchRunner};
pub use sink::{ClassificationSink, CsvSink, MemorySink, SinkError};
pub use summary::BatchSummary;
