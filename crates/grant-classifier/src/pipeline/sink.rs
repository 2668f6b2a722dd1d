use crate::classification::ClassificationResult;
use async_trait::async_trait;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink transport failed: {0}")]
    Transport(String),
    #[error("sink rejected {application_id} with status {status}: {body}")]
    Rejected {
        application_id: String,
        status: u16,
        body: String,
    },
    #[error("failed to write classification output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode classification row: {0}")]
    Csv(#[from] csv::Error),
    #[error("sink state is unavailable")]
    Poisoned,
}

impl SinkError {
    /// Transport failures, throttling and server errors are worth another
    /// attempt; local write failures and client rejections are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            SinkError::Transport(_) => true,
            SinkError::Rejected { status, .. } => *status == 429 || *status >= 500,
            SinkError::Io(_) | SinkError::Csv(_) | SinkError::Poisoned => false,
        }
    }
}

impl From<reqwest::Error> for SinkError {
    fn from(err: reqwest::Error) -> Self {
        SinkError::Transport(err.to_string())
    }
}

/// Destination for finished classifications.
#[async_trait]
pub trait ClassificationSink: Send + Sync {
    async fn store(&self, result: &ClassificationResult) -> Result<(), SinkError>;

    async fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    application_id: &'a str,
    primary_category: &'static str,
    category_confidence: u8,
    secondary_category: &'static str,
    org_type: &'static str,
    review_flag: bool,
    reasoning: &'a str,
}

impl<'a> From<&'a ClassificationResult> for CsvRow<'a> {
    fn from(result: &'a ClassificationResult) -> Self {
        Self {
            application_id: &result.application_id,
            primary_category: result.category.label(),
            category_confidence: result.confidence,
            secondary_category: result
                .secondary_category
                .map(|category| category.label())
                .unwrap_or(""),
            org_type: result.org_type.label(),
            review_flag: result.needs_review,
            reasoning: &result.reasoning,
        }
    }
}

/// Writes one CSV row per classification. The header is written with the
/// first row.
pub struct CsvSink {
    writer: Mutex<csv::Writer<Box<dyn Write + Send>>>,
}

impl CsvSink {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        let boxed: Box<dyn Write + Send> = Box::new(writer);
        Self {
            writer: Mutex::new(csv::Writer::from_writer(boxed)),
        }
    }
}

#[async_trait]
impl ClassificationSink for CsvSink {
    async fn store(&self, result: &ClassificationResult) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.serialize(CsvRow::from(result))?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps results in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Mutex<Vec<ClassificationResult>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> Vec<ClassificationResult> {
        self.results
            .lock()
            .map(|results| results.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ClassificationSink for MemorySink {
    async fn store(&self, result: &ClassificationResult) -> Result<(), SinkError> {
        self.results
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(result.clone());
        Ok(())
    }
}
