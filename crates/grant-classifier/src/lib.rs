//! Rule-based classification of NIH grants, plus the batch pipeline that
//! imports exports, routes low-confidence results to review and stores the
//! outcome.

pub mod classification;
pub mod config;
pub mod error;
pub mod grants;
pub mod pipeline;
pub mod review;
pub mod taxonomy;
pub mod telemetry;

pub use classification::{ClassificationEngine, ClassificationResult};
pub use error::AppError;
pub use grants::GrantRecord;
pub use taxonomy::{Category, OrgType};
