pub mod domain;
pub mod import;
pub mod router;

pub use domain::{ClinicalStudy, GrantRecord, Patent, Publication};
pub use import::{GrantImporter, ImportError, RelatedEvidence};
pub use router::classification_router;
