//! Normalization diagnostics surfaced to the analyst.

use serde::{Deserialize, Serialize};

use super::error::DocumentError;

/// A document that could not be loaded at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    /// Source document name.
    pub document: String,
    /// Why the document was skipped.
    pub error: DocumentError,
}

/// A trade dropped during coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRecord {
    /// Source document name.
    pub document: String,
    /// Position of the trade inside the document's `trades` array.
    pub index: usize,
    /// First field that failed to coerce (`trade` if the entry was not an object).
    pub field: String,
}

/// Outcome counters of one normalization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationReport {
    /// Documents successfully parsed.
    pub documents_loaded: usize,
    /// Documents skipped as malformed.
    pub document_failures: Vec<DocumentFailure>,
    /// Trade entries seen across loaded documents.
    pub records_read: usize,
    /// Trades kept in the dataset.
    pub records_kept: usize,
    /// Trades kept but excluded from time-filtered queries.
    pub records_flagged: usize,
    /// Trades dropped for invalid required fields.
    pub dropped: Vec<DroppedRecord>,
}

impl NormalizationReport {
    /// Number of dropped trades.
    #[must_use]
    pub fn records_dropped(&self) -> usize {
        self.dropped.len()
    }

    /// Number of malformed documents.
    #[must_use]
    pub fn documents_failed(&self) -> usize {
        self.document_failures.len()
    }

    /// Whether every document loaded and every trade was kept intact.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.document_failures.is_empty() && self.dropped.is_empty() && self.records_flagged == 0
    }
}
