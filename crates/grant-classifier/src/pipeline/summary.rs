use crate::classification::ClassificationResult;
use crate::taxonomy::{Category, OrgType};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Counters for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    /// Results the first pass accepted without review.
    pub accepted: usize,
    /// Results the first pass routed to review.
    pub flagged: usize,
    /// Flagged results overwritten by a review verdict.
    pub reviewed: usize,
    pub stored: usize,
    pub errors: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_org_type: BTreeMap<OrgType, usize>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchSummary {
    pub fn started(started_at: DateTime<Utc>) -> Self {
        Self {
            total: 0,
            accepted: 0,
            flagged: 0,
            reviewed: 0,
            stored: 0,
            errors: 0,
            by_category: BTreeMap::new(),
            by_org_type: BTreeMap::new(),
            started_at,
            finished_at: started_at,
        }
    }

    /// Counts first-pass routing.
    pub(crate) fn record_first_pass(&mut self, results: &[ClassificationResult]) {
        self.total = results.len();
        self.flagged = results.iter().filter(|result| result.needs_review).count();
        self.accepted = self.total - self.flagged;
    }

    /// Tallies final categories and org types.
    pub(crate) fn record_final(&mut self, results: &[ClassificationResult]) {
        self.by_category.clear();
        self.by_org_type.clear();
        for result in results {
            *self.by_category.entry(result.category).or_default() += 1;
            *self.by_org_type.entry(result.org_type).or_default() += 1;
        }
    }

    pub fn still_flagged(&self) -> usize {
        self.flagged.saturating_sub(self.reviewed)
    }

    pub fn log(&self) {
        let elapsed_ms = (self.finished_at - self.started_at).num_milliseconds();
        info!(
            total = self.total,
            accepted = self.accepted,
            flagged = self.flagged,
            reviewed = self.reviewed,
            stored = self.stored,
            errors = self.errors,
            elapsed_ms,
            "batch finished"
        );
        for (category, count) in &self.by_category {
            info!(category = %category, count, "category total");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(category: Category, org_type: OrgType, needs_review: bool) -> ClassificationResult {
        ClassificationResult {
            application_id: "1".to_string(),
            category,
            confidence: 80,
            secondary_category: None,
            org_type,
            reasoning: String::new(),
            needs_review,
            scores: Vec::new(),
            biotools_evidence: None,
        }
    }

    #[test]
    fn tallies_routing_and_distribution() {
        let results = vec![
            result(Category::Training, OrgType::University, false),
            result(Category::Biotools, OrgType::Company, true),
            result(Category::Biotools, OrgType::University, false),
        ];
        let mut summary = BatchSummary::started(Utc::now());
        summary.record_first_pass(&results);
        summary.record_final(&results);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.flagged, 1);
        assert_eq!(summary.by_category.get(&Category::Biotools), Some(&2));
        assert_eq!(summary.by_org_type.get(&OrgType::University), Some(&2));
        assert_eq!(summary.still_flagged(), 1);
    }

    #[test]
    fn serializes_category_keys_as_labels() {
        let mut summary = BatchSummary::started(Utc::now());
        summary.record_final(&[result(Category::MedicalDevice, OrgType::Hospital, false)]);
        let value = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(value["by_category"]["medical_device"], 1);
        assert_eq!(value["by_org_type"]["hospital"], 1);
    }
}
