use crate::model::{ComparedRecord, MatchSource, MismatchStatus, ReconSummary, UpdatePlan};

/// Compute summary statistics from compared records and the update plan.
pub fn compute_summary(
    compared: &[ComparedRecord],
    gov_records_in: usize,
    gov_records_kept: usize,
    plan: &UpdatePlan,
) -> ReconSummary {
    let mut summary = ReconSummary {
        federal_records: compared.len(),
        gov_records_in,
        gov_records_kept,
        instructions: plan.instructions.len(),
        skipped: plan.skipped.len(),
        ..ReconSummary::default()
    };

    for entry in compared {
        match entry.verdict.matched_in {
            MatchSource::NotFound => summary.not_found += 1,
            MatchSource::Bankruptcy => summary.matched_bankruptcy += 1,
            MatchSource::District => summary.matched_district += 1,
        }

        match entry.verdict.mismatch {
            MismatchStatus::NoMismatch => summary.no_mismatch += 1,
            MismatchStatus::Mismatch { .. } => summary.mismatches += 1,
            MismatchStatus::ManualReview => summary.manual_review += 1,
        }
    }

    summary
}
