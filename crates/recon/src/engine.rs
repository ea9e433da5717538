use log::info;

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::matcher::reconcile;
use crate::merge::outer_join;
use crate::model::{ReconInput, ReconMeta, ReconResult};
use crate::planner::plan_updates;
use crate::prepare::{prepare_external, prepare_internal};
use crate::summary::compute_summary;

/// Run one reconciliation pass: prepare both tables, match, plan updates.
///
/// Data-quality problems never fail the run; they surface as verdicts and
/// skipped updates. Only an invalid config is an error.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    config.validate()?;

    let gov = prepare_external(&input.gov, &config.gov);
    let federal = prepare_internal(&input.federal);
    info!(
        "prepared {} federal and {} gov records ({} gov dropped)",
        federal.len(),
        gov.len(),
        input.gov.len() - gov.len()
    );

    let merged = outer_join(&federal, &gov);
    let compared = reconcile(&federal, &gov);
    let plan = plan_updates(&compared);

    let summary = compute_summary(&compared, input.gov.len(), gov.len(), &plan);
    info!(
        "compared {} records: {} no mismatch, {} mismatches, {} manual review; {} updates planned, {} skipped",
        summary.federal_records,
        summary.no_mismatch,
        summary.mismatches,
        summary.manual_review,
        summary.instructions,
        summary.skipped
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        federal,
        gov,
        merged,
        compared,
        plan,
    })
}
