use std::collections::HashSet;

use log::debug;

use crate::config::GovConfig;
use crate::key::derive_key;
use crate::model::{
    CourtType, Designation, ExternalRecord, InternalRecord, PreparedExternal, PreparedInternal,
};
use crate::normalize::compose_address;

/// Zip codes from the government source are compared on their first five characters.
const ZIP_LEN: usize = 5;

/// Filter, deduplicate and annotate the government table.
///
/// Records whose `CourtType` is excluded are dropped first, then duplicates
/// over `deduplicate_columns` (first occurrence wins). Input order is kept.
pub fn prepare_external(records: &[ExternalRecord], config: &GovConfig) -> Vec<PreparedExternal> {
    let mut seen: HashSet<Vec<&str>> = HashSet::new();
    let mut excluded = 0usize;
    let mut duplicates = 0usize;
    let mut prepared = Vec::with_capacity(records.len());

    for record in records {
        if config.exclude_court_types.contains(&record.court_type) {
            excluded += 1;
            continue;
        }

        let identity: Vec<&str> = config
            .deduplicate_columns
            .iter()
            .map(|column| record.get(*column))
            .collect();
        if !seen.insert(identity) {
            duplicates += 1;
            continue;
        }

        prepared.push(prepare_external_record(record));
    }

    debug!(
        "gov table: {} in, {} excluded by court type, {} duplicates, {} kept",
        records.len(),
        excluded,
        duplicates,
        prepared.len()
    );

    prepared
}

fn prepare_external_record(record: &ExternalRecord) -> PreparedExternal {
    let zip: String = record.building_zip.chars().take(ZIP_LEN).collect();
    let composed = compose_address(
        &record.building_address,
        Some(&record.building_name),
        &record.building_city,
        &record.building_state,
        &zip,
    );

    PreparedExternal {
        record: record.clone(),
        category: CourtType::classify(&record.court_type),
        key: derive_key(&record.building_city, &record.building_state),
        full_address: composed.primary,
        full_address_with_name: composed.full,
    }
}

/// Annotate the federal table with designation, key and comparison address.
pub fn prepare_internal(records: &[InternalRecord]) -> Vec<PreparedInternal> {
    records.iter().map(prepare_internal_record).collect()
}

fn prepare_internal_record(record: &InternalRecord) -> PreparedInternal {
    let designation = if record.filing_city != record.city {
        Designation::Branch
    } else {
        Designation::Main
    };

    let composed = compose_address(
        &record.address1,
        None,
        &record.city,
        &record.state,
        &record.zipcode,
    );

    PreparedInternal {
        record: record.clone(),
        key: derive_key(&record.filing_city, &record.state),
        designation,
        full_address: composed.primary,
    }
}
