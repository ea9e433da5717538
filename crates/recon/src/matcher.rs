use std::collections::HashMap;

use crate::model::{
    ComparedRecord, CourtType, MatchSource, PreparedExternal, PreparedInternal, Verdict,
};
use crate::normalize::is_valid_address;

/// Government records bucketed by key, input order preserved within a bucket.
pub struct CandidateIndex<'a> {
    by_key: HashMap<&'a str, Vec<&'a PreparedExternal>>,
}

impl<'a> CandidateIndex<'a> {
    pub fn build(gov: &'a [PreparedExternal]) -> Self {
        let mut by_key: HashMap<&'a str, Vec<&'a PreparedExternal>> = HashMap::new();
        for record in gov {
            by_key.entry(record.key.as_str()).or_default().push(record);
        }
        Self { by_key }
    }

    pub fn candidates(&self, key: &str) -> &[&'a PreparedExternal] {
        self.by_key.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Pick the candidate for a key: the first bankruptcy court if any exists,
    /// otherwise the first district court. Other court types never match.
    pub fn select(&self, key: &str) -> Option<(MatchSource, &'a PreparedExternal)> {
        let candidates = self.candidates(key);
        let first_of = |category: CourtType| {
            candidates
                .iter()
                .copied()
                .find(|candidate| candidate.category == category)
        };

        first_of(CourtType::Bankruptcy)
            .map(|c| (MatchSource::Bankruptcy, c))
            .or_else(|| first_of(CourtType::District).map(|c| (MatchSource::District, c)))
    }
}

/// Verdict for one federal record against its selected candidate.
pub fn judge(federal: &PreparedInternal, selected: Option<(MatchSource, &PreparedExternal)>) -> Verdict {
    let Some((source, candidate)) = selected else {
        return Verdict::not_found();
    };

    // an unformattable address composes to "" and never counts as equal
    if is_valid_address(&candidate.record.building_address)
        && !federal.full_address.is_empty()
        && federal.full_address == candidate.full_address
    {
        return Verdict::no_mismatch(source);
    }

    Verdict::mismatch(
        source,
        &federal.full_address,
        &candidate.full_address,
        &candidate.full_address_with_name,
        &candidate.record.phone,
    )
}

/// Match every federal record independently. Several federal records may
/// resolve to the same government record.
pub fn reconcile(federal: &[PreparedInternal], gov: &[PreparedExternal]) -> Vec<ComparedRecord> {
    let index = CandidateIndex::build(gov);
    federal
        .iter()
        .map(|record| ComparedRecord {
            record: record.clone(),
            verdict: judge(record, index.select(&record.key)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AddressUpdate, Designation, ExternalRecord, InternalRecord, MismatchStatus,
    };

    fn fed(id: &str, key: &str, full_address: &str) -> PreparedInternal {
        PreparedInternal {
            record: InternalRecord {
                court_id: id.into(),
                ..InternalRecord::default()
            },
            key: key.into(),
            designation: Designation::Main,
            full_address: full_address.into(),
        }
    }

    fn gov(key: &str, category: CourtType, building_address: &str, full: &str) -> PreparedExternal {
        PreparedExternal {
            record: ExternalRecord {
                building_address: building_address.into(),
                phone: format!("{key}-phone"),
                ..ExternalRecord::default()
            },
            category,
            key: key.into(),
            full_address: full.into(),
            full_address_with_name: format!("{full} (named)"),
        }
    }

    #[test]
    fn bankruptcy_takes_precedence_over_district() {
        let gov_records = vec![
            gov("springfield_il", CourtType::District, "1 Main St", "1 main street"),
            gov("springfield_il", CourtType::Bankruptcy, "2 Elm St", "2 elm street"),
        ];
        let compared = reconcile(&[fed("1", "springfield_il", "1 main street")], &gov_records);
        let verdict = &compared[0].verdict;
        assert_eq!(verdict.matched_in, MatchSource::Bankruptcy);
        assert_eq!(
            verdict.mismatch,
            MismatchStatus::Mismatch {
                federal: "1 main street".into(),
                gov: "2 elm street".into(),
            }
        );
        assert_eq!(verdict.address_to_update, AddressUpdate::Replace("2 elm street (named)".into()));
    }

    #[test]
    fn first_candidate_in_input_order_wins() {
        let gov_records = vec![
            gov("k", CourtType::Bankruptcy, "5 First St", "5 first street"),
            gov("k", CourtType::Bankruptcy, "1 Main St", "1 main street"),
        ];
        let compared = reconcile(&[fed("1", "k", "1 main street")], &gov_records);
        assert!(compared[0].verdict.is_discrepancy());
    }

    #[test]
    fn other_court_types_never_match() {
        let gov_records = vec![gov("k", CourtType::Other, "1 Main St", "1 main street")];
        let compared = reconcile(&[fed("1", "k", "1 main street")], &gov_records);
        assert_eq!(compared[0].verdict, Verdict::not_found());
    }

    #[test]
    fn unknown_key_needs_manual_review() {
        let gov_records = vec![gov("other", CourtType::District, "1 Main St", "1 main street")];
        let compared = reconcile(&[fed("1", "k", "1 main street")], &gov_records);
        let verdict = &compared[0].verdict;
        assert_eq!(verdict.matched_in, MatchSource::NotFound);
        assert_eq!(verdict.mismatch, MismatchStatus::ManualReview);
        assert_eq!(verdict.address_to_update, AddressUpdate::ManualReview);
        assert_eq!(verdict.phone_to_update, "");
    }

    #[test]
    fn equal_addresses_need_no_update() {
        let gov_records = vec![gov("k", CourtType::District, "1 Main St", "1 main street")];
        let compared = reconcile(&[fed("1", "k", "1 main street")], &gov_records);
        let verdict = &compared[0].verdict;
        assert_eq!(verdict.matched_in, MatchSource::District);
        assert_eq!(verdict.mismatch, MismatchStatus::NoMismatch);
        assert_eq!(verdict.address_to_update.to_string(), "No update needed");
    }

    #[test]
    fn invalid_candidate_address_is_never_a_match() {
        let gov_records = vec![gov("k", CourtType::District, "Main St", "main street")];
        let compared = reconcile(&[fed("1", "k", "main street")], &gov_records);
        let verdict = &compared[0].verdict;
        assert!(verdict.is_discrepancy());
        assert_eq!(verdict.phone_to_update, "k-phone");
        assert_eq!(
            verdict.mismatch.to_string(),
            "Fed: main street | Gov: main street"
        );
    }

    #[test]
    fn unformattable_candidate_falls_back_to_manual_review() {
        let mut candidate = gov("k", CourtType::Bankruptcy, "", "");
        candidate.full_address_with_name.clear();
        let compared = reconcile(&[fed("1", "k", "1 main street")], &[candidate]);
        let verdict = &compared[0].verdict;
        assert_eq!(verdict.matched_in, MatchSource::Bankruptcy);
        assert_eq!(verdict.mismatch, MismatchStatus::ManualReview);
    }

    #[test]
    fn two_unformattable_addresses_are_not_equal() {
        let mut candidate = gov("k", CourtType::District, "999 Elm Street", "");
        candidate.full_address_with_name.clear();
        let compared = reconcile(&[fed("1", "k", "")], &[candidate]);
        let verdict = &compared[0].verdict;
        assert_eq!(verdict.matched_in, MatchSource::District);
        assert_eq!(verdict.mismatch, MismatchStatus::ManualReview);
        assert_ne!(verdict.address_to_update.to_string(), "No update needed");
    }

    #[test]
    fn unformattable_federal_address_gets_replacement() {
        let gov_records = vec![gov("k", CourtType::District, "999 Elm St", "999 elm street")];
        let compared = reconcile(&[fed("1", "k", "")], &gov_records);
        let verdict = &compared[0].verdict;
        assert!(verdict.is_discrepancy());
        assert_eq!(
            verdict.address_to_update,
            AddressUpdate::Replace("999 elm street (named)".into())
        );
    }

    #[test]
    fn many_federal_records_may_share_a_candidate() {
        let gov_records = vec![gov("k", CourtType::District, "1 Main St", "1 main street")];
        let federal = vec![fed("1", "k", "1 main street"), fed("2", "k", "9 side street")];
        let compared = reconcile(&federal, &gov_records);
        assert_eq!(compared[0].verdict.matched_in, MatchSource::District);
        assert_eq!(compared[1].verdict.matched_in, MatchSource::District);
        assert!(!compared[0].verdict.is_discrepancy());
        assert!(compared[1].verdict.is_discrepancy());
    }
}
