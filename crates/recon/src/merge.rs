use std::collections::BTreeMap;

use crate::model::{MergedRow, PreparedExternal, PreparedInternal};

#[derive(Default)]
struct KeyGroup<'a> {
    federal: Vec<&'a PreparedInternal>,
    gov: Vec<&'a PreparedExternal>,
}

/// Outer join of both prepared tables on `key`, rows ordered by key.
///
/// Within a key every federal record is paired with every government record;
/// keys present on one side only yield rows with the other side empty.
pub fn outer_join(federal: &[PreparedInternal], gov: &[PreparedExternal]) -> Vec<MergedRow> {
    let mut groups: BTreeMap<&str, KeyGroup<'_>> = BTreeMap::new();
    for record in federal {
        groups.entry(record.key.as_str()).or_default().federal.push(record);
    }
    for record in gov {
        groups.entry(record.key.as_str()).or_default().gov.push(record);
    }

    let mut rows = Vec::new();
    for (key, group) in groups {
        match (group.federal.is_empty(), group.gov.is_empty()) {
            (false, false) => {
                for f in &group.federal {
                    for g in &group.gov {
                        rows.push(MergedRow {
                            key: key.to_string(),
                            federal: Some((*f).clone()),
                            gov: Some((*g).clone()),
                        });
                    }
                }
            }
            (false, true) => rows.extend(group.federal.iter().map(|f| MergedRow {
                key: key.to_string(),
                federal: Some((*f).clone()),
                gov: None,
            })),
            (true, false) => rows.extend(group.gov.iter().map(|g| MergedRow {
                key: key.to_string(),
                federal: None,
                gov: Some((*g).clone()),
            })),
            (true, true) => {}
        }
    }
    rows
}
