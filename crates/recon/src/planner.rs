//! Turns address discrepancies into field-level update instructions.
//!
//! The replacement address is the comma-joined string produced by
//! [`crate::normalize::compose_address`], so it is parsed back with that grammar:
//!
//! ```text
//! address1, city, state, zip              (4 components)
//! address1, address2, city, state, zip    (5 or more; extras ignored)
//! ```
//!
//! Anything else is reported as skipped; an instruction is never partially filled.

use log::warn;

use crate::model::{
    AddressUpdate, ComparedRecord, SkipReason, SkippedUpdate, UpdateInstruction, UpdatePlan,
};

/// Components of a replacement address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

impl ParsedAddress {
    pub fn parse(address: &str) -> Result<Self, SkipReason> {
        let parts: Vec<&str> = address.split(',').map(str::trim).collect();

        let (address1, address2, city, state, zipcode) = match parts.as_slice() {
            [address1, city, state, zipcode] => (*address1, None, *city, *state, *zipcode),
            [address1, address2, city, state, zipcode, ..] => {
                (*address1, Some(*address2), *city, *state, *zipcode)
            }
            _ => return Err(SkipReason::InsufficientComponents { found: parts.len() }),
        };

        for (component, value) in [
            ("address1", address1),
            ("city", city),
            ("state", state),
            ("zipcode", zipcode),
        ] {
            if value.is_empty() {
                return Err(SkipReason::EmptyComponent { component: component.into() });
            }
        }

        Ok(Self {
            address1: address1.to_string(),
            address2: address2.filter(|a| !a.is_empty()).map(str::to_string),
            city: city.to_string(),
            state: state.to_string(),
            zipcode: zipcode.to_string(),
        })
    }
}

/// Build the ordered update plan from compared records.
///
/// Only genuine mismatches are considered; `NoMismatch` and `ManualReview`
/// records never produce instructions.
pub fn plan_updates(compared: &[ComparedRecord]) -> UpdatePlan {
    let mut plan = UpdatePlan::default();

    for entry in compared.iter().filter(|c| c.verdict.is_discrepancy()) {
        let AddressUpdate::Replace(address) = &entry.verdict.address_to_update else {
            continue;
        };
        let court_id = &entry.record.record.court_id;

        match ParsedAddress::parse(address) {
            Ok(parsed) => plan.instructions.push(UpdateInstruction {
                court_id: court_id.clone(),
                address1: parsed.address1,
                address2: parsed.address2,
                filing_city: parsed.city.clone(),
                city: parsed.city,
                state: parsed.state,
                zipcode: parsed.zipcode,
                phone: entry.verdict.phone_to_update.clone(),
            }),
            Err(reason) => {
                warn!("skipping update for courtid {court_id}: {reason}");
                plan.skipped.push(SkippedUpdate {
                    court_id: court_id.clone(),
                    address_to_update: address.clone(),
                    reason,
                });
            }
        }
    }

    plan
}
