//! Address component canonicalization.
//!
//! Everything here is pure: the same input always yields the same output and
//! nothing fails. Unusable input collapses to an empty string.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

/// Whole-word abbreviations and their expansions. Keys are matched against
/// lowercased input; the patterns never overlap, so table order is irrelevant.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("sw", "southwest"),
    ("ne", "northeast"),
    ("nw", "northwest"),
    ("se", "southeast"),
    ("n", "north"),
    ("s", "south"),
    ("e", "east"),
    ("w", "west"),
    ("st", "street"),
    ("ave", "avenue"),
    ("rd", "road"),
    ("blvd", "boulevard"),
    ("dr", "drive"),
    ("ln", "lane"),
    ("ct", "court"),
    ("pl", "place"),
    ("terr", "terrace"),
    ("pkwy", "parkway"),
    ("hwy", "highway"),
    ("ste", "suite"),
    ("fl", "floor"),
    ("bldg", "building"),
    ("apt", "apartment"),
    ("unit", "unit"),
];

/// Placeholder values the external source uses instead of an address.
const ADDRESS_SENTINELS: &[&str] = &["N/A", "Unknown", "None"];

const UNIT_WORD: &str = "unit";

fn abbreviation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let words: Vec<&str> = ABBREVIATIONS.iter().map(|(abbr, _)| *abbr).collect();
        Regex::new(&format!(r"\b(?:{})\b", words.join("|"))).unwrap()
    })
}

fn expand(word: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == word)
        .map(|(_, full)| *full)
}

/// Canonicalize one free-text address component.
///
/// The input is lowercased first, commas and periods become spaces and
/// abbreviations are expanded on word boundaries only (`"Main St"` →
/// `"main street"`, `"Stanley"` is untouched). Every `#` leading a token
/// becomes the word "unit" (`"##4"` → `"unit unit 4"`). Whitespace runs
/// collapse to a single space.
pub fn normalize(component: &str) -> String {
    if component.trim().is_empty() {
        return String::new();
    }

    let spaced = component.to_lowercase().replace([',', '.'], " ");
    let expanded = abbreviation_re().replace_all(&spaced, |caps: &Captures| {
        expand(&caps[0]).map_or_else(|| caps[0].to_string(), str::to_string)
    });

    let mut words = Vec::new();
    for token in expanded.split_whitespace() {
        let rest = token.trim_start_matches('#');
        let signs = token.len() - rest.len();
        words.extend(std::iter::repeat(UNIT_WORD).take(signs));
        if !rest.is_empty() {
            words.push(rest);
        }
    }
    words.join(" ")
}

/// A normalized, comma-joined address in two renditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComposedAddress {
    /// address1, city, state, zip. Used for exact comparison.
    pub primary: String,
    /// Same join with the secondary descriptor (address2 / building name) included.
    pub full: String,
}

impl ComposedAddress {
    /// True when the inputs were missing a required component.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

/// Build the comparison and display forms of an address.
///
/// Fails closed: if any of `address1`, `city`, `state` or `zipcode` is blank
/// both strings are empty, which never equals a real address downstream.
pub fn compose_address(
    address1: &str,
    address2: Option<&str>,
    city: &str,
    state: &str,
    zipcode: &str,
) -> ComposedAddress {
    if [address1, city, state, zipcode].iter().any(|part| part.trim().is_empty()) {
        return ComposedAddress::default();
    }

    let address1 = normalize(address1);
    let address2 = address2.map(normalize).unwrap_or_default();
    let city = normalize(city);
    let state = normalize(state);
    let zipcode = normalize(zipcode);

    ComposedAddress {
        primary: join_parts(&[&address1, &city, &state, &zipcode]),
        full: join_parts(&[&address1, &address2, &city, &state, &zipcode]),
    }
}

fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether an external street address is trustworthy enough to compare
/// against and propose as a replacement: it must start with a digit and
/// must not be one of the placeholder values.
pub fn is_valid_address(address: &str) -> bool {
    let trimmed = address.trim();
    match trimmed.chars().next() {
        Some(c) if c.is_ascii_digit() => {}
        _ => return false,
    }
    !ADDRESS_SENTINELS.contains(&trimmed)
}
