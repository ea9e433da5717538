/// Coarse bucketing key shared by both datasets: `new_york_ny`.
///
/// Spaces in the city become underscores and the whole key is lowercased.
/// No abbreviation expansion happens here; fine comparison is done on the
/// normalized full address.
pub fn derive_key(city: &str, state: &str) -> String {
    format!("{}_{}", city.replace(' ', "_"), state).to_lowercase()
}
