use std::collections::HashMap;

/// Aligns `key : value` pairs on the separator, sorted by key without regard to case.
pub fn format_key_values(map: &HashMap<String, String>) -> String {
	let mut pairs: Vec<_> = map.iter().collect();
	pairs.sort_by_cached_key(|(key, _)| key.to_ascii_lowercase());

	let width = pairs.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);

	pairs.iter().map(|(key, value)| format!("{key:<width$} : {value}")).collect::<Vec<_>>().join("\n")
}
