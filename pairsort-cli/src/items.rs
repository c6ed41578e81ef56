/// Item loading: file, inline args, or stdin.
///
/// A file (or stdin) may be plain text with one item per line, a JSON array
/// of strings, or a JSON array of `{id, name, detail}` objects for callers
/// that already have stable ids (e.g. an export from a playlist).
use pairsort_core::Item;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Deserialize)]
struct ItemRecord {
    id: String,
    name: String,
    #[serde(default)]
    detail: Option<String>,
}

/// Parse items from raw text. Plain names get positional ids ("1", "2", ...);
/// JSON object records keep their own ids.
pub fn parse_items_from_str(content: &str) -> Result<Vec<Item>, String> {
    let trimmed = content.trim();

    let items = if trimmed.starts_with('[') {
        // JSON array: objects with ids, or bare strings.
        if let Ok(records) = serde_json::from_str::<Vec<ItemRecord>>(trimmed) {
            records
                .into_iter()
                .filter(|r| !r.name.trim().is_empty())
                .map(|r| Item {
                    id: r.id,
                    name: r.name,
                    detail: r.detail,
                })
                .collect()
        } else {
            let names: Vec<String> = serde_json::from_str(trimmed)
                .map_err(|e| format!("Input looks like JSON but failed to parse: {e}"))?;
            from_names(names.into_iter().filter(|s| !s.trim().is_empty()))
        }
    } else {
        // Plain text, one item per line.
        from_names(
            trimmed
                .lines()
                .map(|l| l.trim().to_string())
                .filter(|s| !s.is_empty()),
        )
    };

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.id.as_str()) {
            return Err(format!("Duplicate item id {:?}", item.id));
        }
    }
    Ok(items)
}

fn from_names(names: impl Iterator<Item = String>) -> Vec<Item> {
    names
        .enumerate()
        .map(|(i, name)| Item::new((i + 1).to_string(), name))
        .collect()
}
