/// Output formatting: terminal table and JSON.
use pairsort_core::Item;
use serde::Serialize;

#[derive(Serialize)]
struct JsonRankedItem {
    rank: usize,
    id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput {
    items: Vec<JsonRankedItem>,
    comparisons: usize,
}

/// Print the ranking (most preferred first) as a formatted terminal table.
pub fn print_table(ranking: &[Item], comparisons: usize) {
    // Find the widest item name for padding
    let name_width = ranking
        .iter()
        .map(|i| i.name.len())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Item"

    println!(" # | {:<name_width$} |", "Item");
    println!("---|-{}-|", "-".repeat(name_width));

    for (i, item) in ranking.iter().enumerate() {
        match &item.detail {
            Some(detail) => println!("{:>2} | {:<name_width$} | {detail}", i + 1, item.name),
            None => println!("{:>2} | {:<name_width$} |", i + 1, item.name),
        }
    }

    println!(
        "\n{} items sorted in {} comparisons",
        ranking.len(),
        comparisons,
    );
}

/// Print the ranking as JSON.
pub fn print_json(ranking: &[Item], comparisons: usize) {
    let items: Vec<JsonRankedItem> = ranking
        .iter()
        .enumerate()
        .map(|(i, item)| JsonRankedItem {
            rank: i + 1,
            id: item.id.clone(),
            name: item.name.clone(),
            detail: item.detail.clone(),
        })
        .collect();

    let output = JsonOutput { items, comparisons };

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
