use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};

static DT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dt").unwrap());
static DD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dd").unwrap());
static DEMOGRAPHICS_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#demographics_content td").unwrap());

/// Pair every definition term with the definition value at the same
/// position. The two sequences are zipped, so a length mismatch silently
/// drops the extras; the source markup gives no better anchor to pair on.
pub fn description_pairs(doc: &Html) -> HashMap<String, String> {
    let terms = doc.select(&DT).map(element_text);
    let values = doc.select(&DD).map(element_text);
    terms.zip(values).collect()
}

/// Read the demographics table cells as a flat key/value sequence: cell 2i
/// is the key, cell 2i+1 the value. An odd trailing cell is dropped.
pub fn demographics_pairs(doc: &Html) -> HashMap<String, String> {
    let cells: Vec<String> = doc.select(&DEMOGRAPHICS_CELL).map(element_text).collect();
    cells
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

fn element_text(element: scraper::ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

// ── Tests ──
