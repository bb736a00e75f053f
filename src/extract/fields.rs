use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::warn;

/// First run of digits with optional thousands separators / decimal point,
/// e.g. "998,888" out of "$998,888" or "2,500" out of "2,500 Sqft".
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9][0-9,.]+").unwrap());
static INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

static PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.price").unwrap());
static BEDS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li.ic-beds").unwrap());
static BATHS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li.ic-baths").unwrap());
static SQFT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li.ic-sqft").unwrap());
static LOT_SIZE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li.ic-lotsize").unwrap());

/// Square feet per square meter.
const SQFT_PER_SQM: f64 = 10.764;

/// Listing price in whole dollars, from the `div.price` marker.
pub fn get_price(doc: &Html) -> Option<i64> {
    let value = first_text(doc, &PRICE)
        .and_then(|text| NUMBER_RE.find(&text).map(|m| m.as_str().replace(',', "")))
        .and_then(|digits| digits.parse::<i64>().ok());
    if value.is_none() {
        warn!("Price not found");
    }
    value
}

/// Bedroom count from the `li.ic-beds` marker, e.g. "4 bd".
pub fn get_bedrooms(doc: &Html) -> Option<i64> {
    let value = first_int(doc, &BEDS);
    if value.is_none() {
        warn!("Bedrooms not found");
    }
    value
}

/// Bath count from the `li.ic-baths` marker, e.g. "3 ba".
pub fn get_baths(doc: &Html) -> Option<i64> {
    let value = first_int(doc, &BATHS);
    if value.is_none() {
        warn!("Baths not found");
    }
    value
}

/// Living area in square meters: the `li.ic-sqft` marker carries square
/// feet, converted and rounded to 2 decimal places.
pub fn get_sqm(doc: &Html) -> Option<f64> {
    let value = first_text(doc, &SQFT)
        .and_then(|text| NUMBER_RE.find(&text).map(|m| m.as_str().replace(',', "")))
        .and_then(|digits| digits.parse::<f64>().ok())
        .map(|sqft| round2(sqft / SQFT_PER_SQM));
    if value.is_none() {
        warn!("Square meters not found");
    }
    value
}

/// Lot size in acres from the `li.ic-lotsize` marker, e.g. "0.115 Ac".
/// The raw match is parsed as-is, so a thousands separator makes the field
/// absent rather than silently rescaled.
pub fn get_lot_size(doc: &Html) -> Option<f64> {
    let value = first_text(doc, &LOT_SIZE)
        .and_then(|text| NUMBER_RE.find(&text).map(|m| m.as_str().to_string()))
        .and_then(|digits| digits.parse::<f64>().ok());
    if value.is_none() {
        warn!("Lot size not found");
    }
    value
}

/// First integer run inside a string, e.g. 2 out of "2 space(s)".
pub fn leading_int(text: &str) -> Option<i64> {
    INT_RE.find(text).and_then(|m| m.as_str().parse::<i64>().ok())
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

fn first_int(doc: &Html, selector: &Selector) -> Option<i64> {
    first_text(doc, selector).and_then(|text| leading_int(&text))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Html {
        let html = std::fs::read_to_string("tests/fixtures/listing_full.html").unwrap();
        Html::parse_document(&html)
    }

    #[test]
    fn price_strips_currency_and_separators() {
        assert_eq!(get_price(&listing()), Some(998_888));
    }

    #[test]
    fn bedrooms_and_baths_take_the_leading_integer() {
        let doc = listing();
        assert_eq!(get_bedrooms(&doc), Some(4));
        assert_eq!(get_baths(&doc), Some(3));
    }

    #[test]
    fn sqft_converts_to_square_meters() {
        // 2500 / 10.764 rounded to 2 decimals
        assert_eq!(get_sqm(&listing()), Some(232.26));
    }

    #[test]
    fn lot_size_parses_decimal_acres() {
        assert_eq!(get_lot_size(&listing()), Some(0.115));
    }

    #[test]
    fn missing_markers_yield_none() {
        let doc = Html::parse_document("<html><body><p>nothing here</p></body></html>");
        assert_eq!(get_price(&doc), None);
        assert_eq!(get_bedrooms(&doc), None);
        assert_eq!(get_baths(&doc), None);
        assert_eq!(get_sqm(&doc), None);
        assert_eq!(get_lot_size(&doc), None);
    }

    #[test]
    fn unparseable_text_yields_none() {
        let doc = Html::parse_document(
            r#"<div class="price">Call for price</div><li class="ic-beds">studio</li>"#,
        );
        assert_eq!(get_price(&doc), None);
        assert_eq!(get_bedrooms(&doc), None);
    }

    #[test]
    fn lot_size_with_thousands_separator_is_absent() {
        let doc = Html::parse_document(r#"<li class="ic-lotsize">1,000 Ac</li>"#);
        assert_eq!(get_lot_size(&doc), None);
    }
}
