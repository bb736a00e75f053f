pub mod fields;
pub mod mappings;

use std::collections::HashMap;

use scraper::Html;

use crate::error::ExtractError;

/// One scraped listing. The first six non-`Option` fields are mandatory:
/// if any of them is missing or unparseable the whole listing is dropped.
/// Everything else degrades to `None` independently.
#[derive(Debug, Clone)]
pub struct Listing {
    pub property_type: String,
    pub year_built: String,
    pub parking_spaces: i64,
    pub area_population: i64,
    pub total_households: i64,
    pub median_household_income: i64,
    pub median_age: Option<String>,
    pub median_year_built: Option<String>,
    pub bedrooms: Option<i64>,
    pub baths: Option<i64>,
    pub square_meters: Option<f64>,
    pub lot_size_acres: Option<f64>,
    pub price: Option<i64>,
}

/// Build one `Listing` from a listing page. Mandatory fields come from the
/// description and demographics mappings; the rest go through the
/// independent field extractors.
pub fn extract_listing(doc: &Html) -> Result<Listing, ExtractError> {
    let description = mappings::description_pairs(doc);
    let demographics = mappings::demographics_pairs(doc);

    let property_type = require(&description, "Type")?.to_string();
    let year_built = require(&description, "Year Built")?.to_string();
    let parking_info = require(&description, "Parking info")?;
    let parking_spaces =
        fields::leading_int(parking_info).ok_or_else(|| ExtractError::BadValue {
            field: "Parking info",
            value: parking_info.to_string(),
        })?;

    let area_population = int_value(&demographics, "Total population")?;
    let total_households = int_value(&demographics, "Total households")?;
    let median_household_income = int_value(&demographics, "Median household income")?;

    Ok(Listing {
        property_type,
        year_built,
        parking_spaces,
        area_population,
        total_households,
        median_household_income,
        median_age: demographics.get("Median age").cloned(),
        median_year_built: demographics.get("Median year built").cloned(),
        bedrooms: fields::get_bedrooms(doc),
        baths: fields::get_baths(doc),
        square_meters: fields::get_sqm(doc),
        lot_size_acres: fields::get_lot_size(doc),
        price: fields::get_price(doc),
    })
}

fn require<'a>(
    map: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, ExtractError> {
    map.get(key)
        .map(String::as_str)
        .ok_or(ExtractError::MissingField(key))
}

/// Integer demographics value with thousands separators stripped,
/// e.g. "15,342" → 15342.
fn int_value(map: &HashMap<String, String>, key: &'static str) -> Result<i64, ExtractError> {
    let raw = require(map, key)?;
    raw.replace(',', "")
        .parse::<i64>()
        .map_err(|_| ExtractError::BadValue {
            field: key,
            value: raw.to_string(),
        })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(fixture: &str) -> Html {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", fixture)).unwrap();
        Html::parse_document(&html)
    }

    #[test]
    fn full_listing_extracts_every_field() {
        let listing = extract_listing(&parse("listing_full")).unwrap();
        assert_eq!(listing.property_type, "Single Family Home");
        assert_eq!(listing.year_built, "1999");
        assert_eq!(listing.parking_spaces, 2);
        assert_eq!(listing.area_population, 15_342);
        assert_eq!(listing.total_households, 5_201);
        assert_eq!(listing.median_household_income, 72_815);
        assert_eq!(listing.median_age.as_deref(), Some("38.1"));
        assert_eq!(listing.median_year_built.as_deref(), Some("1985"));
        assert_eq!(listing.bedrooms, Some(4));
        assert_eq!(listing.baths, Some(3));
        assert_eq!(listing.square_meters, Some(232.26));
        assert_eq!(listing.lot_size_acres, Some(0.115));
        assert_eq!(listing.price, Some(998_888));
    }

    #[test]
    fn sparse_listing_keeps_mandatory_fields_and_blanks_the_rest() {
        let listing = extract_listing(&parse("listing_sparse")).unwrap();
        assert_eq!(listing.property_type, "Condo");
        assert_eq!(listing.parking_spaces, 1);
        assert_eq!(listing.area_population, 8_940);
        assert_eq!(listing.bedrooms, None);
        assert_eq!(listing.baths, None);
        assert_eq!(listing.square_meters, None);
        assert_eq!(listing.lot_size_acres, None);
        assert_eq!(listing.price, None);
    }

    #[test]
    fn missing_type_fails_the_whole_listing() {
        let err = extract_listing(&parse("listing_no_type")).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField("Type")));
    }

    #[test]
    fn unparseable_population_fails_the_whole_listing() {
        let doc = Html::parse_document(
            r#"<dl><dt>Type</dt><dd>Condo</dd>
                 <dt>Year Built</dt><dd>2001</dd>
                 <dt>Parking info</dt><dd>1 space(s)</dd></dl>
               <div id="demographics_content"><table><tr>
                 <td>Total population</td><td>unknown</td>
                 <td>Total households</td><td>3,000</td>
                 <td>Median household income</td><td>55,000</td>
               </tr></table></div>"#,
        );
        let err = extract_listing(&doc).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::BadValue {
                field: "Total population",
                ..
            }
        ));
    }
}
