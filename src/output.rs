use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::extract::Listing;

/// Column labels, in record order. The leading unnamed column is the
/// ordinal row index.
const HEADER: [&str; 14] = [
    "",
    "Type",
    "Year Built",
    "Parking Spaces",
    "Area population",
    "Median age",
    "Total households",
    "Median year built",
    "Median household income",
    "Bedrooms",
    "Baths",
    "Square Meters",
    "Lot size (acres)",
    "Price",
];

/// Flat row shape for the csv serializer: the listing fields prefixed with
/// the ordinal index.
#[derive(Serialize)]
struct Row<'a> {
    index: usize,
    property_type: &'a str,
    year_built: &'a str,
    parking_spaces: i64,
    area_population: i64,
    median_age: Option<&'a str>,
    total_households: i64,
    median_year_built: Option<&'a str>,
    median_household_income: i64,
    bedrooms: Option<i64>,
    baths: Option<i64>,
    square_meters: Option<f64>,
    lot_size_acres: Option<f64>,
    price: Option<i64>,
}

impl<'a> Row<'a> {
    fn new(index: usize, listing: &'a Listing) -> Self {
        Self {
            index,
            property_type: &listing.property_type,
            year_built: &listing.year_built,
            parking_spaces: listing.parking_spaces,
            area_population: listing.area_population,
            median_age: listing.median_age.as_deref(),
            total_households: listing.total_households,
            median_year_built: listing.median_year_built.as_deref(),
            median_household_income: listing.median_household_income,
            bedrooms: listing.bedrooms,
            baths: listing.baths,
            square_meters: listing.square_meters,
            lot_size_acres: listing.lot_size_acres,
            price: listing.price,
        }
    }
}

/// Write the crawl result as one CSV table: a row per listing, absent
/// optional fields as empty cells. Dropped listings were filtered upstream
/// and never appear, not even as blank rows.
pub fn write_csv(path: &Path, listings: &[Listing]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(HEADER)?;
    for (index, listing) in listings.iter().enumerate() {
        writer.serialize(Row::new(index, listing))?;
    }
    writer.flush()?;

    info!("Wrote {} listings to {}", listings.len(), path.display());
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(property_type: &str, price: Option<i64>) -> Listing {
        Listing {
            property_type: property_type.to_string(),
            year_built: "1999".to_string(),
            parking_spaces: 2,
            area_population: 15_342,
            total_households: 5_201,
            median_household_income: 72_815,
            median_age: Some("38.1".to_string()),
            median_year_built: None,
            bedrooms: Some(4),
            baths: None,
            square_meters: Some(232.26),
            lot_size_acres: None,
            price,
        }
    }

    #[test]
    fn writes_header_ordinals_and_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let listings = vec![listing("Single Family Home", Some(998_888)), listing("Condo", None)];
        write_csv(&path, &listings).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(",Type,Year Built,Parking Spaces"));
        assert!(lines[1].starts_with("0,Single Family Home,1999,2,15342"));
        assert!(lines[1].ends_with(",998888"));
        assert!(lines[2].starts_with("1,Condo"));
        // absent price is an empty trailing cell
        assert!(lines[2].ends_with(","));
    }

    #[test]
    fn empty_crawl_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_csv(&path, &[]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
