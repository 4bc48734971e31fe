use crate::config::Config;
use crate::error::Result;
use crate::listings::{self, ListingFilter, ListingRow, StatusFilter};
use crate::store;
use serde_json::json;
use std::path::PathBuf;

pub fn execute(
    profiles_file: Option<PathBuf>,
    listings_file: Option<PathBuf>,
    status: StatusFilter,
    search: Option<String>,
    json: bool,
) -> Result<()> {
    let config = Config::load()?;
    let store = store::open_listing_store(&config, profiles_file, listings_file)?;
    let filter = ListingFilter {
        status,
        search: search.unwrap_or_default(),
    };

    let rows = listings::load_listings(store.as_ref(), &filter)?;
    println!("{}", render_rows(&rows, json || config.display.json)?);
    Ok(())
}

fn render_rows(rows: &[ListingRow], json: bool) -> Result<String> {
    if json {
        let output = json!({
            "count": rows.len(),
            "listings": rows,
        });
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    if rows.is_empty() {
        return Ok("No listings found".to_string());
    }

    Ok(rows
        .iter()
        .map(ListingRow::summary)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(title: &str) -> ListingRow {
        ListingRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            price: Some(2500.0),
            price_display: "$2,500".to_string(),
            location: "Jounieh".to_string(),
            owner: "Unknown User".to_string(),
            phone: "N/A".to_string(),
            status: "pending".to_string(),
            created: "Apr 2, 2024".to_string(),
        }
    }

    #[test]
    fn test_render_text_rows() {
        assert_eq!(render_rows(&[], false).unwrap(), "No listings found");
        assert_eq!(
            render_rows(&[row("Chalet")], false).unwrap(),
            "Chalet  $2,500  Jounieh  Unknown User  N/A  [pending]  Apr 2, 2024"
        );
    }

    #[test]
    fn test_render_json_rows() {
        let out = render_rows(&[row("Chalet"), row("Loft")], true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["listings"][1]["title"], "Loft");
        assert_eq!(value["listings"][0]["status"], "pending");
    }
}
