// Listing moderation: filtering and owner lookup for the admin listings table
use crate::error::Result;
use crate::models::Profile;
use crate::store::ListingStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

const UNKNOWN_OWNER: &str = "Unknown User";
const NOT_AVAILABLE: &str = "N/A";

/// Row of the `listings` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub main_image_url: Option<String>,
    #[serde(default)]
    pub additional_image_urls: Option<Vec<String>>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub whatsapp_link: Option<String>,
    #[serde(default)]
    pub telegram_link: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Moderation status selector of the listings table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Hidden,
    Pending,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Hidden => "hidden",
            StatusFilter::Pending => "pending",
        }
    }

    /// Exact match on the stored status; rows without one only show under `all`
    pub fn matches(&self, status: Option<&str>) -> bool {
        match self {
            StatusFilter::All => true,
            other => status == Some(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub status: StatusFilter,
    pub search: String,
}

impl ListingFilter {
    fn search_term(&self) -> Option<String> {
        if self.search.trim().is_empty() {
            None
        } else {
            Some(self.search.to_lowercase())
        }
    }
}

/// Apply the status filter, then the case-insensitive search over title,
/// location, owner names and description
pub fn filter_listings<'a>(
    listings: &'a [Listing],
    owners: &HashMap<Uuid, Profile>,
    filter: &ListingFilter,
) -> Vec<&'a Listing> {
    let term = filter.search_term();

    listings
        .iter()
        .filter(|listing| filter.status.matches(listing.status.as_deref()))
        .filter(|listing| match &term {
            Some(term) => search_matches(listing, owners, term),
            None => true,
        })
        .collect()
}

fn search_matches(listing: &Listing, owners: &HashMap<Uuid, Profile>, term: &str) -> bool {
    let owner = listing.user_id.as_ref().and_then(|id| owners.get(id));
    let contains = |value: Option<&str>| {
        value
            .map(|v| v.to_lowercase().contains(term))
            .unwrap_or(false)
    };

    contains(Some(&listing.title))
        || contains(listing.location.as_deref())
        || contains(owner.and_then(|o| o.first_name.as_deref()))
        || contains(owner.and_then(|o| o.last_name.as_deref()))
        || contains(listing.description.as_deref())
}

/// Owner label: full name, then email, then "Unknown User"
pub fn owner_name(owners: &HashMap<Uuid, Profile>, user_id: Option<&Uuid>) -> String {
    let Some(owner) = user_id.and_then(|id| owners.get(id)) else {
        return UNKNOWN_OWNER.to_string();
    };

    let first = owner.first_name.as_deref().unwrap_or_default();
    let last = owner.last_name.as_deref().unwrap_or_default();
    if !first.is_empty() || !last.is_empty() {
        return format!("{} {}", first, last).trim().to_string();
    }

    owner
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .unwrap_or(UNKNOWN_OWNER)
        .to_string()
}

/// Rows without a status are awaiting review
pub fn status_label(status: Option<&str>) -> &str {
    match status {
        Some(s) if !s.is_empty() => s,
        _ => "pending",
    }
}

/// Dollar amount with thousands separators; cents only when present
pub fn format_price(price: Option<f64>) -> String {
    let Some(price) = price.filter(|p| *p != 0.0 && p.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };

    let total_cents = (price.abs() * 100.0).round() as u64;
    let dollars = (total_cents / 100).to_string();
    let cents = total_cents % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, c) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    if cents == 0 {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{:02}", sign, grouped, cents)
    }
}

/// One line of the moderation table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListingRow {
    pub id: Uuid,
    pub title: String,
    pub price: Option<f64>,
    pub price_display: String,
    pub location: String,
    pub owner: String,
    pub phone: String,
    pub status: String,
    pub created: String,
}

impl ListingRow {
    fn from_listing(listing: &Listing, owners: &HashMap<Uuid, Profile>) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            price: listing.price,
            price_display: format_price(listing.price),
            location: or_not_available(&listing.location),
            owner: owner_name(owners, listing.user_id.as_ref()),
            phone: or_not_available(&listing.phone_number),
            status: status_label(listing.status.as_deref()).to_string(),
            created: listing.created_at.format("%b %-d, %Y").to_string(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{}  {}  {}  {}  {}  [{}]  {}",
            self.title, self.price_display, self.location, self.owner, self.phone, self.status, self.created
        )
    }
}

fn or_not_available(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Fetch listings newest first with their owners and apply the filter
pub fn load_listings(store: &dyn ListingStore, filter: &ListingFilter) -> Result<Vec<ListingRow>> {
    let mut listings = store.fetch_listings()?;
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tracing::debug!("Fetched {} listings", listings.len());

    let mut owner_ids: Vec<Uuid> = listings.iter().filter_map(|l| l.user_id).collect();
    owner_ids.sort();
    owner_ids.dedup();

    let owners: HashMap<Uuid, Profile> = if owner_ids.is_empty() {
        HashMap::new()
    } else {
        store
            .fetch_owners(&owner_ids)?
            .into_iter()
            .map(|profile| (profile.id, profile))
            .collect()
    };

    let rows: Vec<ListingRow> = filter_listings(&listings, &owners, filter)
        .into_iter()
        .map(|listing| ListingRow::from_listing(listing, &owners))
        .collect();

    tracing::debug!(
        "{} listings match status {} and search '{}'",
        rows.len(),
        filter.status.as_str(),
        filter.search
    );
    Ok(rows)
}
