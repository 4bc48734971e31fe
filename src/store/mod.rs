// Profile and listing persistence
mod file;
mod rest;

pub use file::FileProfileStore;
pub use rest::RestProfileStore;

use crate::admin::ProfileUpdate;
use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::listings::Listing;
use crate::models::Profile;
use std::path::PathBuf;
use uuid::Uuid;

/// Read/update access to profile rows keyed by user id
///
/// Updates are single-record and last writer wins.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileStore {
    fn fetch_profile(&self, user_id: &Uuid) -> Result<Option<Profile>>;

    fn update_profile(&self, user_id: &Uuid, update: &ProfileUpdate) -> Result<Profile>;
}

/// Read access to the listings table and the profiles owning them
#[cfg_attr(test, mockall::automock)]
pub trait ListingStore {
    fn fetch_listings(&self) -> Result<Vec<Listing>>;

    fn fetch_owners(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>>;
}

/// Pick a store: a local profiles file wins over the hosted backend
pub fn open_store(config: &Config, profiles_file: Option<PathBuf>) -> Result<Box<dyn ProfileStore>> {
    if let Some(store) = local_store(config, profiles_file, None) {
        return Ok(Box::new(store));
    }
    Ok(Box::new(rest_store(config)?))
}

/// Same selection as `open_store`, a listings file also selects local files
pub fn open_listing_store(
    config: &Config,
    profiles_file: Option<PathBuf>,
    listings_file: Option<PathBuf>,
) -> Result<Box<dyn ListingStore>> {
    if let Some(store) = local_store(config, profiles_file, listings_file) {
        return Ok(Box::new(store));
    }
    Ok(Box::new(rest_store(config)?))
}

fn local_store(
    config: &Config,
    profiles_file: Option<PathBuf>,
    listings_file: Option<PathBuf>,
) -> Option<FileProfileStore> {
    let profiles = profiles_file.or_else(|| config.store.profiles_file.clone());
    let listings = listings_file.or_else(|| config.store.listings_file.clone());

    let store = match (profiles, listings) {
        (None, None) => return None,
        (Some(profiles), None) => FileProfileStore::new(profiles),
        (profiles, Some(listings)) => {
            let profiles = profiles.unwrap_or_else(|| listings.with_file_name("profiles.json"));
            FileProfileStore::new(profiles).with_listings_file(listings)
        }
    };

    tracing::debug!("Using local files: {}", store.describe());
    Some(store)
}

fn rest_store(config: &Config) -> Result<RestProfileStore> {
    let (url, anon_key) = config.backend_config()?;
    tracing::debug!("Using hosted backend at {}", url);
    RestProfileStore::new(url, anon_key, config.backend.access_token.as_deref())
}

pub(crate) fn not_found(user_id: &Uuid) -> PortalError {
    PortalError::ProfileNotFound(user_id.to_string())
}
