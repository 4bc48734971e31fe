use super::{not_found, ListingStore, ProfileStore};
use crate::admin::ProfileUpdate;
use crate::error::{PortalError, Result};
use crate::listings::Listing;
use crate::models::Profile;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Profiles and listings kept as JSON arrays of rows in local files
///
/// The listings file defaults to `listings.json` next to the profiles file.
pub struct FileProfileStore {
    path: PathBuf,
    listings_path: PathBuf,
}

impl FileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let listings_path = path.with_file_name("listings.json");
        Self {
            path,
            listings_path,
        }
    }

    pub fn with_listings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.listings_path = path.into();
        self
    }

    pub fn describe(&self) -> String {
        format!(
            "profiles {}, listings {}",
            self.path.display(),
            self.listings_path.display()
        )
    }

    fn load(&self) -> Result<Vec<Profile>> {
        read_rows(&self.path, "profiles")
    }

    fn save(&self, profiles: &[Profile]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(profiles)?;
        fs::write(&self.path, json)
            .map_err(|e| PortalError::StoreError(format!("Failed to write profiles file: {}", e)))?;

        Ok(())
    }

    /// Insert or replace a profile row
    #[cfg(test)]
    pub fn upsert(&self, profile: Profile) -> Result<()> {
        let mut profiles = self.load()?;
        match profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => profiles.push(profile),
        }
        self.save(&profiles)
    }
}

fn read_rows<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| PortalError::StoreError(format!("Failed to read {} file: {}", what, e)))?;

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_str(&contents)?)
}

impl ListingStore for FileProfileStore {
    fn fetch_listings(&self) -> Result<Vec<Listing>> {
        read_rows(&self.listings_path, "listings")
    }

    fn fetch_owners(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|p| user_ids.contains(&p.id))
            .collect())
    }
}

impl ProfileStore for FileProfileStore {
    fn fetch_profile(&self, user_id: &Uuid) -> Result<Option<Profile>> {
        Ok(self.load()?.into_iter().find(|p| p.id == *user_id))
    }

    fn update_profile(&self, user_id: &Uuid, update: &ProfileUpdate) -> Result<Profile> {
        let mut profiles = self.load()?;
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == *user_id)
            .ok_or_else(|| not_found(user_id))?;

        update.apply_to(profile);
        let updated = profile.clone();

        self.save(&profiles)?;
        tracing::debug!("Wrote profile {} to {}", user_id, self.path.display());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{build_update, UserEdit};
    use crate::models::SubscriptionStatus;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample(id: Uuid) -> Profile {
        let mut profile = Profile::new(id);
        profile.first_name = Some("Nadia".to_string());
        profile.last_name = Some("Aziz".to_string());
        profile
    }

    #[test]
    fn test_missing_file_has_no_profiles() {
        let dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(dir.path().join("profiles.json"));
        assert_eq!(store.fetch_profile(&Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn test_upsert_and_fetch() {
        let dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(dir.path().join("nested").join("profiles.json"));
        let id = Uuid::new_v4();

        store.upsert(sample(id)).unwrap();
        store.upsert(sample(Uuid::new_v4())).unwrap();

        let fetched = store.fetch_profile(&id).unwrap().unwrap();
        assert_eq!(fetched, sample(id));
    }

    #[test]
    fn test_update_persists_plan_change() {
        let dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(dir.path().join("profiles.json"));
        let id = Uuid::new_v4();
        let current = sample(id);
        store.upsert(current.clone()).unwrap();

        let mut edit = UserEdit::from_profile(&current);
        edit.subscription_status = SubscriptionStatus::Pro;
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let update = build_update(&current, &edit, &now).unwrap();

        store.update_profile(&id, &update).unwrap();

        let reloaded = FileProfileStore::new(dir.path().join("profiles.json"))
            .fetch_profile(&id)
            .unwrap()
            .unwrap();
        assert!(reloaded.is_pro());
        assert_eq!(
            reloaded.effective_end(),
            Some(&Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_listings_and_owners_from_files() {
        let dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(dir.path().join("profiles.json"));
        let owner = Uuid::new_v4();
        store.upsert(sample(owner)).unwrap();
        store.upsert(sample(Uuid::new_v4())).unwrap();

        assert!(store.fetch_listings().unwrap().is_empty());

        fs::write(
            dir.path().join("listings.json"),
            format!(
                r#"[{{"id": "{}", "title": "Sea view flat", "created_at": "2024-04-02T09:00:00+00:00", "user_id": "{}", "status": "active"}}]"#,
                Uuid::new_v4(),
                owner
            ),
        )
        .unwrap();

        let listings = store.fetch_listings().unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].user_id, Some(owner));

        let owners = store.fetch_owners(&[owner]).unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].id, owner);
    }

    #[test]
    fn test_update_unknown_profile() {
        let dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(dir.path().join("profiles.json"));
        let current = sample(Uuid::new_v4());
        let update = build_update(
            &current,
            &UserEdit::from_profile(&current),
            &Utc::now(),
        )
        .unwrap();

        let result = store.update_profile(&current.id, &update);
        assert!(matches!(result, Err(PortalError::ProfileNotFound(_))));
    }
}
