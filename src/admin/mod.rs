// Admin user editing and plan changes
use crate::error::{PortalError, Result};
use crate::models::{AccountStatus, ListingLimit, Profile, SubscriptionStatus};
use crate::store::ProfileStore;
use chrono::{DateTime, Months, Utc};
use serde::Serialize;

/// Form state of the admin user editor, seeded from the stored profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEdit {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub career: Option<String>,
    pub status: AccountStatus,
    pub subscription_status: SubscriptionStatus,
    pub subscription_end: Option<DateTime<Utc>>,
    pub listing_limit: ListingLimit,
}

impl UserEdit {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone().unwrap_or_default(),
            last_name: profile.last_name.clone().unwrap_or_default(),
            phone_number: profile.phone_number.clone(),
            career: profile.career.clone(),
            status: profile.status.unwrap_or_default(),
            subscription_status: profile.plan(),
            subscription_end: profile.effective_end().copied(),
            listing_limit: profile.listing_limit.unwrap_or_default(),
        }
    }
}

/// Row patch sent to the profile store
///
/// `subscription_end_date` is always serialized so that downgrades clear it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub status: AccountStatus,
    pub career: Option<String>,
    pub subscription_status: SubscriptionStatus,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub listing_limit: ListingLimit,
}

impl ProfileUpdate {
    pub fn apply_to(&self, profile: &mut Profile) {
        profile.first_name = Some(self.first_name.clone());
        profile.last_name = Some(self.last_name.clone());
        profile.phone_number = self.phone_number.clone();
        profile.status = Some(self.status);
        profile.career = self.career.clone();
        profile.subscription_status = Some(self.subscription_status);
        profile.subscription_end_date = self.subscription_end_date;
        profile.listing_limit = Some(self.listing_limit);
    }
}

/// Validate an edit and work out the subscription end to store
///
/// Upgrading a free user starts a one-month subscription from `now`;
/// moving to free clears the end date; otherwise the edited end is kept.
pub fn build_update(current: &Profile, edit: &UserEdit, now: &DateTime<Utc>) -> Result<ProfileUpdate> {
    let first_name = edit.first_name.trim();
    let last_name = edit.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(PortalError::Validation(
            "First name and last name are required".to_string(),
        ));
    }

    let subscription_end_date = match (current.plan(), edit.subscription_status) {
        (SubscriptionStatus::Free, SubscriptionStatus::Pro) => Some(
            now.checked_add_months(Months::new(1))
                .ok_or_else(|| PortalError::Validation("Subscription end date out of range".to_string()))?,
        ),
        (_, SubscriptionStatus::Free) => None,
        (SubscriptionStatus::Pro, SubscriptionStatus::Pro) => edit.subscription_end,
    };

    Ok(ProfileUpdate {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone_number: trimmed(&edit.phone_number),
        status: edit.status,
        career: trimmed(&edit.career),
        subscription_status: edit.subscription_status,
        subscription_end_date,
        listing_limit: edit.listing_limit,
    })
}

/// Validate and persist an edit, returning the stored profile
pub fn submit_edit(
    store: &dyn ProfileStore,
    current: &Profile,
    edit: &UserEdit,
    now: &DateTime<Utc>,
) -> Result<Profile> {
    let update = build_update(current, edit, now)?;

    if current.plan() != update.subscription_status {
        tracing::info!(
            "Changing plan of {} from {} to {}",
            current.id,
            current.plan().as_str(),
            update.subscription_status.as_str()
        );
    }

    let updated = store.update_profile(&current.id, &update)?;
    tracing::info!("User {} updated", updated.id);
    Ok(updated)
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
