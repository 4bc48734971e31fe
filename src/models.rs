use crate::error::{PortalError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Subscription plan stored on a profile row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Free,
    Pro,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Free => "free",
            SubscriptionStatus::Pro => "pro",
        }
    }
}

/// Account state toggled by admins
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    #[default]
    Inactive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingLimitType {
    Day,
    Week,
    Month,
    Year,
    Unlimited,
}

/// How many listings an agent may publish per period
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingLimit {
    #[serde(rename = "type")]
    pub kind: ListingLimitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

impl Default for ListingLimit {
    fn default() -> Self {
        Self {
            kind: ListingLimitType::Month,
            value: Some(5),
        }
    }
}

/// Nested subscription payload some rows carry instead of the end column
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionDetails {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,
}

/// Row of the `profiles` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub career: Option<String>,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub subscription_status: Option<SubscriptionStatus>,
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    pub subscription_end_date: Option<DateTime<Utc>>,
    /// Column written by older admin editors; read only
    #[serde(
        default,
        deserialize_with = "deserialize_opt_instant",
        skip_serializing
    )]
    pub subscription_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_details: Option<SubscriptionDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_limit: Option<ListingLimit>,
}

impl Profile {
    #[cfg(test)]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            email: None,
            first_name: None,
            last_name: None,
            phone_number: None,
            career: None,
            status: None,
            subscription_status: None,
            subscription_end_date: None,
            subscription_end: None,
            subscription_details: None,
            listing_limit: None,
        }
    }

    /// Plan of the profile; rows without one are on the free plan
    pub fn plan(&self) -> SubscriptionStatus {
        self.subscription_status.unwrap_or_default()
    }

    pub fn is_pro(&self) -> bool {
        self.plan() == SubscriptionStatus::Pro
    }

    /// Effective end date: the end column, then the admin column, then the
    /// nested details
    pub fn effective_end(&self) -> Option<&DateTime<Utc>> {
        self.subscription_end_date
            .as_ref()
            .or(self.subscription_end.as_ref())
            .or_else(|| {
                self.subscription_details
                    .as_ref()
                    .and_then(|details| details.end_date.as_ref())
            })
    }

    pub fn display_name(&self) -> String {
        match (non_blank(&self.first_name), non_blank(&self.email)) {
            (Some(first), _) => match non_blank(&self.last_name) {
                Some(last) => format!("{} {}", first, last),
                None => first.to_string(),
            },
            (None, Some(email)) => email.to_string(),
            (None, None) => "Agent".to_string(),
        }
    }

    /// Avatar letter shown next to the name
    pub fn initial(&self) -> char {
        if let Some(c) = non_blank(&self.first_name).and_then(|s| s.chars().next()) {
            return c;
        }
        non_blank(&self.email)
            .and_then(|s| s.chars().next())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('A')
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an ISO-8601 instant
///
/// Accepts RFC 3339 with offset, a naive date-time (taken as UTC) and a bare
/// `YYYY-MM-DD` date (UTC midnight).
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| PortalError::InvalidDate(raw.to_string()))
}

pub fn parse_user_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|e| PortalError::InvalidUserId(format!("{}: {}", raw, e)))
}

fn deserialize_opt_instant<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_instant(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
