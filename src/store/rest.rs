use super::{not_found, ListingStore, ProfileStore};
use crate::admin::ProfileUpdate;
use crate::error::{PortalError, Result};
use crate::listings::Listing;
use crate::models::Profile;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Profiles and listings served by the hosted backend's REST interface
/// (`/rest/v1/profiles`, `/rest/v1/listings`)
pub struct RestProfileStore {
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    client: Client,
}

impl RestProfileStore {
    pub fn new(base_url: &str, anon_key: &str, access_token: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| PortalError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: access_token.map(str::to_string),
            client,
        })
    }

    fn profile_url(&self, user_id: &Uuid) -> String {
        let filter = format!("eq.{}", user_id);
        format!(
            "{}/rest/v1/profiles?id={}&select=*",
            self.base_url,
            urlencoding::encode(&filter)
        )
    }

    fn listings_url(&self) -> String {
        format!(
            "{}/rest/v1/listings?select=*&order=created_at.desc",
            self.base_url
        )
    }

    fn owners_url(&self, user_ids: &[Uuid]) -> String {
        let ids: Vec<String> = user_ids.iter().map(Uuid::to_string).collect();
        let filter = format!("in.({})", ids.join(","));
        format!(
            "{}/rest/v1/profiles?id={}&select=id,first_name,last_name,email",
            self.base_url,
            urlencoding::encode(&filter)
        )
    }

    /// The anon key doubles as bearer token when no user session is configured
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request.header("apikey", &self.anon_key).bearer_auth(bearer)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<Vec<T>> {
        let response = self
            .authorized(request)
            .send()
            .map_err(|e| PortalError::Http(format!("Failed to {}: {}", action, e)))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        decode_rows(status, &body)
    }
}

/// Decode a PostgREST response body into rows
fn decode_rows<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<Vec<T>> {
    if !status.is_success() {
        return Err(PortalError::Http(format!(
            "Request failed with {}: {}",
            status, body
        )));
    }

    serde_json::from_str(body)
        .map_err(|e| PortalError::Http(format!("Failed to parse response: {}", e)))
}

/// A PATCH that matched no row comes back as an empty array
fn first_row(rows: Vec<Profile>, user_id: &Uuid) -> Result<Profile> {
    rows.into_iter().next().ok_or_else(|| not_found(user_id))
}

impl ProfileStore for RestProfileStore {
    fn fetch_profile(&self, user_id: &Uuid) -> Result<Option<Profile>> {
        tracing::debug!("Fetching profile {}", user_id);
        let rows: Vec<Profile> =
            self.send(self.client.get(self.profile_url(user_id)), "fetch profile")?;
        Ok(rows.into_iter().next())
    }

    fn update_profile(&self, user_id: &Uuid, update: &ProfileUpdate) -> Result<Profile> {
        tracing::debug!("Updating profile {}", user_id);
        let request = self
            .client
            .patch(self.profile_url(user_id))
            .header("Prefer", "return=representation")
            .json(update);

        first_row(self.send(request, "update profile")?, user_id)
    }
}

impl ListingStore for RestProfileStore {
    fn fetch_listings(&self) -> Result<Vec<Listing>> {
        tracing::debug!("Fetching listings");
        self.send(self.client.get(self.listings_url()), "fetch listings")
    }

    fn fetch_owners(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Fetching {} listing owners", user_ids.len());
        self.send(self.client.get(self.owners_url(user_ids)), "fetch listing owners")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_ID: &str = "6f1c1f7e-3c1b-4a57-9d0e-2f4b8f0d9a11";

    fn store() -> RestProfileStore {
        RestProfileStore::new("https://project.example.co/", "anon", None).unwrap()
    }

    #[test]
    fn test_profile_url() {
        let id = Uuid::parse_str(USER_ID).unwrap();

        assert_eq!(
            store().profile_url(&id),
            "https://project.example.co/rest/v1/profiles?id=eq.6f1c1f7e-3c1b-4a57-9d0e-2f4b8f0d9a11&select=*"
        );
    }

    #[test]
    fn test_listing_urls() {
        let store = store();
        assert_eq!(
            store.listings_url(),
            "https://project.example.co/rest/v1/listings?select=*&order=created_at.desc"
        );

        let id = Uuid::parse_str(USER_ID).unwrap();
        assert_eq!(
            store.owners_url(&[id, id]),
            format!(
                "https://project.example.co/rest/v1/profiles?id=in.%28{0}%2C{0}%29&select=id,first_name,last_name,email",
                USER_ID
            )
        );
    }

    #[test]
    fn test_no_owners_requested() {
        assert!(store().fetch_owners(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_error_status_is_http_error() {
        let result: Result<Vec<Profile>> = decode_rows(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"JWT expired"}"#,
        );

        match result {
            Err(PortalError::Http(message)) => {
                assert!(message.contains("401"));
                assert!(message.contains("JWT expired"));
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rows() {
        let rows: Vec<Profile> = decode_rows(
            StatusCode::OK,
            &format!(r#"[{{"id": "{}", "subscription_status": "pro"}}]"#, USER_ID),
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_pro());

        let empty: Vec<Profile> = decode_rows(StatusCode::OK, "[]").unwrap();
        assert!(empty.is_empty());

        let garbled: Result<Vec<Profile>> = decode_rows(StatusCode::OK, "<html>");
        assert!(matches!(garbled, Err(PortalError::Http(_))));
    }

    #[test]
    fn test_patch_matching_no_row_is_not_found() {
        let id = Uuid::parse_str(USER_ID).unwrap();
        let rows: Vec<Profile> = decode_rows(StatusCode::OK, "[]").unwrap();

        match first_row(rows, &id) {
            Err(PortalError::ProfileNotFound(missing)) => assert_eq!(missing, USER_ID),
            other => panic!("expected missing profile, got {:?}", other),
        }
    }
}
