// Agent account subscription indicator
use crate::error::{PortalError, Result};
use crate::expiry::{self, EXPIRED_LABEL};
use crate::models::{Profile, SubscriptionStatus};
use crate::store::ProfileStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// What the agent sidebar shows about a subscription
///
/// `time_remaining` and `payment_due_soon` are computed independently, so
/// an "Expired" label can sit next to a false due-soon flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionView {
    pub display_name: String,
    pub initial: char,
    pub plan: SubscriptionStatus,
    pub subscription_end: Option<DateTime<Utc>>,
    pub time_remaining: Option<String>,
    pub payment_due_soon: bool,
    pub notice: Option<String>,
    pub show_upgrade: bool,
}

impl SubscriptionView {
    pub fn from_profile(profile: &Profile, now: &DateTime<Utc>) -> Self {
        let plan = profile.plan();
        let end = if profile.is_pro() {
            profile.effective_end()
        } else {
            None
        };

        let time_remaining = expiry::time_remaining(end, now);
        let payment_due_soon = end.map(|end| expiry::due_soon(end, now)).unwrap_or(false);

        let notice = time_remaining.as_deref().map(|label| {
            if label == EXPIRED_LABEL {
                "Subscription Expired".to_string()
            } else {
                format!("Payment due: {}", label)
            }
        });

        Self {
            display_name: profile.display_name(),
            initial: profile.initial(),
            plan,
            subscription_end: end.copied(),
            time_remaining,
            payment_due_soon,
            notice,
            show_upgrade: plan == SubscriptionStatus::Free,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.time_remaining.as_deref() == Some(EXPIRED_LABEL)
    }

    /// One-line summary for terminal output
    pub fn summary(&self) -> String {
        let mut line = format!("{} [{}]", self.display_name, self.plan.as_str().to_uppercase());
        if let Some(label) = &self.time_remaining {
            line.push_str(&format!(" • {}", label));
        }
        if self.payment_due_soon {
            line.push_str(" (payment due soon)");
        }
        if self.show_upgrade {
            line.push_str(" - upgrade to Pro available");
        }
        line
    }
}

/// Load a profile and build its view
pub fn load_view(store: &dyn ProfileStore, user_id: &Uuid, now: &DateTime<Utc>) -> Result<SubscriptionView> {
    let profile = store
        .fetch_profile(user_id)?
        .ok_or_else(|| PortalError::ProfileNotFound(user_id.to_string()))?;

    tracing::debug!(
        "Loaded profile {} (plan: {})",
        profile.id,
        profile.plan().as_str()
    );

    Ok(SubscriptionView::from_profile(&profile, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockProfileStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
    }

    fn pro_profile(end: Option<DateTime<Utc>>) -> Profile {
        let mut profile = Profile::new(Uuid::new_v4());
        profile.first_name = Some("Omar".to_string());
        profile.last_name = Some("Saleh".to_string());
        profile.subscription_status = Some(SubscriptionStatus::Pro);
        profile.subscription_end_date = end;
        profile
    }

    #[test]
    fn test_pro_due_soon() {
        let end = Utc.with_ymd_and_hms(2024, 5, 15, 0, 0, 0).unwrap();
        let view = SubscriptionView::from_profile(&pro_profile(Some(end)), &now());

        assert_eq!(view.time_remaining.as_deref(), Some("5 days remaining"));
        assert!(view.payment_due_soon);
        assert_eq!(view.notice.as_deref(), Some("Payment due: 5 days remaining"));
        assert!(!view.show_upgrade);
        assert!(!view.is_expired());
        assert_eq!(
            view.summary(),
            "Omar Saleh [PRO] • 5 days remaining (payment due soon)"
        );
    }

    #[test]
    fn test_pro_far_from_renewal() {
        let end = Utc.with_ymd_and_hms(2025, 7, 12, 0, 0, 0).unwrap();
        let view = SubscriptionView::from_profile(&pro_profile(Some(end)), &now());

        assert_eq!(
            view.time_remaining.as_deref(),
            Some("1 year, 2 months, 2 days remaining")
        );
        assert!(!view.payment_due_soon);
        assert_eq!(
            view.notice.as_deref(),
            Some("Payment due: 1 year, 2 months, 2 days remaining")
        );
    }

    #[test]
    fn test_pro_expired() {
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let view = SubscriptionView::from_profile(&pro_profile(Some(end)), &now());

        assert!(view.is_expired());
        assert!(!view.payment_due_soon);
        assert_eq!(view.notice.as_deref(), Some("Subscription Expired"));
    }

    #[test]
    fn test_pro_without_end_date_has_no_indicator() {
        let view = SubscriptionView::from_profile(&pro_profile(None), &now());
        assert_eq!(view.time_remaining, None);
        assert_eq!(view.notice, None);
        assert!(!view.payment_due_soon);
        assert!(!view.show_upgrade);
    }

    #[test]
    fn test_free_plan_ignores_end_date() {
        let mut profile = pro_profile(Some(now()));
        profile.subscription_status = Some(SubscriptionStatus::Free);
        let view = SubscriptionView::from_profile(&profile, &now());

        assert_eq!(view.time_remaining, None);
        assert!(!view.payment_due_soon);
        assert!(view.show_upgrade);
        assert_eq!(view.summary(), "Omar Saleh [FREE] - upgrade to Pro available");
    }

    #[test]
    fn test_load_view_from_store() {
        let profile = pro_profile(Some(now()));
        let user_id = profile.id;

        let mut store = MockProfileStore::new();
        store
            .expect_fetch_profile()
            .withf(move |id| *id == user_id)
            .returning(move |_| Ok(Some(profile.clone())));

        let view = load_view(&store, &user_id, &now()).unwrap();
        assert_eq!(view.time_remaining.as_deref(), Some("0 days remaining"));
        assert!(view.payment_due_soon);
    }

    #[test]
    fn test_load_view_missing_profile() {
        let mut store = MockProfileStore::new();
        store.expect_fetch_profile().returning(|_| Ok(None));

        let result = load_view(&store, &Uuid::new_v4(), &now());
        assert!(matches!(result, Err(PortalError::ProfileNotFound(_))));
    }
}
