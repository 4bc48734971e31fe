use crate::account::{self, SubscriptionView};
use crate::config::Config;
use crate::error::Result;
use crate::store;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

pub fn execute(
    profiles_file: Option<PathBuf>,
    user: Uuid,
    now: Option<DateTime<Utc>>,
    json: bool,
) -> Result<()> {
    let config = Config::load()?;
    let store = store::open_store(&config, profiles_file)?;
    let now = now.unwrap_or_else(Utc::now);

    let view = account::load_view(store.as_ref(), &user, &now)?;
    print_view(&view, json || config.display.json)?;

    // Expired pro subscriptions exit non-zero for scripting
    if view.is_expired() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_view(view: &SubscriptionView, json: bool) -> Result<()> {
    println!("{}", render_view(view, json)?);
    Ok(())
}

/// Text summary plus notice, or a single JSON object
pub(crate) fn render_view(view: &SubscriptionView, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(view)?);
    }

    let mut out = view.summary();
    if let Some(notice) = &view.notice {
        if view.payment_due_soon || view.is_expired() {
            out.push('\n');
            out.push_str(notice);
        }
    }

    Ok(out)
}
