use crate::account::SubscriptionView;
use crate::admin::{self, UserEdit};
use crate::cli::commands::status::render_view;
use crate::cli::EditUserArgs;
use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::models::Profile;
use crate::store::{self, ProfileStore};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub fn execute(profiles_file: Option<PathBuf>, args: EditUserArgs) -> Result<()> {
    let config = Config::load()?;
    let store = store::open_store(&config, profiles_file)?;
    let now = args.now.unwrap_or_else(Utc::now);
    let json = args.json || config.display.json;

    let updated = run(store.as_ref(), &args, &now)?;
    println!("{}", render_outcome(&updated, &now, json)?);
    Ok(())
}

/// JSON mode prints only the view so stdout stays one object
fn render_outcome(updated: &Profile, now: &DateTime<Utc>, json: bool) -> Result<String> {
    let view = render_view(&SubscriptionView::from_profile(updated, now), json)?;
    if json {
        Ok(view)
    } else {
        Ok(format!("User updated successfully\n{}", view))
    }
}

fn run(store: &dyn ProfileStore, args: &EditUserArgs, now: &DateTime<Utc>) -> Result<Profile> {
    let current = store
        .fetch_profile(&args.user)?
        .ok_or_else(|| PortalError::ProfileNotFound(args.user.to_string()))?;

    let mut edit = UserEdit::from_profile(&current);
    apply_args(&mut edit, args);

    admin::submit_edit(store, &current, &edit, now)
}

fn apply_args(edit: &mut UserEdit, args: &EditUserArgs) {
    if let Some(first_name) = &args.first_name {
        edit.first_name = first_name.clone();
    }
    if let Some(last_name) = &args.last_name {
        edit.last_name = last_name.clone();
    }
    if let Some(phone) = &args.phone {
        edit.phone_number = Some(phone.clone());
    }
    if let Some(career) = &args.career {
        edit.career = Some(career.clone());
    }
    if let Some(status) = args.status {
        edit.status = status;
    }
    if let Some(plan) = args.plan {
        edit.subscription_status = plan;
    }
    if let Some(end) = args.end {
        edit.subscription_end = Some(end);
    }
}
