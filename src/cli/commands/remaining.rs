use crate::config::Config;
use crate::error::Result;
use crate::expiry::{self, RemainingDuration};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RemainingReport {
    end: DateTime<Utc>,
    now: DateTime<Utc>,
    label: String,
    #[serde(flatten)]
    breakdown: RemainingDuration,
    days_until: i64,
    due_soon: bool,
}

fn report(end: DateTime<Utc>, now: DateTime<Utc>) -> RemainingReport {
    let breakdown = expiry::remaining(&end, &now);
    RemainingReport {
        end,
        now,
        label: breakdown.label(),
        breakdown,
        days_until: expiry::days_until(&end, &now),
        due_soon: expiry::due_soon(&end, &now),
    }
}

pub fn execute(end: DateTime<Utc>, now: Option<DateTime<Utc>>, json: bool) -> Result<()> {
    let json = json || Config::load()?.display.json;
    let now = now.unwrap_or_else(Utc::now);

    println!("{}", render(&report(end, now), json)?);
    Ok(())
}

fn render(report: &RemainingReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut out = report.label.clone();
    if report.due_soon {
        out.push_str(&format!(
            "\nPayment due soon ({} day{} until {})",
            report.days_until,
            if report.days_until == 1 { "" } else { "s" },
            report.end.format("%Y-%m-%d")
        ));
    }

    Ok(out)
}
