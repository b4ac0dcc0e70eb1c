//! Fridge listing and maintenance.

use chopchop_core::{Freshness, ItemId, describe_days_left};
use chopchop_scanner::fridge::{FridgeEntry, FridgeService};
use chrono::{DateTime, TimeDelta, Utc};

use crate::commands::parse_date;
use crate::context::{Context, say};
use crate::error::CliError;

fn service(ctx: &Context) -> FridgeService {
    FridgeService::new(ctx.supabase.clone())
}

fn render(entry: &FridgeEntry) -> String {
    let when = match entry.days_left {
        Some(days) => describe_days_left(days),
        None => "no expiry date".to_string(),
    };
    let marker = match entry.freshness {
        Freshness::Expired => "✗",
        Freshness::Urgent => "!",
        Freshness::Soon => "~",
        Freshness::Fresh | Freshness::Unknown => " ",
    };
    format!("{marker} [{}] {} ({when})", entry.record.id, entry.record.item_name)
}

pub async fn list(ctx: &Context, search: Option<&str>) -> Result<(), CliError> {
    let stored = ctx.restore().await?;
    let session = stored.session();
    let now = Utc::now();

    let entries = match search {
        Some(needle) => service(ctx).search(Some(&session), needle, now).await?,
        None => service(ctx).list(Some(&session), now).await?,
    };

    if entries.is_empty() {
        return say(if search.is_some() {
            "No items match that search."
        } else {
            "Your fridge is empty."
        });
    }
    for entry in &entries {
        say(render(entry))?;
    }
    Ok(())
}

/// Resolve `--expires` or `--days` into a timestamp.
fn expiry(expires: Option<&str>, days: Option<u32>, now: DateTime<Utc>) -> Result<DateTime<Utc>, CliError> {
    match (expires, days) {
        (Some(date), _) => parse_date(date),
        (None, Some(days)) => Ok(now + TimeDelta::days(i64::from(days))),
        (None, None) => Err(CliError::MissingExpiry),
    }
}

pub async fn add(ctx: &Context, name: &str, expires: Option<&str>, days: Option<u32>) -> Result<(), CliError> {
    let stored = ctx.restore().await?;
    let now = Utc::now();
    let expires_on = expiry(expires, days, now)?;

    let row = service(ctx)
        .add(Some(&stored.session()), name, expires_on, now)
        .await?;
    say(format_args!(
        "Added {} (expires {}).",
        row.item_name,
        row.expires_on.format("%Y-%m-%d")
    ))
}

pub async fn delete(ctx: &Context, id: i64) -> Result<(), CliError> {
    let stored = ctx.restore().await?;
    service(ctx)
        .delete(Some(&stored.session()), ItemId::new(id))
        .await?;
    say(format_args!("Deleted item {id}."))
}

pub async fn edit(ctx: &Context, id: i64, expires: &str) -> Result<(), CliError> {
    let stored = ctx.restore().await?;
    let expires_on = parse_date(expires)?;
    service(ctx)
        .update_expiry(Some(&stored.session()), ItemId::new(id), expires_on)
        .await?;
    say(format_args!("Item {id} now expires {}.", expires_on.format("%Y-%m-%d")))
}

pub async fn clear_expired(ctx: &Context) -> Result<(), CliError> {
    let stored = ctx.restore().await?;
    let removed = service(ctx)
        .clear_expired(Some(&stored.session()), Utc::now())
        .await?;
    say(match removed {
        0 => "No expired items.".to_string(),
        1 => "Removed 1 expired item.".to_string(),
        n => format!("Removed {n} expired items."),
    })
}

#[cfg(test)]
mod tests {
    use chopchop_core::{InventoryRecord, UserId};

    use super::*;

    fn at(day: &str) -> DateTime<Utc> {
        parse_date(day).expect("date")
    }

    #[test]
    fn test_expiry_prefers_explicit_date() {
        let now = at("2024-01-01");
        assert_eq!(expiry(Some("2024-02-01"), Some(3), now).expect("date"), at("2024-02-01"));
        assert_eq!(expiry(None, Some(5), now).expect("days"), at("2024-01-06"));
        assert!(expiry(None, None, now).is_err());
    }

    #[test]
    fn test_render_marks_urgent_items() {
        let now = at("2024-01-01");
        let entry = FridgeEntry::evaluate(
            InventoryRecord {
                id: ItemId::new(12),
                user_id: UserId::new(uuid::Uuid::nil()),
                item_name: "🥬 Spinach".to_string(),
                added_on: now,
                expires_on: Some(at("2024-01-02")),
            },
            now,
        );
        assert_eq!(render(&entry), "! [12] 🥬 Spinach (1 day left)");
    }
}
