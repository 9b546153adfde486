//! Audit log read path.
//!
//! A pure projection over committed audit entries: no write capability is
//! exposed here. The filtered listing backs the compliance/history screen and
//! [`outbound_totals`] backs the dashboard's "top movements" aggregate.

use crate::{
    entities::{AuditEntry, audit_entry},
    errors::Result,
    requests::{AuditFilter, MovementKind},
};
use chrono::{Datelike, NaiveTime};
use sea_orm::entity::prelude::DateTimeUtc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;

/// Lists audit entries matching the filter, newest first.
pub async fn list_audit_entries(
    db: &DatabaseConnection,
    filter: AuditFilter,
) -> Result<Vec<audit_entry::Model>> {
    let mut query = AuditEntry::find();

    if let Some(item_id) = filter.item_id {
        query = query.filter(audit_entry::Column::ItemId.eq(item_id));
    }
    if let Some(kind) = filter.kind {
        query = query.filter(audit_entry::Column::MovementKind.eq(kind.as_str()));
    }
    if let Some(from) = filter.occurred_from {
        query = query.filter(audit_entry::Column::OccurredAt.gte(from));
    }
    if let Some(until) = filter.occurred_until {
        query = query.filter(audit_entry::Column::OccurredAt.lt(until));
    }
    if let Some(actor) = filter.actor {
        query = query.filter(audit_entry::Column::Actor.eq(actor));
    }

    query
        .order_by_desc(audit_entry::Column::OccurredAt)
        .order_by_desc(audit_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Net issued quantity for one item over a period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutboundTotal {
    /// Item the issuances applied to
    pub item_id: i64,
    /// Item name snapshot from the audit trail
    pub item_name: String,
    /// Net quantity issued (reversed/corrected issuances cancel out)
    pub total_issued: i64,
}

#[derive(Debug, FromQueryResult)]
struct RawOutboundTotal {
    item_id: i64,
    item_name: String,
    total_delta: i64,
}

/// Aggregates OUTBOUND audit deltas per item, most-issued first.
///
/// `range` is half-open `[from, until)` and defaults to everything; pass
/// [`current_month`] for the dashboard's monthly view. Summing the signed
/// deltas means a deleted or corrected issuance is netted out rather than
/// double-counted.
pub async fn outbound_totals(
    db: &DatabaseConnection,
    range: Option<(DateTimeUtc, DateTimeUtc)>,
    limit: u64,
) -> Result<Vec<OutboundTotal>> {
    let mut query = AuditEntry::find()
        .select_only()
        .column(audit_entry::Column::ItemId)
        .column(audit_entry::Column::ItemName)
        .column_as(
            Expr::col(audit_entry::Column::QuantityDelta).sum(),
            "total_delta",
        )
        .filter(audit_entry::Column::MovementKind.eq(MovementKind::Outbound.as_str()));

    if let Some((from, until)) = range {
        query = query
            .filter(audit_entry::Column::OccurredAt.gte(from))
            .filter(audit_entry::Column::OccurredAt.lt(until));
    }

    let raw = query
        .group_by(audit_entry::Column::ItemId)
        .group_by(audit_entry::Column::ItemName)
        // Issuance deltas are negative, so ascending sum puts most-issued first
        .order_by_asc(Expr::col(audit_entry::Column::QuantityDelta).sum())
        .limit(limit)
        .into_model::<RawOutboundTotal>()
        .all(db)
        .await?;

    Ok(raw
        .into_iter()
        .map(|row| OutboundTotal {
            item_id: row.item_id,
            item_name: row.item_name,
            total_issued: -row.total_delta,
        })
        .collect())
}

/// Half-open bounds of the current calendar month, for the dashboard aggregate.
#[must_use]
pub fn current_month() -> (DateTimeUtc, DateTimeUtc) {
    month_bounds(chrono::Utc::now())
}

fn month_bounds(now: DateTimeUtc) -> (DateTimeUtc, DateTimeUtc) {
    let today = now.date_naive();
    let start = today.with_day(1).unwrap_or(today);
    let end = if start.month() == 12 {
        start
            .with_year(start.year() + 1)
            .and_then(|d| d.with_month(1))
    } else {
        start.with_month(start.month() + 1)
    }
    .unwrap_or(start);

    (
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    )
}
