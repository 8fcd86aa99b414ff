//! Check-in scan validation: the one state machine in the system.

use chrono::{DateTime, Utc};
use common::{ScanReason, ScanResult};
use model::entities::{event, ticket};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;

/// Maps the stored status onto its wire representation.
pub fn wire_status(status: ticket::TicketStatus) -> common::TicketStatus {
    match status {
        ticket::TicketStatus::Unused => common::TicketStatus::Unused,
        ticket::TicketStatus::Scanned => common::TicketStatus::Scanned,
        ticket::TicketStatus::Canceled => common::TicketStatus::Canceled,
    }
}

async fn find_by_token(db: &DatabaseConnection, token: &str) -> Result<Option<ticket::Model>> {
    Ok(ticket::Entity::find()
        .filter(ticket::Column::QrCodeToken.eq(token))
        .one(db)
        .await?)
}

async fn describe(
    db: &DatabaseConnection,
    ticket: ticket::Model,
    valid: bool,
    reason: Option<ScanReason>,
) -> Result<ScanResult> {
    let event_name = event::Entity::find_by_id(ticket.event_id)
        .one(db)
        .await?
        .map(|event| event.name);

    Ok(ScanResult {
        valid,
        reason,
        ticket_id: Some(ticket.id),
        event_id: Some(ticket.event_id),
        event_name,
        user_name: Some(ticket.holder_name()),
        user_email: ticket.email.clone(),
        status: Some(wire_status(ticket.status)),
        scanned_at: ticket.scanned_at,
    })
}

/// Consumes the ticket behind `token`.
///
/// The UNUSED -> SCANNED transition is a single conditional UPDATE, so two
/// concurrent scans of one token can never both be accepted.
#[instrument(skip(db))]
pub async fn scan_ticket(
    db: &DatabaseConnection,
    token: &str,
    now: DateTime<Utc>,
) -> Result<ScanResult> {
    let token = token.trim();
    if token.is_empty() {
        debug!("Empty token scanned");
        return Ok(ScanResult::not_found());
    }

    let consumed = ticket::Entity::update_many()
        .set(ticket::ActiveModel {
            status: Set(ticket::TicketStatus::Scanned),
            scanned_at: Set(Some(now)),
            ..Default::default()
        })
        .filter(ticket::Column::QrCodeToken.eq(token))
        .filter(ticket::Column::Status.eq(ticket::TicketStatus::Unused))
        .exec(db)
        .await?;

    let Some(ticket) = find_by_token(db, token).await? else {
        info!("Scan rejected: unknown token");
        return Ok(ScanResult::not_found());
    };

    if consumed.rows_affected == 1 {
        info!("Ticket {} of event {} accepted", ticket.id, ticket.event_id);
        return describe(db, ticket, true, None).await;
    }

    let reason = match ticket.status {
        ticket::TicketStatus::Canceled => ScanReason::TicketCanceled,
        _ => ScanReason::AlreadyScanned,
    };
    warn!(
        "Scan rejected for ticket {}: {} (first scan at {:?})",
        ticket.id,
        reason.as_str(),
        ticket.scanned_at
    );
    describe(db, ticket, false, Some(reason)).await
}
