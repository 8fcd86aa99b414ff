//! Participants and their tickets.
//!
//! A participant and its ticket are the same `tickets` row, so every write here is a
//! single statement and the two views cannot disagree.

use chrono::Utc;
use model::entities::{event, ticket};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError, is_unique_violation};
use crate::token::{MAX_TOKEN_ATTEMPTS, generate_token};

#[derive(Debug, Clone)]
pub struct ParticipantInput {
    pub first_name: String,
    pub last_name: String,
    pub promo: Option<String>,
    pub email: Option<String>,
    pub tarif: Option<String>,
}

impl ParticipantInput {
    /// Builds a participant from a ticket holder name such as "Ada King Lovelace".
    ///
    /// The first word becomes the first name and the rest the last name, so the
    /// ticket projection renders the name unchanged.
    pub fn from_holder(user_name: &str, user_email: Option<String>) -> Self {
        let user_name = user_name.trim();
        let (first_name, last_name) = match user_name.split_once(char::is_whitespace) {
            Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
            None => (user_name.to_string(), String::new()),
        };
        Self {
            first_name,
            last_name,
            promo: None,
            email: user_email,
            tarif: None,
        }
    }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ParticipantChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub promo: Option<String>,
    pub email: Option<String>,
    pub tarif: Option<String>,
}

async fn ensure_event<C: ConnectionTrait>(conn: &C, event_id: i32) -> Result<event::Model> {
    event::Entity::find_by_id(event_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Event", event_id))
}

/// Inserts an UNUSED ticket, drawing a new token when the previous one collided.
async fn insert_with_fresh_token<C: ConnectionTrait>(
    conn: &C,
    event_id: i32,
    input: &ParticipantInput,
) -> Result<ticket::Model> {
    for attempt in 1..=MAX_TOKEN_ATTEMPTS {
        let row = ticket::ActiveModel {
            event_id: Set(event_id),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            promo: Set(input.promo.clone()),
            email: Set(input.email.clone()),
            tarif: Set(input.tarif.clone()),
            qr_code_token: Set(generate_token()),
            status: Set(ticket::TicketStatus::Unused),
            scanned_at: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        match row.insert(conn).await {
            Ok(ticket) => return Ok(ticket),
            Err(e) if is_unique_violation(&e) => {
                warn!("Token collision on attempt {} for event {}", attempt, event_id);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ServiceError::Conflict(
        "Could not allocate a unique ticket token".to_string(),
    ))
}

pub async fn list_participants(
    db: &DatabaseConnection,
    event_id: i32,
) -> Result<Vec<ticket::Model>> {
    ensure_event(db, event_id).await?;
    let participants = ticket::Entity::find()
        .filter(ticket::Column::EventId.eq(event_id))
        .order_by_asc(ticket::Column::LastName)
        .order_by_asc(ticket::Column::FirstName)
        .all(db)
        .await?;
    debug!(
        "Retrieved {} participants for event {}",
        participants.len(),
        event_id
    );
    Ok(participants)
}

pub async fn get_participant(
    db: &DatabaseConnection,
    event_id: i32,
    participant_id: i32,
) -> Result<ticket::Model> {
    ensure_event(db, event_id).await?;
    ticket::Entity::find_by_id(participant_id)
        .filter(ticket::Column::EventId.eq(event_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Participant", participant_id))
}

/// Registers a participant; the returned row is also its UNUSED ticket.
#[instrument(skip(db))]
pub async fn create_participant(
    db: &DatabaseConnection,
    event_id: i32,
    input: ParticipantInput,
) -> Result<ticket::Model> {
    ensure_event(db, event_id).await?;
    let participant = insert_with_fresh_token(db, event_id, &input).await?;
    info!(
        "Participant {} registered to event {}",
        participant.id, event_id
    );
    Ok(participant)
}

/// Issues several tickets at once. Either all of them are created or none.
#[instrument(skip(db, inputs), fields(count = inputs.len()))]
pub async fn create_tickets_bulk(
    db: &DatabaseConnection,
    event_id: i32,
    inputs: Vec<ParticipantInput>,
) -> Result<Vec<ticket::Model>> {
    let txn = db.begin().await?;
    ensure_event(&txn, event_id).await?;

    let mut created = Vec::with_capacity(inputs.len());
    for input in &inputs {
        created.push(insert_with_fresh_token(&txn, event_id, input).await?);
    }

    txn.commit().await?;
    info!("Issued {} tickets for event {}", created.len(), event_id);
    Ok(created)
}

#[instrument(skip(db))]
pub async fn update_participant(
    db: &DatabaseConnection,
    event_id: i32,
    participant_id: i32,
    changes: ParticipantChanges,
) -> Result<ticket::Model> {
    let existing = get_participant(db, event_id, participant_id).await?;
    let mut active: ticket::ActiveModel = existing.clone().into();
    let mut touched = false;

    if let Some(first_name) = changes.first_name {
        active.first_name = Set(first_name.trim().to_string());
        touched = true;
    }
    if let Some(last_name) = changes.last_name {
        active.last_name = Set(last_name.trim().to_string());
        touched = true;
    }
    if let Some(promo) = changes.promo {
        active.promo = Set(Some(promo));
        touched = true;
    }
    if let Some(email) = changes.email {
        active.email = Set(Some(email));
        touched = true;
    }
    if let Some(tarif) = changes.tarif {
        active.tarif = Set(Some(tarif));
        touched = true;
    }

    if !touched {
        debug!("No fields to update for participant {}", participant_id);
        return Ok(existing);
    }

    let updated = active.update(db).await?;
    info!("Participant {} of event {} updated", participant_id, event_id);
    Ok(updated)
}

/// Removes the participant, and with it the ticket.
#[instrument(skip(db))]
pub async fn delete_participant(
    db: &DatabaseConnection,
    event_id: i32,
    participant_id: i32,
) -> Result<()> {
    let existing = get_participant(db, event_id, participant_id).await?;
    ticket::Entity::delete_by_id(existing.id).exec(db).await?;
    info!(
        "Participant {} and its ticket removed from event {}",
        participant_id, event_id
    );
    Ok(())
}
