//! Event catalog and the event-admin association.

use chrono::NaiveDateTime;
use model::entities::{event, event_admin, ticket, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError, is_unique_violation};
use crate::identity::Identity;

#[derive(Debug, Clone)]
pub struct EventInput {
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub location: String,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub location: Option<String>,
}

/// Creates the event and the creator's OWNER row atomically.
#[instrument(skip(db))]
pub async fn create_event(
    db: &DatabaseConnection,
    caller: &Identity,
    input: EventInput,
) -> Result<event::Model> {
    let txn = db.begin().await?;

    let event = event::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        date: Set(input.date),
        location: Set(input.location),
        created_by_id: Set(caller.user_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    event_admin::ActiveModel {
        event_id: Set(event.id),
        user_id: Set(caller.user_id),
        role: Set(event_admin::EventRole::Owner),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!(
        "Event created with ID: {}, name: {}, owner: {}",
        event.id, event.name, caller.user_id
    );
    Ok(event)
}

pub async fn list_events(db: &DatabaseConnection) -> Result<Vec<event::Model>> {
    Ok(event::Entity::find()
        .order_by_asc(event::Column::Date)
        .order_by_asc(event::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_event(db: &DatabaseConnection, event_id: i32) -> Result<event::Model> {
    event::Entity::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Event", event_id))
}

#[instrument(skip(db))]
pub async fn update_event(
    db: &DatabaseConnection,
    caller: &Identity,
    event_id: i32,
    changes: EventChanges,
) -> Result<event::Model> {
    let existing = get_event(db, event_id).await?;
    if let Err(denied) = caller.ensure_can_manage(&existing) {
        warn!("User {} may not update event {}", caller.user_id, event_id);
        return Err(denied);
    }

    let mut active: event::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(name) = changes.name {
        active.name = Set(name);
        updated_fields.push("name");
    }
    if let Some(description) = changes.description {
        active.description = Set(Some(description));
        updated_fields.push("description");
    }
    if let Some(date) = changes.date {
        active.date = Set(date);
        updated_fields.push("date");
    }
    if let Some(location) = changes.location {
        active.location = Set(location);
        updated_fields.push("location");
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for event {}", event_id);
        return get_event(db, event_id).await;
    }

    let updated = active.update(db).await?;
    info!(
        "Event {} updated by user {}. Updated fields: {}",
        event_id,
        caller.user_id,
        updated_fields.join(", ")
    );
    Ok(updated)
}

/// Deletes the event with its tickets and admin rows.
#[instrument(skip(db))]
pub async fn delete_event(db: &DatabaseConnection, caller: &Identity, event_id: i32) -> Result<()> {
    let existing = get_event(db, event_id).await?;
    if let Err(denied) = caller.ensure_can_manage(&existing) {
        warn!("User {} may not delete event {}", caller.user_id, event_id);
        return Err(denied);
    }

    let txn = db.begin().await?;
    let tickets = ticket::Entity::delete_many()
        .filter(ticket::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;
    event_admin::Entity::delete_many()
        .filter(event_admin::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;
    event::Entity::delete_by_id(event_id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        "Event {} deleted by user {} along with {} tickets",
        event_id, caller.user_id, tickets.rows_affected
    );
    Ok(())
}

pub async fn list_admins(
    db: &DatabaseConnection,
    event_id: i32,
) -> Result<Vec<(event_admin::Model, Option<user::Model>)>> {
    get_event(db, event_id).await?;
    Ok(event_admin::Entity::find()
        .filter(event_admin::Column::EventId.eq(event_id))
        .order_by_asc(event_admin::Column::Id)
        .find_also_related(user::Entity)
        .all(db)
        .await?)
}

/// Grants the ADMIN role on an event. Only the owner or a superadmin may do this.
#[instrument(skip(db))]
pub async fn add_admin(
    db: &DatabaseConnection,
    caller: &Identity,
    event_id: i32,
    user_id: i32,
) -> Result<event_admin::Model> {
    let event = get_event(db, event_id).await?;
    caller.ensure_can_manage(&event)?;

    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("User", user_id))?;

    let row = event_admin::ActiveModel {
        event_id: Set(event_id),
        user_id: Set(user_id),
        role: Set(event_admin::EventRole::Admin),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(admin) => {
            info!("User {} is now admin of event {}", user_id, event_id);
            Ok(admin)
        }
        Err(e) if is_unique_violation(&e) => Err(ServiceError::Conflict(format!(
            "User {} is already attached to event {}",
            user_id, event_id
        ))),
        Err(e) => Err(e.into()),
    }
}
