use super::{ticket, user};
use sea_orm::entity::prelude::*;

/// Something people register for and get scanned into.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Local wall-clock time of the event, no timezone attached.
    pub date: DateTime,
    pub location: String,
    /// The user who created the event, implicitly its owner.
    pub created_by_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedById",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::event_admin::Entity")]
    EventAdmin,
    #[sea_orm(has_many = "super::ticket::Entity")]
    Ticket,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
