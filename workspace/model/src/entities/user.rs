use sea_orm::entity::prelude::*;

/// An operator account able to log into the back office.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    /// PHC-formatted argon2 hash, never the plaintext password.
    pub hashed_password: String,
    /// Superadmins bypass every per-event ownership check.
    #[sea_orm(default_value = "false")]
    pub is_superadmin: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user can create multiple events.
    #[sea_orm(has_many = "super::event::Entity")]
    Event,
    #[sea_orm(has_many = "super::event_admin::Entity")]
    EventAdmin,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
