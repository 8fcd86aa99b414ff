use super::event;
use sea_orm::entity::prelude::*;

/// Lifecycle of a ticket. The only transition is `Unused -> Scanned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TicketStatus {
    #[sea_orm(string_value = "UNUSED")]
    Unused,
    #[sea_orm(string_value = "SCANNED")]
    Scanned,
    /// Reserved. Nothing in the application assigns it.
    #[sea_orm(string_value = "CANCELED")]
    Canceled,
}

/// A participant registered to an event together with its entry ticket.
///
/// Both views share one row so the participant identity and the ticket status can
/// never drift apart. The ticket holder name is derived from the first and last names.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub promo: Option<String>,
    pub email: Option<String>,
    pub tarif: Option<String>,
    /// Random URL-safe token printed in the QR code.
    #[sea_orm(unique)]
    pub qr_code_token: String,
    pub status: TicketStatus,
    /// Set once, on the first accepted scan.
    pub scanned_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Holder name as printed on the ticket.
    pub fn holder_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "event::Entity",
        from = "Column::EventId",
        to = "event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,
}

impl Related<event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
