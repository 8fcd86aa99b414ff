//! Root of all SeaORM entity modules for the ticketing back office.
//!
//! Participants and tickets live in the same `tickets` table: a participant row *is*
//! its ticket, which keeps holder identity and scan status consistent by construction.

pub mod event;
pub mod event_admin;
pub mod student;
pub mod ticket;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::event::Entity as Event;
    pub use super::event_admin::Entity as EventAdmin;
    pub use super::student::Entity as Student;
    pub use super::ticket::Entity as Ticket;
    pub use super::user::Entity as User;
}
