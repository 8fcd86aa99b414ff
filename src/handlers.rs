pub mod admin;
pub mod auth;
pub mod events;
pub mod health;
pub mod participants;
pub mod scan;
pub mod students;
pub mod tickets;
