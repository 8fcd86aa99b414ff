//! Business rules of the ticketing desk, independent of the HTTP layer.
//!
//! Every operation takes a `DatabaseConnection` and, where authorization matters, the
//! caller's [`identity::Identity`]. Handlers only translate requests and errors.

pub mod email_domains;
pub mod error;
pub mod events;
pub mod identity;
pub mod import;
pub mod participants;
pub mod scan;
pub mod students;
pub mod token;
pub mod users;

#[cfg(test)]
mod testing;

pub use email_domains::EmailClassifier;
pub use error::{Result, ServiceError};
pub use identity::Identity;
