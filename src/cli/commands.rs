pub mod import_students;
pub mod initdb;
pub mod serve;

pub use import_students::import_students;
pub use initdb::init_database;
pub use serve::serve;
