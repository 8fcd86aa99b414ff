use sea_orm::entity::prelude::*;

/// A person from the global directory, used to autocomplete registrations.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Stored trimmed and lower-cased; the unique index is what de-duplicates imports.
    #[sea_orm(unique)]
    pub email: String,
    /// True when the email domain is not one of the configured internal domains.
    #[sea_orm(default_value = "false")]
    pub is_external: bool,
    /// Lower-cased names and email, matched by the autocomplete search.
    #[sea_orm(column_type = "Text")]
    pub search_key: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Separates the fields of a search key so a query never matches across two of them.
pub const SEARCH_KEY_SEPARATOR: char = '\n';

/// Builds the value stored in `search_key`.
///
/// Folding happens here rather than in SQL because SQLite's `LOWER()` only
/// handles ASCII letters.
pub fn search_key(first_name: &str, last_name: &str, email: &str) -> String {
    [first_name, last_name, email]
        .map(str::to_lowercase)
        .join(&SEARCH_KEY_SEPARATOR.to_string())
}
