//! Internal Diesel row structs for the profiles table.
//!
//! These types are implementation details of the persistence layer and never
//! leave it; conversions to domain types live next to the repository.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::profiles;

/// Row struct for reading from the profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
    pub author: Option<String>,
    pub description: String,
    pub class: String,
    pub filters: String,
    pub facets: String,
    pub attributes: String,
    pub subclass: bool,
}

/// Insertable struct for creating profile records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: &'a str,
    pub author: Option<&'a str>,
    pub description: &'a str,
    pub class: &'a str,
    pub filters: &'a str,
    pub facets: &'a str,
    pub attributes: &'a str,
    pub subclass: bool,
}

/// Changeset overwriting every caller-controlled column.
///
/// `author: None` clears the column rather than leaving it untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = profiles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileOverwrite<'a> {
    pub updated_at: DateTime<Utc>,
    pub name: &'a str,
    pub author: Option<&'a str>,
    pub description: &'a str,
    pub class: &'a str,
    pub filters: &'a str,
    pub facets: &'a str,
    pub attributes: &'a str,
    pub subclass: bool,
}
