//! PostgreSQL-backed `ProfileRepository` implementation using Diesel ORM.
//!
//! Every read filters on `deleted_at IS NULL`. Mutations are single
//! statements with `RETURNING`, so a row observed by an overwrite or a soft
//! delete is the row that statement changed.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, ProfileFields, ProfileId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewProfileRow, ProfileOverwrite, ProfileRow};
use super::pool::DbPool;
use super::schema::profiles;

/// Diesel-backed implementation of the `ProfileRepository` port.
///
/// Timestamps come from the injected clock so tests can control them.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselProfileRepository {
    /// Create a repository using the system clock.
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }

    /// Create a repository using `clock` for every timestamp it writes.
    pub fn with_clock(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Convert a database row to a domain profile.
fn row_to_profile(row: ProfileRow) -> Result<Profile, ProfileRepositoryError> {
    let id = ProfileId::new(row.id)
        .map_err(|err| ProfileRepositoryError::query(format!("invalid stored id: {err}")))?;
    Ok(Profile {
        id,
        created_at: row.created_at,
        updated_at: row.updated_at,
        deleted_at: row.deleted_at,
        fields: ProfileFields {
            name: row.name,
            author: row.author,
            description: row.description,
            class: row.class,
            filters: row.filters,
            facets: row.facets,
            attributes: row.attributes,
            subclass: row.subclass,
        },
    })
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_live_by_name(&self, name: &str) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;

        let row: Option<ProfileRow> = profiles::table
            .filter(profiles::name.eq(name))
            .filter(profiles::deleted_at.is_null())
            .order(profiles::id.asc())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }

    async fn find_live_by_id(
        &self,
        id: ProfileId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;

        let row: Option<ProfileRow> = profiles::table
            .filter(profiles::id.eq(id.get()))
            .filter(profiles::deleted_at.is_null())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }

    async fn list_live(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;

        let rows: Vec<ProfileRow> = profiles::table
            .filter(profiles::deleted_at.is_null())
            .order(profiles::id.asc())
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_profile).collect()
    }

    async fn insert(&self, fields: &ProfileFields) -> Result<Profile, ProfileRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let now = self.clock.utc();

        let new_row = NewProfileRow {
            created_at: now,
            updated_at: now,
            name: &fields.name,
            author: fields.author.as_deref(),
            description: &fields.description,
            class: &fields.class,
            filters: &fields.filters,
            facets: &fields.facets,
            attributes: &fields.attributes,
            subclass: fields.subclass,
        };

        let row: ProfileRow = diesel::insert_into(profiles::table)
            .values(&new_row)
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_profile(row)
    }

    async fn overwrite(
        &self,
        id: ProfileId,
        fields: &ProfileFields,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;

        let changes = ProfileOverwrite {
            updated_at: self.clock.utc(),
            name: &fields.name,
            author: fields.author.as_deref(),
            description: &fields.description,
            class: &fields.class,
            filters: &fields.filters,
            facets: &fields.facets,
            attributes: &fields.attributes,
            subclass: fields.subclass,
        };

        let row: Option<ProfileRow> = diesel::update(
            profiles::table
                .filter(profiles::id.eq(id.get()))
                .filter(profiles::deleted_at.is_null()),
        )
        .set(&changes)
        .returning(ProfileRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }

    async fn soft_delete(&self, id: ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;

        let row: Option<ProfileRow> = diesel::update(
            profiles::table
                .filter(profiles::id.eq(id.get()))
                .filter(profiles::deleted_at.is_null()),
        )
        .set(profiles::deleted_at.eq(Some(self.clock.utc())))
        .returning(ProfileRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        // The statement only stamped `deleted_at`; clearing it recovers the
        // row exactly as it was before deletion.
        row.map(|deleted| {
            row_to_profile(ProfileRow {
                deleted_at: None,
                ..deleted
            })
        })
        .transpose()
    }
}
