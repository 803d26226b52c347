//! In-memory profile store.
//!
//! Used when no database is configured and by integration tests. Rows are
//! never removed; soft deletion stamps `deleted_at` exactly as the Diesel
//! adapter does.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, ProfileFields, ProfileId};

#[derive(Debug, Default)]
struct StoreState {
    next_id: i64,
    rows: Vec<Profile>,
}

impl StoreState {
    fn live(&self) -> impl Iterator<Item = &Profile> {
        self.rows.iter().filter(|row| row.deleted_at.is_none())
    }

    fn live_mut(&mut self, id: ProfileId) -> Option<&mut Profile> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id && row.deleted_at.is_none())
    }
}

/// Thread-safe in-memory implementation of [`ProfileRepository`].
///
/// Ids start at 1 and increase monotonically. Rows are kept in insertion
/// order, which is also ascending id order.
#[derive(Clone)]
pub struct InMemoryProfileRepository {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProfileRepository {
    /// Create an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Create an empty store stamping rows with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                next_id: 1,
                rows: Vec::new(),
            })),
            clock,
        }
    }

    /// Every stored row, including soft-deleted ones, in id order.
    pub fn all_rows(&self) -> Vec<Profile> {
        self.lock().rows.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_live_by_name(&self, name: &str) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(self.lock().live().find(|row| row.fields.name == name).cloned())
    }

    async fn find_live_by_id(
        &self,
        id: ProfileId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(self.lock().live().find(|row| row.id == id).cloned())
    }

    async fn list_live(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        Ok(self.lock().live().cloned().collect())
    }

    async fn insert(&self, fields: &ProfileFields) -> Result<Profile, ProfileRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        let id = ProfileId::new(state.next_id)
            .map_err(|err| ProfileRepositoryError::query(err.to_string()))?;
        state.next_id += 1;

        let profile = Profile {
            id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            fields: fields.clone(),
        };
        state.rows.push(profile.clone());
        Ok(profile)
    }

    async fn overwrite(
        &self,
        id: ProfileId,
        fields: &ProfileFields,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        Ok(state.live_mut(id).map(|row| {
            row.fields = fields.clone();
            row.updated_at = now;
            row.clone()
        }))
    }

    async fn soft_delete(&self, id: ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        Ok(state.live_mut(id).map(|row| {
            let snapshot = row.clone();
            row.deleted_at = Some(now);
            snapshot
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use rstest::{fixture, rstest};

    fn fields(name: &str) -> ProfileFields {
        ProfileFields {
            name: name.to_owned(),
            ..ProfileFields::default()
        }
    }

    struct Harness {
        clock: Arc<MutableClock>,
        store: InMemoryProfileRepository,
    }

    #[fixture]
    fn harness() -> Harness {
        let clock = Arc::new(MutableClock::at_epoch_of_tests());
        let store = InMemoryProfileRepository::with_clock(clock.clone());
        Harness { clock, store }
    }

    #[rstest]
    #[tokio::test]
    async fn ids_increase_from_one(harness: Harness) {
        let first = harness.store.insert(&fields("a")).await.expect("insert");
        let second = harness.store.insert(&fields("b")).await.expect("insert");

        assert_eq!(first.id.get(), 1);
        assert_eq!(second.id.get(), 2);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[rstest]
    #[tokio::test]
    async fn name_lookup_prefers_lowest_live_id(harness: Harness) {
        let store = harness.store;
        let first = store.insert(&fields("dup")).await.expect("insert");
        let second = store.insert(&fields("dup")).await.expect("insert");

        let found = store.find_live_by_name("dup").await.expect("lookup");
        assert_eq!(found.map(|p| p.id), Some(first.id));

        store.soft_delete(first.id).await.expect("delete");
        let found = store.find_live_by_name("dup").await.expect("lookup");
        assert_eq!(found.map(|p| p.id), Some(second.id));
    }

    #[rstest]
    #[tokio::test]
    async fn overwrite_advances_updated_at_only(harness: Harness) {
        let Harness { clock, store } = harness;
        let created = store.insert(&fields("a")).await.expect("insert");
        clock.advance_seconds(30);
        let replacement = ProfileFields {
            description: "changed".to_owned(),
            ..fields("a")
        };

        let stored = store
            .overwrite(created.id, &replacement)
            .await
            .expect("overwrite")
            .expect("row is live");

        assert_eq!(stored.created_at, created.created_at);
        assert_eq!((stored.updated_at - created.updated_at).num_seconds(), 30);
        assert_eq!(stored.fields.description, "changed");
    }

    #[rstest]
    #[tokio::test]
    async fn soft_delete_keeps_row_and_returns_snapshot(harness: Harness) {
        let Harness { clock, store } = harness;
        let created = store.insert(&fields("a")).await.expect("insert");
        clock.advance_seconds(1);

        let snapshot = store
            .soft_delete(created.id)
            .await
            .expect("delete")
            .expect("row is live");
        assert_eq!(snapshot, created);

        let rows = store.all_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].deleted_at, Some(clock.utc()));
        assert!(store.find_live_by_id(created.id).await.expect("lookup").is_none());
        assert!(store.soft_delete(created.id).await.expect("delete").is_none());
        assert!(
            store
                .overwrite(created.id, &fields("b"))
                .await
                .expect("overwrite")
                .is_none()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn list_skips_deleted_rows(harness: Harness) {
        let store = harness.store;
        let a = store.insert(&fields("a")).await.expect("insert");
        let b = store.insert(&fields("b")).await.expect("insert");
        let c = store.insert(&fields("c")).await.expect("insert");
        store.soft_delete(b.id).await.expect("delete");

        let ids: Vec<_> = store
            .list_live()
            .await
            .expect("list")
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }
}
