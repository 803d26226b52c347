//! Behavioural contract of the profile operations over the in-memory store.
//!
//! Exercises `ProfileService` through its driving ports exactly as the HTTP
//! adapter does, without a database.

use std::sync::Arc;

use async_trait::async_trait;
use prowd_backend::domain::ports::{
    ProfileCommand, ProfileQuery, ProfileRepository, ProfileRepositoryError, UpdateProfileRequest,
};
use prowd_backend::domain::{
    ErrorCode, Profile, ProfileFields, ProfileId, ProfileService, ProfileSubmission,
};
use prowd_backend::outbound::InMemoryProfileRepository;
use prowd_backend::test_support::MutableClock;
use rstest::{fixture, rstest};

fn fields(name: &str, facets: &str) -> ProfileFields {
    ProfileFields {
        name: name.to_owned(),
        author: None,
        description: format!("{name} profile"),
        class: r#"{"name":"human","code":"Q5"}"#.to_owned(),
        filters: "[]".to_owned(),
        facets: facets.to_owned(),
        attributes: "[]".to_owned(),
        subclass: false,
    }
}

fn id(value: i64) -> ProfileId {
    ProfileId::new(value).expect("non-negative id")
}

struct Store {
    clock: Arc<MutableClock>,
    repository: Arc<InMemoryProfileRepository>,
    service: ProfileService<InMemoryProfileRepository>,
}

#[fixture]
fn store() -> Store {
    let clock = Arc::new(MutableClock::at_epoch_of_tests());
    let repository = Arc::new(InMemoryProfileRepository::with_clock(clock.clone()));
    let service = ProfileService::new(repository.clone());
    Store {
        clock,
        repository,
        service,
    }
}

#[rstest]
#[tokio::test]
async fn create_is_idempotent_by_name(store: Store) {
    let first = store
        .service
        .create(fields("Physicists", r#"["P27"]"#))
        .await
        .expect("first create");
    let second = store
        .service
        .create(fields("Physicists", r#"["P106"]"#))
        .await
        .expect("second create");

    assert_eq!(second, first);
    assert_eq!(second.fields.facets, r#"["P27"]"#);
    assert_eq!(store.repository.all_rows().len(), 1);
}

#[rstest]
#[tokio::test]
async fn distinct_names_are_distinct_profiles(store: Store) {
    let a = store.service.create(fields("A", "[]")).await.expect("create a");
    let b = store.service.create(fields("B", "[]")).await.expect("create b");

    assert_ne!(a.id, b.id);
    assert_eq!(store.service.get(a.id).await.expect("get a"), a);
    assert_eq!(store.service.get(b.id).await.expect("get b"), b);
}

#[rstest]
#[tokio::test]
async fn deleted_profiles_disappear_from_reads(store: Store) {
    let a = store.service.create(fields("A", "[]")).await.expect("create a");
    let b = store.service.create(fields("B", "[]")).await.expect("create b");

    let snapshot = store.service.delete(a.id).await.expect("delete");
    assert_eq!(snapshot, a);

    let listed = store.service.list().await.expect("list");
    assert_eq!(listed, vec![b]);
    let error = store.service.get(a.id).await.expect_err("deleted");
    assert_eq!(error.code(), ErrorCode::NotFound);

    let rows = store.repository.all_rows();
    assert_eq!(rows.len(), 2, "soft delete keeps the row");
}

#[rstest]
#[tokio::test]
async fn update_overwrites_every_field(store: Store) {
    let created = store
        .service
        .create(ProfileFields {
            author: Some("ada".to_owned()),
            subclass: true,
            ..fields("Chemists", r#"["P27"]"#)
        })
        .await
        .expect("create");
    store.clock.advance_seconds(90);

    let replacement = fields("Alchemists", "[]");
    let submission = ProfileSubmission {
        id: Some(id(1234)),
        fields: replacement.clone(),
    };
    let echoed = store
        .service
        .update(UpdateProfileRequest {
            id: created.id,
            submission: submission.clone(),
        })
        .await
        .expect("update");
    assert_eq!(echoed, submission);

    let stored = store.service.get(created.id).await.expect("get");
    assert_eq!(stored.id, created.id);
    assert_eq!(stored.fields, replacement);
    assert_eq!(stored.created_at, created.created_at);
    assert_eq!((stored.updated_at - created.updated_at).num_seconds(), 90);
}

#[rstest]
#[tokio::test]
async fn missing_ids_fail_without_mutation(store: Store) {
    let existing = store.service.create(fields("A", "[]")).await.expect("create");
    let before = store.repository.all_rows();

    let get = store.service.get(id(9)).await.expect_err("get");
    let update = store
        .service
        .update(UpdateProfileRequest {
            id: id(9),
            submission: ProfileSubmission::new(fields("Z", "[]")),
        })
        .await
        .expect_err("update");
    let delete = store.service.delete(id(9)).await.expect_err("delete");

    for error in [get, update, delete] {
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
    assert_eq!(store.repository.all_rows(), before);
    assert_eq!(store.service.get(existing.id).await.expect("get"), existing);
}

#[rstest]
#[tokio::test]
async fn ids_are_never_reused(store: Store) {
    let first = store.service.create(fields("A", "[]")).await.expect("create");
    store.service.delete(first.id).await.expect("delete");

    let again = store.service.create(fields("A", "[]")).await.expect("recreate");
    assert!(again.id > first.id);
}

/// Store whose name lookups give way to other tasks before returning, so
/// concurrent creates interleave between lookup and insert.
struct InterleavingRepository(InMemoryProfileRepository);

#[async_trait]
impl ProfileRepository for InterleavingRepository {
    async fn find_live_by_name(&self, name: &str) -> Result<Option<Profile>, ProfileRepositoryError> {
        let found = self.0.find_live_by_name(name).await;
        tokio::task::yield_now().await;
        found
    }

    async fn find_live_by_id(
        &self,
        id: ProfileId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        self.0.find_live_by_id(id).await
    }

    async fn list_live(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        self.0.list_live().await
    }

    async fn insert(&self, fields: &ProfileFields) -> Result<Profile, ProfileRepositoryError> {
        self.0.insert(fields).await
    }

    async fn overwrite(
        &self,
        id: ProfileId,
        fields: &ProfileFields,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        self.0.overwrite(id, fields).await
    }

    async fn soft_delete(&self, id: ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        self.0.soft_delete(id).await
    }
}

#[tokio::test]
async fn concurrent_same_name_creates_can_both_insert() {
    let inner = InMemoryProfileRepository::new();
    let service = ProfileService::new(Arc::new(InterleavingRepository(inner.clone())));

    let (a, b) = tokio::join!(
        service.create(fields("Race", r#"["first"]"#)),
        service.create(fields("Race", r#"["second"]"#)),
    );
    let a = a.expect("create a");
    let b = b.expect("create b");

    // The race is tolerated, not prevented: both candidates were stored and
    // both callers resolve to the lowest id.
    let rows = inner.all_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(a.id, rows[0].id);
    assert_eq!(b.id, rows[0].id);

    let by_name = inner
        .find_live_by_name("Race")
        .await
        .expect("lookup")
        .expect("live row");
    assert_eq!(by_name.id, rows[0].id);
}
