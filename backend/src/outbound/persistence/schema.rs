//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Classification profiles.
    ///
    /// Rows are soft-deleted: `deleted_at` is stamped and every read filters
    /// on `deleted_at IS NULL`.
    profiles (id) {
        /// Primary key assigned from a sequence.
        id -> Int8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last overwrite timestamp.
        updated_at -> Timestamptz,
        /// Soft-deletion marker.
        deleted_at -> Nullable<Timestamptz>,
        /// Free-text label used as the creation de-duplication key.
        name -> Text,
        /// Optional attribution.
        author -> Nullable<Text>,
        /// Free-text description.
        description -> Text,
        /// Opaque serialised class.
        class -> Text,
        /// Opaque serialised filter list.
        filters -> Text,
        /// Opaque serialised facet list.
        facets -> Text,
        /// Opaque serialised attribute list.
        attributes -> Text,
        /// Subclass inclusion flag.
        subclass -> Bool,
    }
}
