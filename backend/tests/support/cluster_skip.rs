//! Policy for skipping suites that need an embedded PostgreSQL cluster.

fn is_truthy(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// True when `RUN_PG_EMBEDDED` opts in to embedded PostgreSQL suites.
pub fn embedded_postgres_enabled() -> bool {
    is_truthy("RUN_PG_EMBEDDED")
}

/// True when `SKIP_TEST_CLUSTER` asks for cluster failures to be tolerated.
pub fn should_skip_test_cluster() -> bool {
    is_truthy("SKIP_TEST_CLUSTER")
}

/// Handle an embedded cluster setup failure.
///
/// With `SKIP_TEST_CLUSTER` set this prints a skip marker and returns `None`;
/// otherwise it panics so CI breakage is not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
