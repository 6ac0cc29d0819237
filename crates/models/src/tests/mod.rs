/// CRUD operations tests for species and pet entities.
///
/// These talk to a live Postgres; they skip when `SKIP_DB_TESTS` is set or
/// when no database is reachable.
pub mod crud_tests;
