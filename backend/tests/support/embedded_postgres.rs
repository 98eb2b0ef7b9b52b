//! Database reset and schema setup against an embedded cluster.
//!
//! Reset uses the `postgres` client directly so `DROP DATABASE` runs outside
//! any Diesel transaction; schema setup runs the service's own embedded
//! migrations so test schemas cannot drift.

use course_lists::outbound::persistence::apply_blocking;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

use super::format_postgres_error;

/// Drop and recreate `name`, returning its connection URL.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<String, String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let quoted = name.replace('"', "\"\"");
    // Separate statements: a multi-statement batch runs in one transaction,
    // which DROP DATABASE refuses.
    client
        .batch_execute(&format!(r#"DROP DATABASE IF EXISTS "{quoted}" WITH (FORCE)"#))
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(r#"CREATE DATABASE "{quoted}""#))
        .map_err(|err| format_postgres_error(&err))?;
    Ok(cluster.connection().database_url(name))
}

/// Apply every embedded migration to the database at `url`.
pub fn migrate_schema(url: &str) -> Result<usize, String> {
    apply_blocking(url).map_err(|err| err.to_string())
}
