use rusqlite::{Connection, Transaction};

use crate::error::{Error, Result};

const CURRENT_SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let mut version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|err| Error::Migration(format!("failed to read user_version: {err}")))?;

    if version > CURRENT_SCHEMA_VERSION {
        return Err(Error::Migration(format!(
            "ledger version ({version}) is newer than supported schema ({CURRENT_SCHEMA_VERSION})"
        )));
    }

    if version == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn
        .transaction()
        .map_err(|err| Error::Migration(format!("failed to open transaction: {err}")))?;

    while version < CURRENT_SCHEMA_VERSION {
        let next_version = version + 1;
        apply_migration(&tx, next_version)
            .map_err(|err| Error::Migration(format!("migration to v{next_version}: {err}")))?;
        version = next_version;
    }

    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
        .map_err(|err| Error::Migration(format!("failed to update user_version: {err}")))?;
    tx.commit()
        .map_err(|err| Error::Migration(format!("failed to commit: {err}")))?;

    Ok(())
}

fn apply_migration(tx: &Transaction<'_>, version: i32) -> rusqlite::Result<()> {
    match version {
        1 => tx.execute_batch(include_str!("schemas/schema_v1.sql")),
        _ => unreachable!("unknown migration target version: {version}"),
    }
}
