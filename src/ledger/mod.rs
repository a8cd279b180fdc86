//! The contact ledger: an ordered `pending` view that rows are popped from
//! and deleted exactly once on a terminal outcome, plus an append-only
//! `failed` view.

use std::path::Path;

use chrono::Utc;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;

mod migrations;

use migrations::run_migrations;

/// One row of the pending view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    /// Rowid of the pending entry; used for the exactly-once delete.
    pub row_id: i64,
}

/// Single-writer SQLite store. The main context owns the only handle, so no
/// locking discipline is needed; a watchdog abort may tear a write, which is
/// accepted.
pub struct Ledger {
    conn: Connection,
}

impl Ledger {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    crate::error::Error::LedgerIo(format!(
                        "failed to create ledger directory {}: {err}",
                        parent.display()
                    ))
                })?;
            }
        }

        let mut conn = Connection::open(path)?;
        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("failed to enable WAL mode: {err}");
        }
        run_migrations(&mut conn)?;

        info!("ledger opened at {}", path.display());
        Ok(Self { conn })
    }

    pub fn add_pending(&self, name: &str, phone: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO pending (name, phone) VALUES (?1, ?2)",
            params![name, phone],
        )?;
        Ok(())
    }

    /// Head of the pending view in insertion order. A head row with no phone
    /// number is the exhaustion sentinel: iteration stops there.
    pub fn next_pending(&self) -> Result<Option<Contact>> {
        let head = self
            .conn
            .query_row(
                "SELECT id, name, phone FROM pending ORDER BY id LIMIT 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(match head {
            Some((row_id, name, Some(phone))) if !phone.trim().is_empty() => Some(Contact {
                name,
                phone,
                row_id,
            }),
            Some((_, name, _)) => {
                info!("pending row for '{name}' has no phone number; ledger exhausted");
                None
            }
            None => None,
        })
    }

    /// Delete a pending row. Called exactly once per contact, on its terminal
    /// outcome only.
    pub fn remove_pending(&self, row_id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM pending WHERE id = ?1", params![row_id])?;
        Ok(())
    }

    pub fn append_failed(&self, name: &str, phone: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO failed (name, phone, failed_at) VALUES (?1, ?2, ?3)",
            params![name, phone, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn pending_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM pending", [], |row| row.get(0))?)
    }

    pub fn failed_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM failed", [], |row| row.get(0))?)
    }

    /// All failed rows, oldest first. Used for run summaries and tests.
    pub fn failed_rows(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, phone FROM failed ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
