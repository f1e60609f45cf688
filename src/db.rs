// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistent key-value store. Each named collection is one JSON document
//! under one key; every mutation is a whole-collection read-modify-write
//! cycle wrapped in a sqlite transaction.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Nestegg", "nestegg"));

/// Collection keys. Each holds the entire collection as one JSON value.
pub mod keys {
    pub const USERS: &str = "users";
    pub const CURRENT_USER: &str = "currentUser";
    pub const TRANSACTIONS: &str = "transactions";
    pub const BUDGETS: &str = "budgets";
    pub const GOALS: &str = "goals";
    pub const INVESTMENTS: &str = "investments";
    pub const BILLS: &str = "bills";
    pub const CATEGORIES: &str = "categories";
    pub const SETTINGS: &str = "settings";
    pub const RATE_LIMIT: &str = "rateLimit";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store read/write failed: {0}")]
    Backend(#[from] rusqlite::Error),
    #[error("stored value under '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("could not encode value for '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("nestegg.sqlite"))
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open_or_init() -> Result<Self> {
        let path = db_path()?;
        let conn =
            Connection::open(&path).with_context(|| format!("Open store at {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Volatile store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        get_in(&self.conn, key)
    }

    /// Read a collection, degrading to its default on any failure. The
    /// degrade path is logged, never fatal.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get(key) {
            Ok(Some(v)) => v,
            Ok(None) => T::default(),
            Err(err) => {
                warn!(key, error = %err, "store read failed, using default");
                T::default()
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        set_in(&self.conn, key, value)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key=?1", params![key])?;
        Ok(())
    }

    /// The single mutation entry point per collection: read the whole
    /// value, apply the closure, write the whole value back, all inside one
    /// sqlite transaction so a read-modify-write cycle can never interleave
    /// with another writer.
    pub fn transact<T, R>(
        &mut self,
        key: &str,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let tx = self.conn.transaction()?;
        let mut value: T = get_in(&tx, key)?.unwrap_or_default();
        let out = f(&mut value);
        set_in(&tx, key, &value)?;
        tx.commit()?;
        Ok(out)
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS kv(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

fn get_in<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>, StoreError> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    match raw {
        Some(s) => serde_json::from_str(&s)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

fn set_in<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    conn.execute(
        "INSERT INTO kv(key, value, updated_at) VALUES(?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
        params![key, encoded],
    )?;
    Ok(())
}
