//! Versioned layout of the local store.
//!
//! Every [`SchemaRevision`] lists the complete set of collections and their
//! indexed fields as of that revision. Opening a store applies, in order, each
//! revision newer than the one persisted in `PRAGMA user_version`. Revisions
//! only ever add collections or indexes.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSchema {
    pub name: &'static str,
    /// Document field holding the primary key.
    pub key_path: &'static str,
    pub indexes: &'static [&'static str],
}

impl CollectionSchema {
    pub fn is_indexed(&self, field: &str) -> bool {
        self.indexes.contains(&field)
    }

    fn statements(&self) -> Vec<String> {
        let mut statements = vec![format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY NOT NULL, doc TEXT NOT NULL)",
            self.name
        )];
        for field in self.indexes {
            statements.push(format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_{field} ON {table} ({expr})",
                table = self.name,
                field = field,
                expr = field_expr(field),
            ));
        }
        statements
    }
}

/// SQL expression reading `field` out of a stored document. Matches the
/// expression the indexes are built on, so lookups can use them.
pub fn field_expr(field: &str) -> String {
    format!("json_extract(doc, '$.{}')", field)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRevision {
    pub version: u32,
    pub collections: &'static [CollectionSchema],
}

impl SchemaRevision {
    pub fn collection(&self, name: &str) -> Option<&CollectionSchema> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Checks that `self` keeps every collection and index of `previous`.
    fn extends(&self, previous: &SchemaRevision) -> Result<()> {
        if self.version <= previous.version {
            return Err(Error::Store(format!(
                "schema revision {} must be newer than {}",
                self.version, previous.version
            )));
        }
        for old in previous.collections {
            let Some(current) = self.collection(old.name) else {
                return Err(Error::Store(format!(
                    "schema revision {} drops collection '{}'",
                    self.version, old.name
                )));
            };
            if current.key_path != old.key_path {
                return Err(Error::Store(format!(
                    "schema revision {} changes the key of '{}'",
                    self.version, old.name
                )));
            }
            if let Some(missing) = old.indexes.iter().find(|f| !current.is_indexed(f)) {
                return Err(Error::Store(format!(
                    "schema revision {} drops index '{}.{}'",
                    self.version, old.name, missing
                )));
            }
        }
        Ok(())
    }
}

const JOBS: CollectionSchema = CollectionSchema {
    name: "jobs",
    key_path: "id",
    indexes: &["title", "status", "slug", "order"],
};

const CANDIDATES: CollectionSchema = CollectionSchema {
    name: "candidates",
    key_path: "id",
    indexes: &["name", "email", "stage", "jobId"],
};

const TIMELINE: CollectionSchema = CollectionSchema {
    name: "timeline",
    key_path: "id",
    indexes: &["candidateId", "date"],
};

const ASSESSMENTS: CollectionSchema = CollectionSchema {
    name: "assessments",
    key_path: "jobId",
    indexes: &["jobId"],
};

const ASSESSMENT_RESPONSES: CollectionSchema = CollectionSchema {
    name: "assessment_responses",
    key_path: "id",
    indexes: &["assessmentId", "candidateId"],
};

pub static REVISIONS: &[SchemaRevision] = &[
    SchemaRevision {
        version: 1,
        collections: &[JOBS, CANDIDATES, TIMELINE],
    },
    SchemaRevision {
        version: 2,
        collections: &[JOBS, CANDIDATES, TIMELINE, ASSESSMENTS, ASSESSMENT_RESPONSES],
    },
];

pub fn check_additive(revisions: &[SchemaRevision]) -> Result<()> {
    for pair in revisions.windows(2) {
        pair[1].extends(&pair[0])?;
    }
    Ok(())
}

pub async fn current_version(pool: &SqlitePool) -> Result<u32> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    Ok(version as u32)
}

/// Brings the store up to the last of `revisions`, returning the resulting
/// version.
pub async fn migrate(pool: &SqlitePool, revisions: &[SchemaRevision]) -> Result<u32> {
    check_additive(revisions)?;
    let current = current_version(pool).await?;

    if let Some(latest) = revisions.last() {
        if current > latest.version {
            return Err(Error::Store(format!(
                "store is at schema revision {} but only {} is known",
                current, latest.version
            )));
        }
    }

    let mut applied = current;
    for revision in revisions.iter().filter(|r| r.version > current) {
        let mut tx = pool.begin().await?;
        for collection in revision.collections {
            for statement in collection.statements() {
                sqlx::query(&statement).execute(&mut *tx).await?;
            }
        }
        sqlx::query(&format!("PRAGMA user_version = {}", revision.version))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(version = revision.version, "Applied store schema revision");
        applied = revision.version;
    }

    Ok(applied)
}
