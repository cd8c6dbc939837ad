//! Cuboid repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/update/delete/find APIs over `cuboids` storage.
//! - Provide the write-transaction scope that makes capacity check and
//!   mutation atomic.
//!
//! # Invariants
//! - Write paths call `Dimensions::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `in_write_transaction` holds the database write lock for the whole
//!   closure; any `Err` rolls back.

use super::bag_repo::parse_bag_row_prefixed;
use super::schema::ensure_table_ready;
use super::{RepoError, RepoResult};
use crate::model::bag::CuboidWithBag;
use crate::model::cuboid::{Cuboid, CuboidId, Dimensions};
use log::debug;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use uuid::Uuid;

const CUBOID_SELECT_SQL: &str = "SELECT uuid, width, height, depth, bag_uuid FROM cuboids";

/// Repository interface for cuboid persistence.
pub trait CuboidRepository {
    /// Inserts one cuboid and returns its id.
    fn create_cuboid(&self, cuboid: &Cuboid) -> RepoResult<CuboidId>;
    /// Replaces dimensions and bag of an existing cuboid.
    fn update_cuboid(&self, cuboid: &Cuboid) -> RepoResult<()>;
    fn get_cuboid(&self, id: CuboidId) -> RepoResult<Option<Cuboid>>;
    /// Loads the requested cuboids with their bags; unknown ids are skipped.
    fn list_cuboids_with_bag(&self, ids: &[CuboidId]) -> RepoResult<Vec<CuboidWithBag>>;
    fn delete_cuboid(&self, id: CuboidId) -> RepoResult<()>;
    /// Runs `work` while holding the storage write lock.
    ///
    /// Commits when `work` returns `Ok`, rolls back otherwise.
    fn in_write_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed cuboid repository.
pub struct SqliteCuboidRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCuboidRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "cuboids",
            &["uuid", "width", "height", "depth", "bag_uuid"],
        )?;
        Ok(Self { conn })
    }
}

impl CuboidRepository for SqliteCuboidRepository<'_> {
    fn create_cuboid(&self, cuboid: &Cuboid) -> RepoResult<CuboidId> {
        cuboid.dimensions.validate()?;

        self.conn.execute(
            "INSERT INTO cuboids (uuid, width, height, depth, bag_uuid)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                cuboid.id.to_string(),
                i64::from(cuboid.dimensions.width),
                i64::from(cuboid.dimensions.height),
                i64::from(cuboid.dimensions.depth),
                cuboid.bag_id.to_string(),
            ],
        )?;

        Ok(cuboid.id)
    }

    fn update_cuboid(&self, cuboid: &Cuboid) -> RepoResult<()> {
        cuboid.dimensions.validate()?;

        let changed = self.conn.execute(
            "UPDATE cuboids
             SET
                width = ?1,
                height = ?2,
                depth = ?3,
                bag_uuid = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                i64::from(cuboid.dimensions.width),
                i64::from(cuboid.dimensions.height),
                i64::from(cuboid.dimensions.depth),
                cuboid.bag_id.to_string(),
                cuboid.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::CuboidNotFound(cuboid.id));
        }

        Ok(())
    }

    fn get_cuboid(&self, id: CuboidId) -> RepoResult<Option<Cuboid>> {
        let cuboid = self
            .conn
            .query_row(
                &format!("{CUBOID_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_cuboid_row(row, "")),
            )
            .optional()?;
        cuboid.transpose()
    }

    fn list_cuboids_with_bag(&self, ids: &[CuboidId]) -> RepoResult<Vec<CuboidWithBag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT
                c.uuid AS uuid,
                c.width AS width,
                c.height AS height,
                c.depth AS depth,
                c.bag_uuid AS bag_uuid,
                b.uuid AS bag_row_uuid,
                b.title AS bag_row_title,
                b.volume AS bag_row_volume
             FROM cuboids c
             INNER JOIN bags b ON b.uuid = c.bag_uuid
             WHERE c.uuid IN ({placeholders})
             ORDER BY c.rowid ASC;"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(ids.iter().map(Uuid::to_string)))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(CuboidWithBag {
                cuboid: parse_cuboid_row(row, "")?,
                bag: parse_bag_row_prefixed(row, "bag_row_")?,
            });
        }

        Ok(items)
    }

    fn delete_cuboid(&self, id: CuboidId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM cuboids WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::CuboidNotFound(id));
        }

        Ok(())
    }

    fn in_write_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>,
    {
        // Immediate: take the write lock before the capacity snapshot is read.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        match work() {
            Ok(value) => {
                tx.commit().map_err(RepoError::from)?;
                Ok(value)
            }
            Err(err) => {
                debug!("event=write_tx module=repo status=rollback");
                drop(tx);
                Err(err)
            }
        }
    }
}

/// Parses a cuboid from columns named `{prefix}uuid`, `{prefix}width`, ...
pub(crate) fn parse_cuboid_row(row: &Row<'_>, prefix: &str) -> RepoResult<Cuboid> {
    let id = parse_uuid_column(row, &format!("{prefix}uuid"), "cuboids.uuid")?;
    let bag_id = parse_uuid_column(row, &format!("{prefix}bag_uuid"), "cuboids.bag_uuid")?;

    Ok(Cuboid {
        id,
        dimensions: Dimensions {
            width: parse_dimension(row, prefix, "width")?,
            height: parse_dimension(row, prefix, "height")?,
            depth: parse_dimension(row, prefix, "depth")?,
        },
        bag_id,
    })
}

fn parse_uuid_column(row: &Row<'_>, column: &str, label: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {label}")))
}

fn parse_dimension(row: &Row<'_>, prefix: &str, field: &'static str) -> RepoResult<u32> {
    let raw: i64 = row.get(format!("{prefix}{field}").as_str())?;
    u32::try_from(raw)
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| {
            RepoError::InvalidData(format!("invalid {field} `{raw}` in cuboids.{field}"))
        })
}
