//! Bag repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist bags and load them together with their cuboids.
//! - Provide the single eager fetch the capacity validator relies on.
//!
//! # Invariants
//! - `get_bag_with_cuboids` reads the bag row and its cuboids from one
//!   connection, so inside a write transaction it is a consistent snapshot.
//! - Cuboids are returned in insertion order.

use super::cuboid_repo::parse_cuboid_row;
use super::schema::ensure_table_ready;
use super::{RepoError, RepoResult};
use crate::model::bag::{Bag, BagId, BagWithCuboids};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const BAG_SELECT_SQL: &str = "SELECT uuid, title, volume FROM bags";

/// Repository interface for bag persistence.
pub trait BagRepository {
    /// Inserts one validated bag and returns its id.
    fn create_bag(&self, bag: &Bag) -> RepoResult<BagId>;
    /// Loads one bag without its cuboids.
    fn get_bag(&self, id: BagId) -> RepoResult<Option<Bag>>;
    /// Loads one bag with every cuboid currently referencing it.
    fn get_bag_with_cuboids(&self, id: BagId) -> RepoResult<Option<BagWithCuboids>>;
}

/// SQLite-backed bag repository.
pub struct SqliteBagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBagRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "bags", &["uuid", "title", "volume"])?;
        Ok(Self { conn })
    }
}

impl BagRepository for SqliteBagRepository<'_> {
    fn create_bag(&self, bag: &Bag) -> RepoResult<BagId> {
        bag.validate()?;
        let volume = i64::try_from(bag.volume)
            .map_err(|_| RepoError::InvalidData(format!("bag volume {} overflows", bag.volume)))?;

        self.conn.execute(
            "INSERT INTO bags (uuid, title, volume) VALUES (?1, ?2, ?3);",
            params![bag.id.to_string(), bag.title.as_deref(), volume],
        )?;

        Ok(bag.id)
    }

    fn get_bag(&self, id: BagId) -> RepoResult<Option<Bag>> {
        let bag = self
            .conn
            .query_row(
                &format!("{BAG_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_bag_row(row)),
            )
            .optional()?;
        bag.transpose()
    }

    fn get_bag_with_cuboids(&self, id: BagId) -> RepoResult<Option<BagWithCuboids>> {
        let Some(bag) = self.get_bag(id)? else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT uuid, width, height, depth, bag_uuid
             FROM cuboids
             WHERE bag_uuid = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut cuboids = Vec::new();
        while let Some(row) = rows.next()? {
            cuboids.push(parse_cuboid_row(row, "")?);
        }

        Ok(Some(BagWithCuboids { bag, cuboids }))
    }
}

/// Parses a bag from columns named `{prefix}uuid`, `{prefix}title`, `{prefix}volume`.
pub(crate) fn parse_bag_row_prefixed(row: &Row<'_>, prefix: &str) -> RepoResult<Bag> {
    let uuid_text: String = row.get(format!("{prefix}uuid").as_str())?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in bags.uuid"))
    })?;

    let raw_volume: i64 = row.get(format!("{prefix}volume").as_str())?;
    let volume = u64::try_from(raw_volume)
        .ok()
        .filter(|volume| *volume > 0)
        .ok_or_else(|| {
            RepoError::InvalidData(format!("invalid volume `{raw_volume}` in bags.volume"))
        })?;

    Ok(Bag {
        id,
        title: row.get(format!("{prefix}title").as_str())?,
        volume,
    })
}

fn parse_bag_row(row: &Row<'_>) -> RepoResult<Bag> {
    parse_bag_row_prefixed(row, "")
}
