//! Route handlers.
//!
//! GET    /health        liveness and version
//! POST   /bags          create bag
//! GET    /bags/:id      bag with cuboids and derived volumes
//! GET    /cuboids       cuboids by `ids`, each with its bag
//! GET    /cuboids/:id   one cuboid
//! POST   /cuboids       create cuboid (capacity checked)
//! PUT    /cuboids/:id   replace cuboid (capacity checked, self excluded)
//! DELETE /cuboids/:id   delete cuboid

use crate::error::ApiError;
use cuboid_core::{BagService, CuboidService, SqliteBagRepository, SqliteCuboidRepository};
use rusqlite::Connection;

pub mod bags;
pub mod cuboids;
pub mod health;

type SqliteCuboidService<'conn> =
    CuboidService<SqliteCuboidRepository<'conn>, SqliteBagRepository<'conn>>;

fn cuboid_service(conn: &Connection) -> Result<SqliteCuboidService<'_>, ApiError> {
    Ok(CuboidService::new(
        SqliteCuboidRepository::try_new(conn)?,
        SqliteBagRepository::try_new(conn)?,
    ))
}

fn bag_service(conn: &Connection) -> Result<BagService<SqliteBagRepository<'_>>, ApiError> {
    Ok(BagService::new(SqliteBagRepository::try_new(conn)?))
}
