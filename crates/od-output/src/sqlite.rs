//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory.
//! Wide tables are stored long: one row per (record, scenario column).

use std::path::Path;

use rusqlite::Connection;

use crate::row::{DestinationRow, EdgeLoadRow, OriginRow, RouteRow, ScenarioSummaryRow};
use crate::writer::{check_shape, OutputWriter};
use crate::OutputResult;

/// Writes analysis output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS routes (
                 hazard      TEXT    NOT NULL,
                 category    TEXT    NOT NULL,
                 o_node      INTEGER NOT NULL,
                 d_node      INTEGER NOT NULL,
                 origin      TEXT    NOT NULL,
                 destination TEXT    NOT NULL,
                 weighing    REAL    NOT NULL,
                 length_m    REAL    NOT NULL,
                 load        REAL    NOT NULL,
                 geometry    TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS scenario_summaries (
                 hazard                        TEXT    NOT NULL,
                 category                      TEXT    NOT NULL,
                 origins_total                 INTEGER NOT NULL,
                 origins_reached               INTEGER NOT NULL,
                 origins_routed                INTEGER NOT NULL,
                 origins_no_access             INTEGER NOT NULL,
                 origins_disrupted_destination INTEGER NOT NULL,
                 origins_skipped               INTEGER NOT NULL,
                 people_no_access              INTEGER NOT NULL,
                 people_no_delay               INTEGER NOT NULL,
                 people_delayed                INTEGER NOT NULL,
                 routes_delayed                INTEGER NOT NULL,
                 extra_weighing                REAL    NOT NULL,
                 extra_distance_km             REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS origins (
                 id         INTEGER PRIMARY KEY,
                 o_id       TEXT    NOT NULL,
                 node       INTEGER NOT NULL,
                 population REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS origin_access (
                 id              INTEGER NOT NULL,
                 scenario_column TEXT    NOT NULL,
                 access          TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS destinations (
                 id         INTEGER PRIMARY KEY,
                 d_id       TEXT    NOT NULL,
                 node       INTEGER NOT NULL,
                 category   TEXT    NOT NULL,
                 origin_cnt REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS destination_loads (
                 id              INTEGER NOT NULL,
                 scenario_column TEXT    NOT NULL,
                 load            REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS edge_loads (
                 road            INTEGER NOT NULL,
                 from_node       INTEGER NOT NULL,
                 to_node         INTEGER NOT NULL,
                 scenario_column TEXT    NOT NULL,
                 load            REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_routes(&mut self, rows: &[RouteRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO routes \
                 (hazard, category, o_node, d_node, origin, destination, weighing, length_m, load, geometry) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.hazard,
                    row.category,
                    row.origin_node,
                    row.destination_node,
                    row.origin_label,
                    row.destination_label,
                    row.weighing,
                    row.length_m,
                    row.load,
                    row.geometry,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summaries(&mut self, rows: &[ScenarioSummaryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO scenario_summaries VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.hazard,
                    row.category,
                    row.origins_total,
                    row.origins_reached,
                    row.origins_routed,
                    row.origins_no_access,
                    row.origins_disrupted_destination,
                    row.origins_skipped,
                    row.people_no_access,
                    row.people_no_delay,
                    row.people_delayed,
                    row.routes_delayed,
                    row.extra_weighing,
                    row.extra_distance_km,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_origins(&mut self, columns: &[String], rows: &[OriginRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut origin = tx.prepare_cached(
                "INSERT INTO origins (id, o_id, node, population) VALUES (?1, ?2, ?3, ?4)",
            )?;
            let mut access =
                tx.prepare_cached("INSERT INTO origin_access (id, scenario_column, access) VALUES (?1, ?2, ?3)")?;
            for row in rows {
                check_shape("origins", columns.len(), row.access.len())?;
                origin.execute(rusqlite::params![row.id, row.label, row.node, row.population])?;
                for (column, flag) in columns.iter().zip(&row.access) {
                    access.execute(rusqlite::params![row.id, column, flag.as_str()])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_destinations(&mut self, columns: &[String], rows: &[DestinationRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut destination = tx.prepare_cached(
                "INSERT INTO destinations (id, d_id, node, category, origin_cnt) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut load =
                tx.prepare_cached("INSERT INTO destination_loads (id, scenario_column, load) VALUES (?1, ?2, ?3)")?;
            for row in rows {
                check_shape("destinations", columns.len(), row.loads.len())?;
                destination.execute(rusqlite::params![
                    row.id,
                    row.label,
                    row.node,
                    row.category,
                    row.origin_cnt
                ])?;
                for (column, value) in columns.iter().zip(&row.loads) {
                    load.execute(rusqlite::params![row.id, column, value])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_edge_loads(&mut self, columns: &[String], rows: &[EdgeLoadRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO edge_loads (road, from_node, to_node, scenario_column, load) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                check_shape("edge_loads", columns.len(), row.loads.len())?;
                for (column, value) in columns.iter().zip(&row.loads) {
                    stmt.execute(rusqlite::params![row.road, row.from, row.to, column, value])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
