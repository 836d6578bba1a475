//! SQLite storage layer for ride records.
//!
//! The store is an explicitly constructed, `Clone`able pool wrapper that gets
//! injected into handlers through application state. There is no ambient
//! global connection; setup failure is a typed error surfaced at startup.
//!
//! Ride dates are persisted as Unix seconds. Records are immutable once
//! written; the only operations are a single-row insert and a range-filtered,
//! date-descending listing.

use chrono::{TimeZone, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};

use crate::model::{DateRange, NewRide, RideRecord};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct RideStore {
    pool: SqlitePool,
}

impl RideStore {
    /// Connect to the database and initialize the schema.
    ///
    /// # Arguments
    ///
    /// * `database_url` - SQLite connection string (e.g., "sqlite:fuelradar.db?mode=rwc"
    ///   or "sqlite::memory:")
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.initialize_schema().await?;

        Ok(store)
    }

    /// Close the underlying pool. Idempotent.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Create the rides table if it doesn't exist.
    async fn initialize_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS rides (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date_ts INTEGER NOT NULL,
                distance_km REAL NOT NULL,
                fuel_used_litres REAL NOT NULL,
                mileage_km_per_litre REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Index for date-range listings
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_rides_date_ts
            ON rides(date_ts)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist one ride and return it with its assigned identifier.
    ///
    /// Sub-second precision is truncated on write; the returned record
    /// carries the timestamp exactly as stored.
    pub async fn insert_ride(&self, ride: &NewRide) -> Result<RideRecord, sqlx::Error> {
        let ts = ride.date.timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO rides (date_ts, distance_km, fuel_used_litres, mileage_km_per_litre)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(ts)
        .bind(ride.distance_km)
        .bind(ride.fuel_used_litres)
        .bind(ride.mileage_km_per_litre)
        .execute(&self.pool)
        .await?;

        Ok(RideRecord {
            id: result.last_insert_rowid(),
            date: Utc.timestamp_opt(ts, 0).unwrap(),
            distance_km: ride.distance_km,
            fuel_used_litres: ride.fuel_used_litres,
            mileage_km_per_litre: ride.mileage_km_per_litre,
        })
    }

    /// List rides, newest first.
    ///
    /// With a range, returns records whose date lies within `[from, to]`
    /// inclusive; without, returns everything. Ties on the same second keep
    /// the later insert first. No pagination limit.
    pub async fn list_rides(&self, range: Option<DateRange>) -> Result<Vec<RideRecord>, sqlx::Error> {
        let rows = match range {
            Some(range) => {
                sqlx::query(
                    r#"
                    SELECT id, date_ts, distance_km, fuel_used_litres, mileage_km_per_litre
                    FROM rides
                    WHERE date_ts >= ? AND date_ts <= ?
                    ORDER BY date_ts DESC, id DESC
                    "#,
                )
                .bind(range.from.timestamp())
                .bind(range.to.timestamp())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, date_ts, distance_km, fuel_used_litres, mileage_km_per_litre
                    FROM rides
                    ORDER BY date_ts DESC, id DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(ride_from_row).collect())
    }
}

fn ride_from_row(row: &SqliteRow) -> RideRecord {
    let ts: i64 = row.get("date_ts");

    RideRecord {
        id: row.get("id"),
        date: Utc.timestamp_opt(ts, 0).unwrap(),
        distance_km: row.get("distance_km"),
        fuel_used_litres: row.get("fuel_used_litres"),
        mileage_km_per_litre: row.get("mileage_km_per_litre"),
    }
}
