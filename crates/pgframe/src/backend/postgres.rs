//! Blocking PostgreSQL session.

use postgres::types::Type;
use postgres::{Client, NoTls};
use tracing::{debug, info};

use crate::backend::{Backend, Row};
use crate::config::ConnectConfig;
use crate::error::{FrameError, Result};
use crate::value::SqlValue;

/// A live PostgreSQL connection implementing [`Backend`].
///
/// The session is opened at construction and released only by
/// [`close`](Backend::close); it is never reconnected or retried.
pub struct PgBackend {
    client: Option<Client>,
}

impl PgBackend {
    /// Connect to PostgreSQL with the given parameters.
    pub fn connect(config: &ConnectConfig) -> Result<Self> {
        config.validate()?;

        let mut pg_config = postgres::Config::new();
        pg_config.host(&config.host);
        pg_config.port(config.port);
        pg_config.dbname(&config.database);
        pg_config.user(&config.user);
        pg_config.password(&config.password);

        let client = pg_config.connect(NoTls)?;

        info!(
            "Connected to PostgreSQL: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(Self {
            client: Some(client),
        })
    }

    fn client_mut(&mut self) -> Result<&mut Client> {
        self.client.as_mut().ok_or(FrameError::Closed)
    }
}

impl Backend for PgBackend {
    fn execute(&mut self, sql: &str, expect_rows: bool) -> Result<Option<Vec<Row>>> {
        let client = self.client_mut()?;
        let mut tx = client.transaction()?;

        if expect_rows {
            match tx.query(sql, &[]) {
                Ok(rows) => {
                    tx.commit()?;
                    let converted = rows
                        .iter()
                        .map(convert_row)
                        .collect::<Result<Vec<Row>>>()?;
                    Ok(Some(converted))
                }
                Err(e) => {
                    // Roll back, then re-signal the original failure.
                    let _ = tx.rollback();
                    Err(e.into())
                }
            }
        } else {
            match tx.batch_execute(sql) {
                Ok(()) => {
                    tx.commit()?;
                    Ok(None)
                }
                Err(e) => {
                    let _ = tx.rollback();
                    Err(e.into())
                }
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.client.take().is_some() {
            debug!("Closed PostgreSQL connection");
        }
        Ok(())
    }
}

fn convert_row(row: &postgres::Row) -> Result<Row> {
    let mut cells = Vec::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        cells.push(convert_cell(row, idx, column.type_())?);
    }
    Ok(cells)
}

/// Convert one result cell to a [`SqlValue`] based on its column type.
fn convert_cell(row: &postgres::Row, idx: usize, ty: &Type) -> Result<SqlValue> {
    let value = match ty.name() {
        "bool" => row.try_get::<_, Option<bool>>(idx)?.map(SqlValue::Bool),
        "int2" => row
            .try_get::<_, Option<i16>>(idx)?
            .map(|v| SqlValue::I32(i32::from(v))),
        "int4" => row.try_get::<_, Option<i32>>(idx)?.map(SqlValue::I32),
        "int8" => row.try_get::<_, Option<i64>>(idx)?.map(SqlValue::I64),
        "float4" => row.try_get::<_, Option<f32>>(idx)?.map(SqlValue::F32),
        "float8" => row.try_get::<_, Option<f64>>(idx)?.map(SqlValue::F64),
        "text" | "varchar" | "bpchar" | "name" => {
            row.try_get::<_, Option<String>>(idx)?.map(SqlValue::Text)
        }
        "bytea" => row.try_get::<_, Option<Vec<u8>>>(idx)?.map(SqlValue::Bytes),
        "uuid" => row
            .try_get::<_, Option<uuid::Uuid>>(idx)?
            .map(SqlValue::Uuid),
        "numeric" => row
            .try_get::<_, Option<rust_decimal::Decimal>>(idx)?
            .map(SqlValue::Decimal),
        "timestamp" => row
            .try_get::<_, Option<chrono::NaiveDateTime>>(idx)?
            .map(SqlValue::Timestamp),
        "date" => row
            .try_get::<_, Option<chrono::NaiveDate>>(idx)?
            .map(SqlValue::Date),
        "time" => row
            .try_get::<_, Option<chrono::NaiveTime>>(idx)?
            .map(SqlValue::Time),
        "json" | "jsonb" => row
            .try_get::<_, Option<serde_json::Value>>(idx)?
            .map(|v| SqlValue::Text(v.to_string())),
        // Types with no frame representation read as their SQL text form
        // when the driver permits it.
        _ => row
            .try_get::<_, Option<String>>(idx)
            .ok()
            .flatten()
            .map(SqlValue::Text),
    };

    Ok(value.unwrap_or(SqlValue::Null))
}
