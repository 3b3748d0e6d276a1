//! Prediction log and user feedback.
//!
//! Every answered prediction is written to `model_monitoring`, keyed by the
//! UTC time it was recorded. A later feedback call fills in the `feedback`
//! column of that row, once.
//!
//! ```sql
//! CREATE TABLE model_monitoring (
//!     input_text         TEXT        NOT NULL,
//!     output             TEXT        NOT NULL,
//!     execution_datetime TIMESTAMPTZ NOT NULL,
//!     feedback           TEXT
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use hatescan_types::{Feedback, Label};
use serde::Serialize;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{mask_database_url, DatabaseConfig};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("no prediction recorded at {0}")]
    NotFound(DateTime<Utc>),
    #[error("feedback already recorded for the prediction at {0}")]
    FeedbackAlreadyRecorded(DateTime<Utc>),
}

/// One logged prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub input_text: String,
    pub output: Label,
    pub execution_datetime: DateTime<Utc>,
    pub feedback: Option<Feedback>,
}

impl PredictionRecord {
    /// New record stamped with the current time.
    ///
    /// Postgres keeps microseconds, so the timestamp is truncated to that
    /// precision to stay usable as a lookup key.
    pub fn now(input_text: &str, output: Label) -> Self {
        Self {
            input_text: input_text.to_owned(),
            output,
            execution_datetime: Utc::now().trunc_subsecs(6),
            feedback: None,
        }
    }
}

#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Logs a prediction and returns the stored record.
    async fn record(&self, input_text: &str, output: Label) -> Result<PredictionRecord, StoreError>;

    /// Sets the feedback of the prediction recorded at `execution_datetime`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no prediction has that timestamp,
    /// [`StoreError::FeedbackAlreadyRecorded`] when it already has feedback.
    async fn add_feedback(
        &self,
        execution_datetime: DateTime<Utc>,
        feedback: Feedback,
    ) -> Result<(), StoreError>;
}

/// [`PredictionStore`] backed by a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgPredictionStore {
    pool: PgPool,
}

impl PgPredictionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!(
            "Connecting to database: {}",
            mask_database_url(&config.database_url)
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connection_timeout)
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                e
            })?;

        info!("Database connection pool created successfully");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PredictionStore for PgPredictionStore {
    async fn record(&self, input_text: &str, output: Label) -> Result<PredictionRecord, StoreError> {
        let record = PredictionRecord::now(input_text, output);

        sqlx::query(
            r#"
            INSERT INTO model_monitoring (input_text, output, execution_datetime)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&record.input_text)
        .bind(record.output.as_str())
        .bind(record.execution_datetime)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn add_feedback(
        &self,
        execution_datetime: DateTime<Utc>,
        feedback: Feedback,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE model_monitoring
            SET feedback = $1
            WHERE execution_datetime = $2 AND feedback IS NULL
            "#,
        )
        .bind(feedback.as_str())
        .bind(execution_datetime)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let exists: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT 1 FROM model_monitoring
            WHERE execution_datetime = $1
            LIMIT 1
            "#,
        )
        .bind(execution_datetime)
        .fetch_optional(&self.pool)
        .await?;

        match exists {
            Some(_) => Err(StoreError::FeedbackAlreadyRecorded(execution_datetime)),
            None => Err(StoreError::NotFound(execution_datetime)),
        }
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::sync::Mutex;

    use super::*;

    /// In-process store with the same feedback rules as the Postgres one.
    #[derive(Default)]
    pub struct MemoryPredictionStore {
        records: Mutex<Vec<PredictionRecord>>,
        fail_writes: bool,
    }

    impl MemoryPredictionStore {
        /// Store whose every write fails with a database error.
        pub fn failing() -> Self {
            Self {
                records: Mutex::default(),
                fail_writes: true,
            }
        }

        pub fn records(&self) -> Vec<PredictionRecord> {
            self.records.lock().expect("store lock").clone()
        }
    }

    #[async_trait]
    impl PredictionStore for MemoryPredictionStore {
        async fn record(&self, input_text: &str, output: Label) -> Result<PredictionRecord, StoreError> {
            if self.fail_writes {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }

            let record = PredictionRecord::now(input_text, output);
            self.records.lock().expect("store lock").push(record.clone());
            Ok(record)
        }

        async fn add_feedback(
            &self,
            execution_datetime: DateTime<Utc>,
            feedback: Feedback,
        ) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }

            let mut records = self.records.lock().expect("store lock");
            let record = records
                .iter_mut()
                .find(|r| r.execution_datetime == execution_datetime)
                .ok_or(StoreError::NotFound(execution_datetime))?;

            if record.feedback.is_some() {
                return Err(StoreError::FeedbackAlreadyRecorded(execution_datetime));
            }
            record.feedback = Some(feedback);
            Ok(())
        }
    }
}
