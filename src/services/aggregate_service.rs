use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Recompute requests issued by the course and review write paths after the
/// child row has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateCommand {
    RecomputeAverageCost(Uuid),
    RecomputeAverageRating(Uuid),
}

impl AggregateCommand {
    pub fn listing_id(&self) -> Uuid {
        match self {
            AggregateCommand::RecomputeAverageCost(id) | AggregateCommand::RecomputeAverageRating(id) => *id,
        }
    }
}

/// Round a mean tuition up to the next multiple of ten. Tuition is an `i32`,
/// so the rounded mean always fits an `i64`.
pub fn round_up_to_ten(mean: f64) -> i64 {
    ((mean / 10.0).ceil() * 10.0) as i64
}

pub struct AggregateService {
    pool: PgPool,
}

impl AggregateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply a command, logging failures. The triggering write has already
    /// succeeded, so errors never reach the client.
    pub async fn dispatch(&self, command: AggregateCommand) {
        if let Err(e) = self.apply(command).await {
            tracing::error!(
                listing_id = %command.listing_id(),
                "Aggregate recompute {:?} failed: {}",
                command,
                e
            );
        }
    }

    /// An empty child set resets the aggregate to NULL
    pub async fn apply(&self, command: AggregateCommand) -> Result<(), DatabaseError> {
        match command {
            AggregateCommand::RecomputeAverageCost(listing_id) => {
                let mean: Option<f64> =
                    sqlx::query_scalar("SELECT AVG(tuition)::float8 FROM courses WHERE listing_id = $1")
                        .bind(listing_id)
                        .fetch_one(&self.pool)
                        .await?;
                let average_cost = mean.map(round_up_to_ten);

                sqlx::query("UPDATE listings SET average_cost = $2 WHERE id = $1")
                    .bind(listing_id)
                    .bind(average_cost)
                    .execute(&self.pool)
                    .await?;
                tracing::debug!(%listing_id, ?average_cost, "average cost recomputed");
            }
            AggregateCommand::RecomputeAverageRating(listing_id) => {
                let mean: Option<f64> =
                    sqlx::query_scalar("SELECT AVG(rating)::float8 FROM reviews WHERE listing_id = $1")
                        .bind(listing_id)
                        .fetch_one(&self.pool)
                        .await?;

                sqlx::query("UPDATE listings SET average_rating = $2 WHERE id = $1")
                    .bind(listing_id)
                    .bind(mean)
                    .execute(&self.pool)
                    .await?;
                tracing::debug!(%listing_id, average_rating = ?mean, "average rating recomputed");
            }
        }
        Ok(())
    }
}
