use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Review;
use crate::error::ApiError;
use crate::services::validation::Violations;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 10;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReviewInput {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<i32>,
}

impl ReviewInput {
    pub fn validate_new(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.require(self.title.as_deref(), "Please add a title for the review");
        v.require(self.text.as_deref(), "Please add some text");
        v.check(self.rating.is_some(), "Please add a rating between 1 and 10");
        self.check_formats(&mut v);
        v.into_result()
    }

    pub fn validate_update(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        if self.title.is_some() {
            v.require(self.title.as_deref(), "Please add a title for the review");
        }
        if self.text.is_some() {
            v.require(self.text.as_deref(), "Please add some text");
        }
        self.check_formats(&mut v);
        v.into_result()
    }

    fn check_formats(&self, v: &mut Violations) {
        v.max_len(self.title.as_deref(), 100, "Title cannot be more than 100 characters");
        if let Some(rating) = self.rating {
            v.check(
                (MIN_RATING..=MAX_RATING).contains(&rating),
                "Please add a rating between 1 and 10",
            );
        }
    }
}

pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A second review of the same listing by the same account violates the
    /// `(listing_id, account_id)` unique index.
    pub async fn create(
        &self,
        input: &ReviewInput,
        listing_id: Uuid,
        account_id: Uuid,
    ) -> Result<Review, DatabaseError> {
        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (title, text, rating, listing_id, account_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(input.title.as_deref().map(str::trim))
        .bind(input.text.as_deref().map(str::trim))
        .bind(input.rating)
        .bind(listing_id)
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(review_id = %review.id, %listing_id, "review created");
        Ok(review)
    }

    pub async fn update(&self, id: Uuid, input: &ReviewInput) -> Result<Review, DatabaseError> {
        let review = sqlx::query_as::<_, Review>(
            "UPDATE reviews SET
                title = COALESCE($2, title),
                text = COALESCE($3, text),
                rating = COALESCE($4, rating)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(input.title.as_deref().map(str::trim))
        .bind(input.text.as_deref().map(str::trim))
        .bind(input.rating)
        .fetch_optional(&self.pool)
        .await?;

        review.ok_or_else(|| DatabaseError::NotFound(format!("No review found with the id of {}", id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let removed = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if removed == 0 {
            return Err(DatabaseError::NotFound(format!("No review found with the id of {}", id)));
        }
        tracing::info!(review_id = %id, "review deleted");
        Ok(())
    }
}
