use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const SKILL_LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: i32,
    pub minimum_skill: String,
    pub scholarship_available: bool,
    pub listing_id: Uuid,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}
