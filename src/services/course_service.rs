use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::course::SKILL_LEVELS;
use crate::database::models::Course;
use crate::error::ApiError;
use crate::services::validation::Violations;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<i32>,
    pub minimum_skill: Option<String>,
    pub scholarship_available: Option<bool>,
}

impl CourseInput {
    pub fn validate_new(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.require(self.title.as_deref(), "Please add a course title");
        v.require(self.description.as_deref(), "Please add a description");
        v.require(self.weeks.as_deref(), "Please add number of weeks");
        v.check(self.tuition.is_some(), "Please add tuition cost");
        v.require(self.minimum_skill.as_deref(), "Please add a minimum skill");
        self.check_formats(&mut v);
        v.into_result()
    }

    pub fn validate_update(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        if self.title.is_some() {
            v.require(self.title.as_deref(), "Please add a course title");
        }
        if self.description.is_some() {
            v.require(self.description.as_deref(), "Please add a description");
        }
        if self.weeks.is_some() {
            v.require(self.weeks.as_deref(), "Please add number of weeks");
        }
        self.check_formats(&mut v);
        v.into_result()
    }

    fn check_formats(&self, v: &mut Violations) {
        if let Some(tuition) = self.tuition {
            v.check(tuition >= 0, "Tuition cannot be negative");
        }
        if let Some(skill) = self.minimum_skill.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            v.check(
                SKILL_LEVELS.contains(&skill),
                "Minimum skill must be beginner, intermediate or advanced",
            );
        }
    }
}

pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: &CourseInput,
        listing_id: Uuid,
        account_id: Uuid,
    ) -> Result<Course, DatabaseError> {
        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses (
                title, description, weeks, tuition, minimum_skill, scholarship_available,
                listing_id, account_id
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(input.title.as_deref().map(str::trim))
        .bind(input.description.as_deref().map(str::trim))
        .bind(input.weeks.as_deref().map(str::trim))
        .bind(input.tuition)
        .bind(input.minimum_skill.as_deref().map(str::trim))
        .bind(input.scholarship_available.unwrap_or(false))
        .bind(listing_id)
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(course_id = %course.id, %listing_id, "course created");
        Ok(course)
    }

    pub async fn update(&self, id: Uuid, input: &CourseInput) -> Result<Course, DatabaseError> {
        let course = sqlx::query_as::<_, Course>(
            "UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                weeks = COALESCE($4, weeks),
                tuition = COALESCE($5, tuition),
                minimum_skill = COALESCE($6, minimum_skill),
                scholarship_available = COALESCE($7, scholarship_available)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(input.title.as_deref().map(str::trim))
        .bind(input.description.as_deref().map(str::trim))
        .bind(input.weeks.as_deref().map(str::trim))
        .bind(input.tuition)
        .bind(input.minimum_skill.as_deref().map(str::trim))
        .bind(input.scholarship_available)
        .fetch_optional(&self.pool)
        .await?;

        course.ok_or_else(|| DatabaseError::NotFound(format!("No course with the id of {}", id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let removed = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if removed == 0 {
            return Err(DatabaseError::NotFound(format!("No course with the id of {}", id)));
        }
        tracing::info!(course_id = %id, "course deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_course_requires_fields() {
        let err = CourseInput::default().validate_new().unwrap_err();
        assert_eq!(
            err.message(),
            "Please add a course title, Please add a description, Please add number of weeks, \
Please add tuition cost, Please add a minimum skill"
        );
    }

    #[test]
    fn skill_and_tuition_are_checked() {
        let input = CourseInput {
            title: Some("Front End Web Development".to_string()),
            description: Some("HTML, CSS and JavaScript".to_string()),
            weeks: Some("8".to_string()),
            tuition: Some(-1),
            minimum_skill: Some("expert".to_string()),
            scholarship_available: None,
        };
        let err = input.validate_new().unwrap_err();
        assert_eq!(
            err.message(),
            "Tuition cannot be negative, Minimum skill must be beginner, intermediate or advanced"
        );

        let fixed = CourseInput { tuition: Some(8000), minimum_skill: Some("beginner".to_string()), ..input };
        assert!(fixed.validate_new().is_ok());
    }
}
