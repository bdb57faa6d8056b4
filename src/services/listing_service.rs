use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::listing::{slugify, CAREERS};
use crate::database::models::{GeoColumns, Listing, Location};
use crate::error::ApiError;
use crate::services::validation::{is_valid_email, is_valid_website, Violations};

/// Client-settable listing fields. `address` is write-only: it is geocoded into
/// the stored location and then discarded. Aggregates, photo and owner are
/// never read from the body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListingInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl ListingInput {
    pub fn validate_new(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.require(self.name.as_deref(), "Please add a name");
        v.require(self.description.as_deref(), "Please add a description");
        v.require(self.address.as_deref(), "Please add an address");
        if self.careers.as_ref().map_or(true, Vec::is_empty) {
            v.add("Please add at least one career");
        }
        self.check_formats(&mut v);
        v.into_result()
    }

    pub fn validate_update(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        if self.name.is_some() {
            v.require(self.name.as_deref(), "Please add a name");
        }
        if self.description.is_some() {
            v.require(self.description.as_deref(), "Please add a description");
        }
        if self.address.is_some() {
            v.require(self.address.as_deref(), "Please add an address");
        }
        if self.careers.as_ref().is_some_and(Vec::is_empty) {
            v.add("Please add at least one career");
        }
        self.check_formats(&mut v);
        v.into_result()
    }

    fn check_formats(&self, v: &mut Violations) {
        v.max_len(self.name.as_deref(), 50, "Name cannot be more than 50 characters");
        v.max_len(self.description.as_deref(), 500, "Description cannot be more than 500 characters");
        v.max_len(self.phone.as_deref(), 20, "Phone number can not be longer than 20 characters");
        if let Some(website) = &self.website {
            v.check(is_valid_website(website), "Please use a valid URL with HTTP or HTTPS");
        }
        if let Some(email) = &self.email {
            v.check(is_valid_email(email), "Please add a valid email");
        }
        for career in self.careers.iter().flatten() {
            if !CAREERS.contains(&career.as_str()) {
                v.add(format!("{} is not a valid career", career));
            }
        }
    }
}

pub struct ListingService {
    pool: PgPool,
}

impl ListingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: &ListingInput,
        account_id: Uuid,
        location: Option<Location>,
    ) -> Result<Listing, DatabaseError> {
        let name = input.name.as_deref().unwrap_or_default().trim();
        let geo = location.map(GeoColumns::from).unwrap_or_default();

        let listing = sqlx::query_as::<_, Listing>(
            "INSERT INTO listings (
                name, slug, description, website, phone, email,
                longitude, latitude, formatted_address, street, city, state, zipcode, country,
                careers, housing, job_assistance, job_guarantee, accept_gi, account_id
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
             RETURNING *",
        )
        .bind(name)
        .bind(slugify(name))
        .bind(input.description.as_deref().map(str::trim))
        .bind(input.website.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.email.as_deref())
        .bind(geo.longitude)
        .bind(geo.latitude)
        .bind(geo.formatted_address)
        .bind(geo.street)
        .bind(geo.city)
        .bind(geo.state)
        .bind(geo.zipcode)
        .bind(geo.country)
        .bind(input.careers.clone().unwrap_or_default())
        .bind(input.housing.unwrap_or(false))
        .bind(input.job_assistance.unwrap_or(false))
        .bind(input.job_guarantee.unwrap_or(false))
        .bind(input.accept_gi.unwrap_or(false))
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(listing_id = %listing.id, %account_id, "listing created");
        Ok(listing)
    }

    /// Partial update. A new name re-derives the slug; a new location replaces
    /// all stored geo columns.
    pub async fn update(
        &self,
        id: Uuid,
        input: &ListingInput,
        location: Option<Location>,
    ) -> Result<Listing, DatabaseError> {
        let name = input.name.as_deref().map(str::trim);
        let relocate = location.is_some();
        let geo = location.map(GeoColumns::from).unwrap_or_default();

        let listing = sqlx::query_as::<_, Listing>(
            "UPDATE listings SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                website = COALESCE($5, website),
                phone = COALESCE($6, phone),
                email = COALESCE($7, email),
                careers = COALESCE($8, careers),
                housing = COALESCE($9, housing),
                job_assistance = COALESCE($10, job_assistance),
                job_guarantee = COALESCE($11, job_guarantee),
                accept_gi = COALESCE($12, accept_gi),
                longitude = CASE WHEN $13 THEN $14 ELSE longitude END,
                latitude = CASE WHEN $13 THEN $15 ELSE latitude END,
                formatted_address = CASE WHEN $13 THEN $16 ELSE formatted_address END,
                street = CASE WHEN $13 THEN $17 ELSE street END,
                city = CASE WHEN $13 THEN $18 ELSE city END,
                state = CASE WHEN $13 THEN $19 ELSE state END,
                zipcode = CASE WHEN $13 THEN $20 ELSE zipcode END,
                country = CASE WHEN $13 THEN $21 ELSE country END
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(name.map(slugify))
        .bind(input.description.as_deref().map(str::trim))
        .bind(input.website.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.email.as_deref())
        .bind(input.careers.clone())
        .bind(input.housing)
        .bind(input.job_assistance)
        .bind(input.job_guarantee)
        .bind(input.accept_gi)
        .bind(relocate)
        .bind(geo.longitude)
        .bind(geo.latitude)
        .bind(geo.formatted_address)
        .bind(geo.street)
        .bind(geo.city)
        .bind(geo.state)
        .bind(geo.zipcode)
        .bind(geo.country)
        .fetch_optional(&self.pool)
        .await?;

        listing.ok_or_else(|| DatabaseError::NotFound(format!("No listing with the id of {}", id)))
    }

    pub async fn set_photo(&self, id: Uuid, photo: &str) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE listings SET photo = $2 WHERE id = $1")
            .bind(id)
            .bind(photo)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove a listing with its courses and reviews in one transaction.
    /// Children go first; any failure rolls the whole removal back.
    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let courses = sqlx::query("DELETE FROM courses WHERE listing_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let reviews = sqlx::query("DELETE FROM reviews WHERE listing_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let removed = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            return Err(DatabaseError::NotFound(format!("No listing with the id of {}", id)));
        }

        tx.commit().await?;
        tracing::info!(listing_id = %id, courses, reviews, "listing deleted");
        Ok(())
    }

    /// Listings whose location lies within `radians` of the given point
    /// (great-circle distance).
    pub async fn within_radius(
        &self,
        longitude: f64,
        latitude: f64,
        radians: f64,
    ) -> Result<Vec<Listing>, DatabaseError> {
        let listings = sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings
             WHERE longitude IS NOT NULL AND latitude IS NOT NULL
               AND acos(LEAST(1.0, GREATEST(-1.0,
                     sin(radians($2)) * sin(radians(latitude)) +
                     cos(radians($2)) * cos(radians(latitude)) * cos(radians(longitude - $1))
                   ))) <= $3
             ORDER BY created_at DESC, id",
        )
        .bind(longitude)
        .bind(latitude)
        .bind(radians)
        .fetch_all(&self.pool)
        .await?;
        Ok(listings)
    }
}
