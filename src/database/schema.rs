use sqlx::PgPool;
use tracing::info;

use super::manager::DatabaseError;

/// Idempotent schema bootstrap, applied in order
const STATEMENTS: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS pgcrypto",
    r#"CREATE TABLE IF NOT EXISTS accounts (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'publisher', 'admin')),
        password TEXT NOT NULL,
        reset_password_token TEXT,
        reset_password_expire TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS listings (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL UNIQUE,
        slug TEXT NOT NULL,
        description TEXT NOT NULL,
        website TEXT,
        phone TEXT,
        email TEXT,
        longitude DOUBLE PRECISION,
        latitude DOUBLE PRECISION,
        formatted_address TEXT,
        street TEXT,
        city TEXT,
        state TEXT,
        zipcode TEXT,
        country TEXT,
        careers TEXT[] NOT NULL,
        average_rating DOUBLE PRECISION,
        average_cost BIGINT,
        photo TEXT NOT NULL DEFAULT 'no-photo.jpg',
        housing BOOLEAN NOT NULL DEFAULT FALSE,
        job_assistance BOOLEAN NOT NULL DEFAULT FALSE,
        job_guarantee BOOLEAN NOT NULL DEFAULT FALSE,
        accept_gi BOOLEAN NOT NULL DEFAULT FALSE,
        account_id UUID NOT NULL REFERENCES accounts(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "ALTER TABLE listings ALTER COLUMN average_cost TYPE BIGINT",
    "CREATE INDEX IF NOT EXISTS listings_account_id_idx ON listings (account_id)",
    r#"CREATE TABLE IF NOT EXISTS courses (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        weeks TEXT NOT NULL,
        tuition INTEGER NOT NULL CHECK (tuition >= 0),
        minimum_skill TEXT NOT NULL CHECK (minimum_skill IN ('beginner', 'intermediate', 'advanced')),
        scholarship_available BOOLEAN NOT NULL DEFAULT FALSE,
        listing_id UUID NOT NULL REFERENCES listings(id),
        account_id UUID NOT NULL REFERENCES accounts(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS courses_listing_id_idx ON courses (listing_id)",
    r#"CREATE TABLE IF NOT EXISTS reviews (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title TEXT NOT NULL,
        text TEXT NOT NULL,
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 10),
        listing_id UUID NOT NULL REFERENCES listings(id),
        account_id UUID NOT NULL REFERENCES accounts(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (listing_id, account_id)
    )"#,
];

/// Key for the advisory lock that serializes concurrent bootstraps
const MIGRATION_LOCK: i64 = 0x6465_7663_616d_70;

pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK)
        .execute(&mut *tx)
        .await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!("Database schema is up to date ({} statements)", STATEMENTS.len());
    Ok(())
}
