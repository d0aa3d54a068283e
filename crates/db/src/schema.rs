use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Creates all tables and indexes if they do not exist yet.
///
/// Foreign keys deliberately carry no ON DELETE CASCADE: dependent rows
/// (horses before students) are deleted by the repositories in order.
pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create profiles table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id UUID PRIMARY KEY,
            role VARCHAR(32) NOT NULL,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES profiles(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create students table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            phone VARCHAR(64) NOT NULL,
            start_date DATE NOT NULL,
            level VARCHAR(8) NOT NULL,
            user_id UUID NULL REFERENCES profiles(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create horses table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS horses (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL REFERENCES students(id),
            name VARCHAR(255) NOT NULL,
            breed VARCHAR(255) NOT NULL,
            age INTEGER NOT NULL CHECK (age >= 0),
            level VARCHAR(32) NOT NULL,
            discipline VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create lessons table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lessons (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL REFERENCES students(id),
            date DATE NOT NULL,
            time TIME NOT NULL,
            duration INTEGER NOT NULL CHECK (duration IN (30, 45, 60, 90)),
            focus TEXT NOT NULL,
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create lesson_requests table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lesson_requests (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL REFERENCES students(id),
            preferred_date DATE NOT NULL,
            preferred_time TIME NOT NULL,
            notes TEXT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create training_goals table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS training_goals (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL REFERENCES students(id),
            description TEXT NOT NULL,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create competition_entries table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS competition_entries (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL REFERENCES students(id),
            competition_name VARCHAR(255) NOT NULL,
            date DATE NOT NULL,
            location VARCHAR(255) NOT NULL,
            level VARCHAR(32) NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'registered',
            result VARCHAR(255) NULL,
            placement VARCHAR(64) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_horses_student_id ON horses(student_id);
        CREATE INDEX IF NOT EXISTS idx_lessons_student_id ON lessons(student_id);
        CREATE INDEX IF NOT EXISTS idx_lessons_date ON lessons(date);
        CREATE INDEX IF NOT EXISTS idx_lesson_requests_student_id ON lesson_requests(student_id);
        CREATE INDEX IF NOT EXISTS idx_lesson_requests_status ON lesson_requests(status);
        CREATE INDEX IF NOT EXISTS idx_training_goals_student_id ON training_goals(student_id);
        CREATE INDEX IF NOT EXISTS idx_competition_entries_student_id ON competition_entries(student_id);
        CREATE INDEX IF NOT EXISTS idx_students_user_id ON students(user_id);
        CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
