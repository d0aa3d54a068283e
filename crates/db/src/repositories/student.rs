use crate::models::{DbStudent, DbStudentWithHorse, DbTrainingGoal};
use chrono::Utc;
use eyre::{eyre, Result};
use manege_core::models::student::{CreateStudentRequest, UpdateStudentRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const STUDENT_WITH_HORSE_COLUMNS: &str = r#"
    s.id, s.name, s.email, s.phone, s.start_date, s.level, s.user_id, s.created_at,
    h.id AS horse_id, h.name AS horse_name, h.breed AS horse_breed,
    h.age AS horse_age, h.level AS horse_level, h.discipline AS horse_discipline
"#;

pub async fn list_students(pool: &Pool<Postgres>) -> Result<Vec<DbStudentWithHorse>> {
    tracing::debug!("Listing all students");

    let students = sqlx::query_as::<_, DbStudentWithHorse>(&format!(
        r#"
        SELECT {STUDENT_WITH_HORSE_COLUMNS}
        FROM students s
        JOIN horses h ON h.student_id = s.id
        ORDER BY s.name ASC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(students)
}

pub async fn get_student_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbStudent>> {
    tracing::debug!("Getting student by id: {}", id);

    let student = sqlx::query_as::<_, DbStudent>(
        r#"
        SELECT id, name, email, phone, start_date, level, user_id, created_at
        FROM students
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(student)
}

pub async fn get_student_with_horse(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbStudentWithHorse>> {
    tracing::debug!("Getting student with horse: {}", id);

    let student = sqlx::query_as::<_, DbStudentWithHorse>(&format!(
        r#"
        SELECT {STUDENT_WITH_HORSE_COLUMNS}
        FROM students s
        JOIN horses h ON h.student_id = s.id
        WHERE s.id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(student)
}

pub async fn get_student_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<DbStudent>> {
    let student = sqlx::query_as::<_, DbStudent>(
        r#"
        SELECT id, name, email, phone, start_date, level, user_id, created_at
        FROM students
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(student)
}

/// Inserts the student and its horse in one transaction; a failed horse
/// insert rolls the student back rather than leaving an orphan row.
pub async fn create_student(
    pool: &Pool<Postgres>,
    payload: &CreateStudentRequest,
) -> Result<DbStudentWithHorse> {
    let student_id = Uuid::new_v4();
    let horse_id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating student: id={}, name={}, horse={}",
        student_id,
        payload.name,
        payload.horse.name
    );

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO students (id, name, email, phone, start_date, level, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(student_id)
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(payload.start_date)
    .bind(payload.level.as_str())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO horses (id, student_id, name, breed, age, level, discipline, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(horse_id)
    .bind(student_id)
    .bind(&payload.horse.name)
    .bind(&payload.horse.breed)
    .bind(payload.horse.age as i32)
    .bind(&payload.horse.level)
    .bind(&payload.horse.discipline)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_student_with_horse(pool, student_id)
        .await?
        .ok_or_else(|| eyre!("Student vanished after create"))
}

/// Resolves a sparse patch against the current row. Absent fields keep
/// their current value; a horse sub-patch merges field by field.
pub fn apply_student_patch(
    current: &DbStudentWithHorse,
    patch: &UpdateStudentRequest,
) -> DbStudentWithHorse {
    let mut merged = current.clone();

    if let Some(name) = &patch.name {
        merged.name = name.clone();
    }
    if let Some(email) = &patch.email {
        merged.email = email.clone();
    }
    if let Some(phone) = &patch.phone {
        merged.phone = phone.clone();
    }
    if let Some(level) = patch.level {
        merged.level = level.as_str().to_string();
    }

    if let Some(horse) = &patch.horse {
        if let Some(name) = &horse.name {
            merged.horse_name = name.clone();
        }
        if let Some(breed) = &horse.breed {
            merged.horse_breed = breed.clone();
        }
        if let Some(age) = horse.age {
            merged.horse_age = age as i32;
        }
        if let Some(level) = &horse.level {
            merged.horse_level = level.clone();
        }
        if let Some(discipline) = &horse.discipline {
            merged.horse_discipline = discipline.clone();
        }
    }

    merged
}

/// Sparse patch: only the supplied fields are written; a horse sub-patch
/// updates the horse row in the same transaction.
pub async fn update_student(
    pool: &Pool<Postgres>,
    id: Uuid,
    patch: &UpdateStudentRequest,
) -> Result<DbStudentWithHorse> {
    let current = get_student_with_horse(pool, id)
        .await?
        .ok_or_else(|| eyre!("Student not found"))?;

    let merged = apply_student_patch(&current, patch);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE students
        SET name = $2, email = $3, phone = $4, level = $5
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&merged.name)
    .bind(&merged.email)
    .bind(&merged.phone)
    .bind(&merged.level)
    .execute(&mut *tx)
    .await?;

    if patch.horse.is_some() {
        sqlx::query(
            r#"
            UPDATE horses
            SET name = $2, breed = $3, age = $4, level = $5, discipline = $6
            WHERE student_id = $1
            "#,
        )
        .bind(id)
        .bind(&merged.horse_name)
        .bind(&merged.horse_breed)
        .bind(merged.horse_age)
        .bind(&merged.horse_level)
        .bind(&merged.horse_discipline)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    get_student_with_horse(pool, id)
        .await?
        .ok_or_else(|| eyre!("Student vanished after update"))
}

/// Deletes the horse rows first, then the student, in one transaction.
/// A failed horse delete aborts the whole operation.
pub async fn delete_student(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    tracing::debug!("Deleting student: {}", id);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM horses
        WHERE student_id = $1
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM students
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}

/// Links a provisioned student record to a registered user account.
/// Returns false when the student is already linked (or does not exist).
pub async fn link_student_user(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    user_id: Uuid,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET user_id = $2
        WHERE id = $1 AND user_id IS NULL
        "#,
    )
    .bind(student_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn list_training_goals(
    pool: &Pool<Postgres>,
    student_id: Uuid,
) -> Result<Vec<DbTrainingGoal>> {
    let goals = sqlx::query_as::<_, DbTrainingGoal>(
        r#"
        SELECT id, student_id, description, completed, created_at
        FROM training_goals
        WHERE student_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(goals)
}

pub async fn add_training_goal(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    description: &str,
) -> Result<DbTrainingGoal> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let goal = sqlx::query_as::<_, DbTrainingGoal>(
        r#"
        INSERT INTO training_goals (id, student_id, description, completed, created_at)
        VALUES ($1, $2, $3, FALSE, $4)
        RETURNING id, student_id, description, completed, created_at
        "#,
    )
    .bind(id)
    .bind(student_id)
    .bind(description)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(goal)
}

pub async fn set_training_goal_completed(
    pool: &Pool<Postgres>,
    goal_id: Uuid,
    completed: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE training_goals
        SET completed = $2
        WHERE id = $1
        "#,
    )
    .bind(goal_id)
    .bind(completed)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_training_goal(pool: &Pool<Postgres>, goal_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM training_goals
        WHERE id = $1
        "#,
    )
    .bind(goal_id)
    .execute(pool)
    .await?;

    Ok(())
}
