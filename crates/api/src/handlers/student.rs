use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use manege_core::{
    errors::ManegeError,
    models::student::{
        CreateStudentRequest, CreateTrainingGoalRequest, GetStudentResponse, Horse,
        StudentResponse, TrainingGoal, UpdateStudentRequest, UpdateTrainingGoalRequest,
    },
};
use manege_db::models::{DbStudentWithHorse, DbTrainingGoal};
use uuid::Uuid;

use crate::{handlers::competition::competition_response, middleware::error_handling::AppError, ApiState};

pub(crate) fn student_response(row: DbStudentWithHorse) -> Result<StudentResponse, ManegeError> {
    Ok(StudentResponse {
        id: row.id,
        name: row.name,
        email: row.email,
        phone: row.phone,
        start_date: row.start_date,
        level: row.level.parse()?,
        horse: Horse {
            id: row.horse_id,
            student_id: row.id,
            name: row.horse_name,
            breed: row.horse_breed,
            age: row.horse_age.max(0) as u32,
            level: row.horse_level,
            discipline: row.horse_discipline,
        },
    })
}

fn training_goal_response(row: DbTrainingGoal) -> TrainingGoal {
    TrainingGoal {
        id: row.id,
        student_id: row.student_id,
        description: row.description,
        completed: row.completed,
        created_at: row.created_at,
    }
}

#[axum::debug_handler]
pub async fn list_students(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let rows = manege_db::repositories::student::list_students(&state.db_pool)
        .await
        .map_err(ManegeError::Database)?;

    let students = rows
        .into_iter()
        .map(student_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(students))
}

#[axum::debug_handler]
pub async fn get_student(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GetStudentResponse>, AppError> {
    let row = manege_db::repositories::student::get_student_with_horse(&state.db_pool, id)
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| ManegeError::NotFound(format!("Student with ID {} not found", id)))?;

    let goals = manege_db::repositories::student::list_training_goals(&state.db_pool, id)
        .await
        .map_err(ManegeError::Database)?;

    let competitions =
        manege_db::repositories::competition::list_competition_entries(&state.db_pool, Some(id))
            .await
            .map_err(ManegeError::Database)?;

    let student = student_response(row)?;
    let response = GetStudentResponse {
        id: student.id,
        name: student.name,
        email: student.email,
        phone: student.phone,
        start_date: student.start_date,
        level: student.level,
        horse: student.horse,
        competitions: competitions
            .into_iter()
            .map(competition_response)
            .collect::<Result<Vec<_>, _>>()?,
        training_goals: goals.into_iter().map(training_goal_response).collect(),
    };

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn create_student(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<Json<StudentResponse>, AppError> {
    // Student and horse are written in one transaction by the repository.
    let row = manege_db::repositories::student::create_student(&state.db_pool, &payload)
        .await
        .map_err(ManegeError::Database)?;

    Ok(Json(student_response(row)?))
}

#[axum::debug_handler]
pub async fn update_student(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>, AppError> {
    // Existence check first so an unknown id is a 404, not a store error.
    manege_db::repositories::student::get_student_by_id(&state.db_pool, id)
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| ManegeError::NotFound(format!("Student with ID {} not found", id)))?;

    let row = manege_db::repositories::student::update_student(&state.db_pool, id, &payload)
        .await
        .map_err(ManegeError::Database)?;

    Ok(Json(student_response(row)?))
}

#[axum::debug_handler]
pub async fn delete_student(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    manege_db::repositories::student::get_student_by_id(&state.db_pool, id)
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| ManegeError::NotFound(format!("Student with ID {} not found", id)))?;

    // Horse rows go first, then the student, atomically.
    manege_db::repositories::student::delete_student(&state.db_pool, id)
        .await
        .map_err(ManegeError::Database)?;

    Ok(Json(serde_json::json!({ "deleted": id })))
}

#[axum::debug_handler]
pub async fn add_training_goal(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateTrainingGoalRequest>,
) -> Result<Json<TrainingGoal>, AppError> {
    manege_db::repositories::student::get_student_by_id(&state.db_pool, id)
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| ManegeError::NotFound(format!("Student with ID {} not found", id)))?;

    let goal = manege_db::repositories::student::add_training_goal(
        &state.db_pool,
        id,
        &payload.description,
    )
    .await
    .map_err(ManegeError::Database)?;

    Ok(Json(training_goal_response(goal)))
}

#[axum::debug_handler]
pub async fn update_training_goal(
    State(state): State<Arc<ApiState>>,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<UpdateTrainingGoalRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    manege_db::repositories::student::set_training_goal_completed(
        &state.db_pool,
        goal_id,
        payload.completed,
    )
    .await
    .map_err(ManegeError::Database)?;

    Ok(Json(serde_json::json!({ "id": goal_id, "completed": payload.completed })))
}

#[axum::debug_handler]
pub async fn delete_training_goal(
    State(state): State<Arc<ApiState>>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    manege_db::repositories::student::delete_training_goal(&state.db_pool, goal_id)
        .await
        .map_err(ManegeError::Database)?;

    Ok(Json(serde_json::json!({ "deleted": goal_id })))
}
