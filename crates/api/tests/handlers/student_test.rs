use chrono::NaiveDate;
use mockall::predicate;
use manege_core::{
    errors::ManegeError,
    models::student::{
        CreateHorseRequest, CreateStudentRequest, Horse, RidingLevel, StudentResponse,
    },
};
use uuid::Uuid;

use crate::test_utils::{sample_student, sample_student_with_horse, TestContext};
use chrono::Utc;
use manege_api::middleware::error_handling::AppError;
use manege_db::models::{DbProfile, DbSession, DbStudentWithHorse};

fn to_student_response(row: DbStudentWithHorse) -> Result<StudentResponse, ManegeError> {
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

// Mirrors create_student: the student and horse come back from one
// transactional insert.
async fn test_create_student_wrapper(
    ctx: &mut TestContext,
    payload: CreateStudentRequest,
) -> Result<StudentResponse, AppError> {
    let row = ctx.student_repo.create_student(payload).await?;
    Ok(to_student_response(row)?)
}

// Mirrors get_student: existence check against the joined row.
async fn test_get_student_wrapper(
    ctx: &mut TestContext,
    id: Uuid,
) -> Result<StudentResponse, AppError> {
    let row = ctx
        .student_repo
        .get_student_with_horse(id)
        .await?
        .ok_or_else(|| ManegeError::NotFound(format!("Student with ID {} not found", id)))?;

    Ok(to_student_response(row)?)
}

// Mirrors delete_student: check first, then delete student and horse
// together.
async fn test_delete_student_wrapper(ctx: &mut TestContext, id: Uuid) -> Result<(), AppError> {
    ctx.student_repo
        .get_student_by_id(id)
        .await?
        .ok_or_else(|| ManegeError::NotFound(format!("Student with ID {} not found", id)))?;

    ctx.student_repo.delete_student(id).await?;
    Ok(())
}

// Mirrors register: the student record must exist and be unlinked; the
// profile insert happens before the conditional link, and a lost link race
// backs the profile out again.
async fn test_register_wrapper(
    ctx: &mut TestContext,
    student_id: Uuid,
) -> Result<Uuid, AppError> {
    let student = ctx
        .student_repo
        .get_student_by_id(student_id)
        .await?
        .ok_or_else(|| {
            ManegeError::Validation(
                "Invalid student ID. Please check with your instructor.".to_string(),
            )
        })?;

    if student.user_id.is_some() {
        return Err(AppError(ManegeError::Validation(
            "This student account is already linked to a user".to_string(),
        )));
    }

    let user_id = Uuid::new_v4();
    let profile = ctx
        .profile_repo
        .create_profile(user_id, "student", "Emma de Vries", "emma@example.com", "hash")
        .await?;

    let linked = ctx.student_repo.link_student_user(student_id, user_id).await?;
    if !linked {
        ctx.profile_repo.delete_profile(profile.id).await?;
        return Err(AppError(ManegeError::Validation(
            "This student account is already linked to a user".to_string(),
        )));
    }

    let session = ctx.session_repo.create_session(profile.id).await?;
    Ok(session.token)
}

fn sample_profile(id: Uuid) -> DbProfile {
    DbProfile {
        id,
        role: "student".to_string(),
        name: "Emma de Vries".to_string(),
        email: "emma@example.com".to_string(),
        password_hash: "hash".to_string(),
        created_at: Utc::now(),
    }
}

fn create_payload() -> CreateStudentRequest {
    CreateStudentRequest {
        name: "Emma de Vries".to_string(),
        email: "emma@example.com".to_string(),
        phone: "+31 6 1234 5678".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        level: RidingLevel::L1,
        horse: CreateHorseRequest {
            name: "Storm".to_string(),
            breed: "KWPN".to_string(),
            age: 8,
            level: "L1".to_string(),
            discipline: "Dressage".to_string(),
        },
    }
}

#[tokio::test]
async fn test_create_student_returns_horse() {
    let mut ctx = TestContext::new();
    let student_id = Uuid::new_v4();

    ctx.student_repo
        .expect_create_student()
        .times(1)
        .returning(move |payload| {
            let mut row = sample_student_with_horse(student_id);
            row.name = payload.name;
            row.horse_name = payload.horse.name;
            Ok(row)
        });

    let response = test_create_student_wrapper(&mut ctx, create_payload())
        .await
        .unwrap();

    assert_eq!(response.id, student_id);
    assert_eq!(response.name, "Emma de Vries");
    assert_eq!(response.level, RidingLevel::L1);
    assert_eq!(response.horse.name, "Storm");
    assert_eq!(response.horse.student_id, student_id);
}

#[tokio::test]
async fn test_get_student_not_found() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.student_repo
        .expect_get_student_with_horse()
        .with(predicate::eq(id))
        .returning(|_| Ok(None));

    let result = test_get_student_wrapper(&mut ctx, id).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        ManegeError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_deleted_student_is_gone() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.student_repo
        .expect_get_student_by_id()
        .with(predicate::eq(id))
        .times(1)
        .returning(move |id| Ok(Some(sample_student(id))));

    ctx.student_repo
        .expect_delete_student()
        .with(predicate::eq(id))
        .times(1)
        .returning(|_| Ok(()));

    test_delete_student_wrapper(&mut ctx, id).await.unwrap();

    // A follow-up read sees nothing; the horse went in the same
    // transaction as the student.
    ctx.student_repo
        .expect_get_student_with_horse()
        .with(predicate::eq(id))
        .returning(|_| Ok(None));

    let result = test_get_student_wrapper(&mut ctx, id).await;
    assert!(matches!(result.unwrap_err().0, ManegeError::NotFound(_)));
}

#[tokio::test]
async fn test_registration_rejects_linked_student() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.student_repo
        .expect_get_student_by_id()
        .with(predicate::eq(id))
        .returning(move |id| {
            let mut student = sample_student(id);
            student.user_id = Some(Uuid::new_v4());
            Ok(Some(student))
        });

    ctx.profile_repo
        .expect_create_profile()
        .times(0)
        .returning(|_, _, _, _, _| panic!("Should not be called"));

    let result = test_register_wrapper(&mut ctx, id).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        ManegeError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_registration_rejects_unknown_student() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.student_repo
        .expect_get_student_by_id()
        .with(predicate::eq(id))
        .returning(|_| Ok(None));

    let result = test_register_wrapper(&mut ctx, id).await;

    assert!(matches!(result.unwrap_err().0, ManegeError::Validation(_)));
}

#[tokio::test]
async fn test_registration_opens_session_when_link_succeeds() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let token = Uuid::new_v4();

    ctx.student_repo
        .expect_get_student_by_id()
        .with(predicate::eq(id))
        .returning(move |id| Ok(Some(sample_student(id))));

    ctx.profile_repo
        .expect_create_profile()
        .times(1)
        .returning(|id, _, _, _, _| Ok(sample_profile(id)));

    ctx.student_repo
        .expect_link_student_user()
        .times(1)
        .returning(|_, _| Ok(true));

    ctx.profile_repo
        .expect_delete_profile()
        .times(0)
        .returning(|_| panic!("Should not be called"));

    ctx.session_repo
        .expect_create_session()
        .times(1)
        .returning(move |user_id| {
            Ok(DbSession {
                token,
                user_id,
                created_at: Utc::now(),
            })
        });

    let result = test_register_wrapper(&mut ctx, id).await.unwrap();
    assert_eq!(result, token);
}

#[tokio::test]
async fn test_lost_link_race_backs_out_the_profile() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    // The student looked unlinked at check time but a concurrent
    // registration takes the link first.
    ctx.student_repo
        .expect_get_student_by_id()
        .with(predicate::eq(id))
        .returning(move |id| Ok(Some(sample_student(id))));

    ctx.profile_repo
        .expect_create_profile()
        .times(1)
        .returning(|id, _, _, _, _| Ok(sample_profile(id)));

    ctx.student_repo
        .expect_link_student_user()
        .times(1)
        .returning(|_, _| Ok(false));

    // The orphan must be removed so the email can register again.
    ctx.profile_repo
        .expect_delete_profile()
        .times(1)
        .returning(|_| Ok(()));

    ctx.session_repo
        .expect_create_session()
        .times(0)
        .returning(|_| panic!("Should not be called"));

    let result = test_register_wrapper(&mut ctx, id).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        ManegeError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}
