use chrono::{NaiveDate, NaiveTime};
use manege_core::models::lesson::{CreateLessonRequest, UpdateLessonRequest};
use manege_core::models::student::{CreateStudentRequest, UpdateStudentRequest};
use mockall::mock;
use uuid::Uuid;

use crate::models::{
    DbCompetitionEntry, DbLesson, DbLessonRequest, DbLessonWithStudent, DbProfile, DbSession,
    DbStudent, DbStudentWithHorse, DbTrainingGoal,
};

// Mock repositories for testing

mock! {
    pub StudentRepo {
        pub async fn list_students(&self) -> eyre::Result<Vec<DbStudentWithHorse>>;

        pub async fn get_student_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbStudent>>;

        pub async fn get_student_with_horse(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbStudentWithHorse>>;

        pub async fn get_student_by_user_id(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Option<DbStudent>>;

        pub async fn create_student(
            &self,
            payload: CreateStudentRequest,
        ) -> eyre::Result<DbStudentWithHorse>;

        pub async fn update_student(
            &self,
            id: Uuid,
            patch: UpdateStudentRequest,
        ) -> eyre::Result<DbStudentWithHorse>;

        pub async fn delete_student(&self, id: Uuid) -> eyre::Result<()>;

        pub async fn link_student_user(
            &self,
            student_id: Uuid,
            user_id: Uuid,
        ) -> eyre::Result<bool>;

        pub async fn list_training_goals(
            &self,
            student_id: Uuid,
        ) -> eyre::Result<Vec<DbTrainingGoal>>;

        pub async fn add_training_goal(
            &self,
            student_id: Uuid,
            description: &'static str,
        ) -> eyre::Result<DbTrainingGoal>;

        pub async fn set_training_goal_completed(
            &self,
            goal_id: Uuid,
            completed: bool,
        ) -> eyre::Result<()>;

        pub async fn delete_training_goal(&self, goal_id: Uuid) -> eyre::Result<()>;
    }
}

mock! {
    pub LessonRepo {
        pub async fn list_lessons(
            &self,
            range: Option<(NaiveDate, NaiveDate)>,
        ) -> eyre::Result<Vec<DbLessonWithStudent>>;

        pub async fn upcoming_lessons_for_student(
            &self,
            student_id: Uuid,
            from: NaiveDate,
        ) -> eyre::Result<Vec<DbLessonWithStudent>>;

        pub async fn get_lesson_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbLesson>>;

        pub async fn get_lesson_with_student(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbLessonWithStudent>>;

        pub async fn create_lesson(
            &self,
            payload: CreateLessonRequest,
        ) -> eyre::Result<DbLesson>;

        pub async fn update_lesson(
            &self,
            id: Uuid,
            patch: UpdateLessonRequest,
        ) -> eyre::Result<DbLesson>;

        pub async fn delete_lesson(&self, id: Uuid) -> eyre::Result<()>;

        pub async fn create_lesson_request(
            &self,
            student_id: Uuid,
            preferred_date: NaiveDate,
            preferred_time: NaiveTime,
            notes: Option<&'static str>,
        ) -> eyre::Result<DbLessonRequest>;

        pub async fn list_lesson_requests(
            &self,
            student_id: Option<Uuid>,
            status: Option<&'static str>,
        ) -> eyre::Result<Vec<DbLessonRequest>>;

        pub async fn set_lesson_request_status(
            &self,
            id: Uuid,
            status: &'static str,
        ) -> eyre::Result<DbLessonRequest>;
    }
}

mock! {
    pub ProfileRepo {
        pub async fn create_profile(
            &self,
            id: Uuid,
            role: &'static str,
            name: &'static str,
            email: &'static str,
            password_hash: &'static str,
        ) -> eyre::Result<DbProfile>;

        pub async fn get_profile_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbProfile>>;

        pub async fn delete_profile(&self, id: Uuid) -> eyre::Result<()>;

        pub async fn get_profile_by_email(
            &self,
            email: &'static str,
        ) -> eyre::Result<Option<DbProfile>>;

        pub async fn verify_credentials(
            &self,
            email: &'static str,
            password: &'static str,
        ) -> eyre::Result<Option<DbProfile>>;
    }
}

mock! {
    pub SessionRepo {
        pub async fn create_session(&self, user_id: Uuid) -> eyre::Result<DbSession>;

        pub async fn get_session(
            &self,
            token: Uuid,
        ) -> eyre::Result<Option<DbSession>>;

        pub async fn delete_session(&self, token: Uuid) -> eyre::Result<()>;
    }
}

mock! {
    pub CompetitionRepo {
        pub async fn list_competition_entries(
            &self,
            student_id: Option<Uuid>,
        ) -> eyre::Result<Vec<DbCompetitionEntry>>;

        pub async fn upcoming_competitions(
            &self,
            student_id: Uuid,
            from: NaiveDate,
        ) -> eyre::Result<Vec<DbCompetitionEntry>>;
    }
}
