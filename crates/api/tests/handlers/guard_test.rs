use manege_api::middleware::guard::{
    classify_path, decide, GuardDecision, PathClass, SessionState, ADMIN_HOME, LOGIN_PATH,
    MISSING_PROFILE_PATH, STUDENT_HOME,
};
use manege_core::models::profile::{AuthContext, Role};
use rstest::rstest;
use uuid::Uuid;

fn admin_session() -> SessionState {
    SessionState::Authenticated(AuthContext {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
    })
}

fn student_session() -> SessionState {
    SessionState::Authenticated(AuthContext {
        user_id: Uuid::new_v4(),
        role: Role::Student,
    })
}

#[rstest]
#[case("/login", PathClass::Public)]
#[case("/register", PathClass::Public)]
#[case("/api/auth/login", PathClass::Public)]
#[case("/api/auth/register", PathClass::Public)]
#[case("/students", PathClass::AdminOnly)]
#[case("/students/3f9e", PathClass::AdminOnly)]
#[case("/api/students", PathClass::AdminOnly)]
#[case("/api/students/3f9e", PathClass::AdminOnly)]
#[case("/api/goals/3f9e", PathClass::AdminOnly)]
#[case("/dashboard", PathClass::StudentOnly)]
#[case("/api/dashboard", PathClass::StudentOnly)]
#[case("/api/lessons", PathClass::Shared)]
#[case("/api/lesson-requests", PathClass::Shared)]
#[case("/api/competitions", PathClass::Shared)]
#[case("/api/calendar/week", PathClass::Shared)]
#[case("/api/auth/me", PathClass::Shared)]
#[case("/some/unknown/path", PathClass::Shared)]
fn test_classify_path(#[case] path: &str, #[case] expected: PathClass) {
    assert_eq!(classify_path(path), expected);
}

#[rstest]
#[case(PathClass::Public, GuardDecision::Allow)]
#[case(PathClass::AdminOnly, GuardDecision::Redirect(LOGIN_PATH))]
#[case(PathClass::Shared, GuardDecision::Redirect(LOGIN_PATH))]
#[case(PathClass::StudentOnly, GuardDecision::Redirect(LOGIN_PATH))]
fn test_anonymous_decisions(#[case] class: PathClass, #[case] expected: GuardDecision) {
    assert_eq!(decide(class, SessionState::Anonymous), expected);
}

#[rstest]
#[case(PathClass::Public, GuardDecision::Redirect(ADMIN_HOME))]
#[case(PathClass::AdminOnly, GuardDecision::Allow)]
#[case(PathClass::Shared, GuardDecision::Allow)]
#[case(PathClass::StudentOnly, GuardDecision::Allow)]
fn test_admin_decisions(#[case] class: PathClass, #[case] expected: GuardDecision) {
    assert_eq!(decide(class, admin_session()), expected);
}

#[rstest]
#[case(PathClass::Public, GuardDecision::Redirect(STUDENT_HOME))]
#[case(PathClass::AdminOnly, GuardDecision::Redirect(STUDENT_HOME))]
#[case(PathClass::Shared, GuardDecision::Allow)]
#[case(PathClass::StudentOnly, GuardDecision::Allow)]
fn test_student_decisions(#[case] class: PathClass, #[case] expected: GuardDecision) {
    assert_eq!(decide(class, student_session()), expected);
}

#[rstest]
#[case(PathClass::Public, GuardDecision::Allow)]
#[case(PathClass::AdminOnly, GuardDecision::SignOutRedirect(MISSING_PROFILE_PATH))]
#[case(PathClass::Shared, GuardDecision::SignOutRedirect(MISSING_PROFILE_PATH))]
#[case(PathClass::StudentOnly, GuardDecision::SignOutRedirect(MISSING_PROFILE_PATH))]
fn test_missing_profile_decisions(#[case] class: PathClass, #[case] expected: GuardDecision) {
    assert_eq!(decide(class, SessionState::MissingProfile), expected);
}
