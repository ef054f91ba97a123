//! Query handlers for the Accounts context.
//!
//! Read-only view DTOs over users, courses, enrollments, and availability.

use chrono::{DateTime, Utc};
use classmatch_core::error::DomainError;
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

fn infra(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("{context}: {e}"))
}

async fn user_exists(pool: &PgPool, user_id: i64) -> Result<bool, DomainError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map(|row| row.is_some())
        .map_err(|e| infra("user lookup failed", e))
}

/// A user's full profile, without the password hash.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct UserProfile {
    /// The user id.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Declared major.
    pub major: Option<String>,
    /// Academic year.
    pub year: Option<String>,
    /// Avatar reference.
    pub avatar: Option<String>,
    /// Profile bio.
    pub bio: Option<String>,
    /// Study preferences blob.
    pub study_prefs: Option<String>,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A user row in search results.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct UserSummary {
    /// The user id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Avatar reference.
    pub avatar: Option<String>,
    /// Declared major.
    pub major: Option<String>,
    /// Academic year.
    pub year: Option<String>,
    /// Profile bio.
    pub bio: Option<String>,
}

/// One free-text availability slot.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AvailabilitySlotView {
    /// The slot id.
    pub id: i64,
    /// Slot description.
    pub slot: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A course a user is enrolled in.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct EnrolledCourseView {
    /// Catalog identifier.
    pub id: String,
    /// Course code.
    pub code: String,
    /// Course name.
    pub name: String,
    /// Instructor name.
    pub instructor: String,
    /// Schedule description.
    pub schedule: String,
    /// Enrollment timestamp.
    pub enrolled_at: DateTime<Utc>,
}

/// A user's profile together with availability and enrolled courses.
#[derive(Debug, Serialize)]
pub struct UserOverview {
    /// The profile.
    pub user: UserProfile,
    /// Availability slots in creation order.
    pub availability: Vec<AvailabilitySlotView>,
    /// Enrolled courses ordered by code.
    pub courses: Vec<EnrolledCourseView>,
}

/// Another user sharing enrolled courses, ranked by overlap.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MatchView {
    /// The matched user id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Avatar reference.
    pub avatar: Option<String>,
    /// Declared major.
    pub major: Option<String>,
    /// Academic year.
    pub year: Option<String>,
    /// Number of shared courses.
    pub shared_courses: i64,
    /// Shared course codes, comma separated and sorted.
    pub shared_course_codes: Option<String>,
}

/// A catalog course row.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CourseView {
    /// Catalog identifier.
    pub id: String,
    /// Course code.
    pub code: String,
    /// Course name.
    pub name: String,
    /// Section label.
    pub section: String,
    /// Instructor name.
    pub instructor: String,
    /// Schedule description.
    pub schedule: String,
    /// Seat count.
    pub students: i32,
    /// Building, if known.
    pub building: Option<String>,
    /// Room, if known.
    pub room: Option<String>,
}

/// Course detail with the current enrollment count.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CourseDetail {
    /// The course row.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub course: CourseView,
    /// Number of enrolled users.
    pub enrolled_count: i64,
}

/// A student enrolled in a course.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CourseStudentView {
    /// The user id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Declared major.
    pub major: Option<String>,
    /// Academic year.
    pub year: Option<String>,
    /// Avatar reference.
    pub avatar: Option<String>,
    /// Enrollment timestamp.
    pub enrolled_at: DateTime<Utc>,
}

/// Filters for the user search query.
#[derive(Debug, Default)]
pub struct UserSearchFilter {
    /// Substring match against name or email.
    pub q: Option<String>,
    /// Exact major filter.
    pub major: Option<String>,
    /// Exact year filter.
    pub year: Option<String>,
    /// Maximum rows returned.
    pub limit: i64,
}

/// Retrieves a user's profile by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown user.
pub async fn get_user(user_id: i64, pool: &PgPool) -> Result<UserProfile, DomainError> {
    sqlx::query_as::<_, UserProfile>(
        "SELECT id, email, name, major, year, avatar, bio, study_prefs, created_at \
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| infra("user query failed", e))?
    .ok_or(DomainError::NotFound("user"))
}

/// Searches users by name/email substring and optional major/year filters.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on query failure.
pub async fn search_users(
    filter: &UserSearchFilter,
    pool: &PgPool,
) -> Result<Vec<UserSummary>, DomainError> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT id, name, email, avatar, major, year, bio FROM users WHERE 1=1",
    );
    if let Some(q) = filter.q.as_deref().filter(|q| !q.is_empty()) {
        builder.push(" AND (name ILIKE ");
        builder.push_bind(format!("%{q}%"));
        builder.push(" OR email ILIKE ");
        builder.push_bind(format!("%{q}%"));
        builder.push(")");
    }
    if let Some(major) = &filter.major {
        builder.push(" AND major = ");
        builder.push_bind(major);
    }
    if let Some(year) = &filter.year {
        builder.push(" AND year = ");
        builder.push_bind(year);
    }
    builder.push(" ORDER BY name LIMIT ");
    builder.push_bind(filter.limit);

    builder
        .build_query_as::<UserSummary>()
        .fetch_all(pool)
        .await
        .map_err(|e| infra("user search failed", e))
}

/// Retrieves a user's profile, availability slots, and enrolled courses.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown user.
pub async fn get_user_overview(user_id: i64, pool: &PgPool) -> Result<UserOverview, DomainError> {
    let user = get_user(user_id, pool).await?;

    let availability = sqlx::query_as::<_, AvailabilitySlotView>(
        "SELECT id, slot, created_at FROM availability_slots \
         WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| infra("availability query failed", e))?;

    let courses = sqlx::query_as::<_, EnrolledCourseView>(
        "SELECT c.id, c.code, c.name, c.instructor, c.schedule, e.enrolled_at \
         FROM enrollments e \
         JOIN courses c ON e.course_id = c.id \
         WHERE e.user_id = $1 \
         ORDER BY c.code",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| infra("enrollment query failed", e))?;

    Ok(UserOverview {
        user,
        availability,
        courses,
    })
}

/// Finds other users sharing enrolled courses with `user_id`, ranked by the
/// number of shared courses, then name. Capped at 50 rows.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown user.
pub async fn get_user_matches(user_id: i64, pool: &PgPool) -> Result<Vec<MatchView>, DomainError> {
    if !user_exists(pool, user_id).await? {
        return Err(DomainError::NotFound("user"));
    }

    sqlx::query_as::<_, MatchView>(
        "WITH user_courses AS ( \
             SELECT course_id FROM enrollments WHERE user_id = $1 \
         ) \
         SELECT u.id, u.name, u.email, u.avatar, u.major, u.year, \
                COUNT(*) AS shared_courses, \
                string_agg(c.code, ', ' ORDER BY c.code) AS shared_course_codes \
         FROM enrollments e \
         JOIN user_courses uc ON e.course_id = uc.course_id \
         JOIN users u ON e.user_id = u.id \
         JOIN courses c ON e.course_id = c.id \
         WHERE e.user_id <> $1 \
         GROUP BY u.id, u.name, u.email, u.avatar, u.major, u.year \
         ORDER BY shared_courses DESC, u.name \
         LIMIT 50",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| infra("match query failed", e))
}

/// Returns a user's availability slots in creation order.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown user.
pub async fn list_availability(
    user_id: i64,
    pool: &PgPool,
) -> Result<Vec<AvailabilitySlotView>, DomainError> {
    if !user_exists(pool, user_id).await? {
        return Err(DomainError::NotFound("user"));
    }

    sqlx::query_as::<_, AvailabilitySlotView>(
        "SELECT id, slot, created_at FROM availability_slots \
         WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| infra("availability query failed", e))
}

/// Lists catalog courses with optional code/name search and instructor
/// filter, ordered by code then section.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on query failure.
pub async fn list_courses(
    search: Option<&str>,
    instructor: Option<&str>,
    pool: &PgPool,
) -> Result<Vec<CourseView>, DomainError> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT id, code, name, section, instructor, schedule, students, building, room \
         FROM courses WHERE 1=1",
    );
    if let Some(search) = search.filter(|s| !s.is_empty()) {
        builder.push(" AND (code ILIKE ");
        builder.push_bind(format!("%{search}%"));
        builder.push(" OR name ILIKE ");
        builder.push_bind(format!("%{search}%"));
        builder.push(")");
    }
    if let Some(instructor) = instructor.filter(|s| !s.is_empty()) {
        builder.push(" AND instructor ILIKE ");
        builder.push_bind(format!("%{instructor}%"));
    }
    builder.push(" ORDER BY code, section");

    builder
        .build_query_as::<CourseView>()
        .fetch_all(pool)
        .await
        .map_err(|e| infra("course query failed", e))
}

/// Retrieves a course with its enrollment count.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown course.
pub async fn get_course(course_id: &str, pool: &PgPool) -> Result<CourseDetail, DomainError> {
    sqlx::query_as::<_, CourseDetail>(
        "SELECT c.id, c.code, c.name, c.section, c.instructor, c.schedule, \
                c.students, c.building, c.room, \
                (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id) AS enrolled_count \
         FROM courses c WHERE c.id = $1",
    )
    .bind(course_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| infra("course query failed", e))?
    .ok_or(DomainError::NotFound("course"))
}

/// Lists students enrolled in a course, ordered by name.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown course.
pub async fn list_course_students(
    course_id: &str,
    pool: &PgPool,
) -> Result<Vec<CourseStudentView>, DomainError> {
    let course = sqlx::query_scalar::<_, String>("SELECT id FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| infra("course lookup failed", e))?;
    if course.is_none() {
        return Err(DomainError::NotFound("course"));
    }

    sqlx::query_as::<_, CourseStudentView>(
        "SELECT u.id, u.name, u.email, u.major, u.year, u.avatar, e.enrolled_at \
         FROM enrollments e \
         JOIN users u ON e.user_id = u.id \
         WHERE e.course_id = $1 \
         ORDER BY u.name",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
    .map_err(|e| infra("student query failed", e))
}
