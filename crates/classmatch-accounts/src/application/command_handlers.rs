//! Command handlers for the Accounts context.

use classmatch_core::error::DomainError;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::application::query_handlers::UserProfile;
use crate::domain::commands::{
    AddAvailabilitySlot, CreateCourse, DeleteAvailabilitySlot, DeleteUser, EnrollInCourse,
    LoginUser, RegisterUser, ReplaceAvailability, UnenrollFromCourse, UpdateUserProfile,
};
use crate::domain::password;

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

/// Handles `RegisterUser`: hashes the password and inserts the account.
///
/// # Errors
///
/// Returns `DomainError::Conflict` if the email is already registered.
pub async fn handle_register_user(
    command: &RegisterUser,
    pool: &PgPool,
) -> Result<i64, DomainError> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = $1")
        .bind(&command.email)
        .fetch_optional(pool)
        .await
        .map_err(|e| infra("user lookup failed", e))?;
    if existing.is_some() {
        return Err(DomainError::Conflict("email already registered".into()));
    }

    let password_hash = password::hash_password(&command.password);

    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, password_hash, name, major, year, bio) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&command.email)
    .bind(&password_hash)
    .bind(&command.name)
    .bind(&command.major)
    .bind(&command.year)
    .bind(&command.bio)
    .fetch_one(pool)
    .await
    .map_err(|e| infra("user insert failed", e))
}

/// Handles `LoginUser`: verifies credentials and returns the profile.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` for an unknown email or a wrong
/// password; the two cases are not distinguished.
pub async fn handle_login_user(
    command: &LoginUser,
    pool: &PgPool,
) -> Result<UserProfile, DomainError> {
    #[derive(sqlx::FromRow)]
    struct CredentialRow {
        password_hash: String,
        #[sqlx(flatten)]
        profile: UserProfile,
    }

    let row = sqlx::query_as::<_, CredentialRow>(
        "SELECT password_hash, id, email, name, major, year, avatar, bio, study_prefs, created_at \
         FROM users WHERE email = $1",
    )
    .bind(&command.email)
    .fetch_optional(pool)
    .await
    .map_err(|e| infra("user lookup failed", e))?;

    let Some(row) = row else {
        return Err(DomainError::Unauthorized("invalid credentials".into()));
    };
    if !password::verify_password(&command.password, &row.password_hash) {
        return Err(DomainError::Unauthorized("invalid credentials".into()));
    }
    Ok(row.profile)
}

/// Handles `UpdateUserProfile`: applies a partial update over the allowed
/// profile fields.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty patch and
/// `DomainError::NotFound` for an unknown user.
pub async fn handle_update_user_profile(
    command: &UpdateUserProfile,
    pool: &PgPool,
) -> Result<(), DomainError> {
    let patch = &command.patch;
    if patch.is_empty() {
        return Err(DomainError::Validation("no valid fields to update".into()));
    }
    if !user_exists(pool, command.user_id).await? {
        return Err(DomainError::NotFound("user"));
    }

    let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET ");
    let mut fields = builder.separated(", ");
    if let Some(name) = &patch.name {
        fields.push("name = ").push_bind_unseparated(name);
    }
    if let Some(major) = &patch.major {
        fields.push("major = ").push_bind_unseparated(major);
    }
    if let Some(year) = &patch.year {
        fields.push("year = ").push_bind_unseparated(year);
    }
    if let Some(avatar) = &patch.avatar {
        fields.push("avatar = ").push_bind_unseparated(avatar);
    }
    if let Some(bio) = &patch.bio {
        fields.push("bio = ").push_bind_unseparated(bio);
    }
    if let Some(study_prefs) = &patch.study_prefs {
        fields
            .push("study_prefs = ")
            .push_bind_unseparated(study_prefs);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(command.user_id);

    builder
        .build()
        .execute(pool)
        .await
        .map_err(|e| infra("user update failed", e))?;
    Ok(())
}

/// Handles `DeleteUser`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown user.
pub async fn handle_delete_user(command: &DeleteUser, pool: &PgPool) -> Result<(), DomainError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(command.user_id)
        .execute(pool)
        .await
        .map_err(|e| infra("user delete failed", e))?;
    if result.rows_affected() == 0 {
        return Err(DomainError::NotFound("user"));
    }
    Ok(())
}

/// Handles `CreateCourse`: inserts a catalog course under its external id.
///
/// # Errors
///
/// Returns `DomainError::Conflict` if the course id is already taken.
pub async fn handle_create_course(
    command: &CreateCourse,
    pool: &PgPool,
) -> Result<(), DomainError> {
    sqlx::query(
        "INSERT INTO courses (id, code, name, section, instructor, schedule, students, building, room) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(&command.id)
    .bind(&command.code)
    .bind(&command.name)
    .bind(&command.section)
    .bind(&command.instructor)
    .bind(&command.schedule)
    .bind(command.students)
    .bind(&command.building)
    .bind(&command.room)
    .execute(pool)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            DomainError::Conflict("course id already exists".into())
        }
        _ => infra("course insert failed", e),
    })?;
    Ok(())
}

/// Handles `EnrollInCourse`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown course or user and
/// `DomainError::Conflict` for a duplicate enrollment.
pub async fn handle_enroll_in_course(
    command: &EnrollInCourse,
    pool: &PgPool,
) -> Result<(), DomainError> {
    let course = sqlx::query_scalar::<_, String>("SELECT id FROM courses WHERE id = $1")
        .bind(&command.course_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| infra("course lookup failed", e))?;
    if course.is_none() {
        return Err(DomainError::NotFound("course"));
    }
    if !user_exists(pool, command.user_id).await? {
        return Err(DomainError::NotFound("user"));
    }

    sqlx::query("INSERT INTO enrollments (user_id, course_id) VALUES ($1, $2)")
        .bind(command.user_id)
        .bind(&command.course_id)
        .execute(pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                DomainError::Conflict("already enrolled in this course".into())
            }
            _ => infra("enrollment insert failed", e),
        })?;
    Ok(())
}

/// Handles `UnenrollFromCourse`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no matching enrollment exists.
pub async fn handle_unenroll_from_course(
    command: &UnenrollFromCourse,
    pool: &PgPool,
) -> Result<(), DomainError> {
    let result = sqlx::query("DELETE FROM enrollments WHERE user_id = $1 AND course_id = $2")
        .bind(command.user_id)
        .bind(&command.course_id)
        .execute(pool)
        .await
        .map_err(|e| infra("enrollment delete failed", e))?;
    if result.rows_affected() == 0 {
        return Err(DomainError::NotFound("enrollment"));
    }
    Ok(())
}

/// Handles `AddAvailabilitySlot`: inserts one slot and returns its id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown user.
pub async fn handle_add_availability_slot(
    command: &AddAvailabilitySlot,
    pool: &PgPool,
) -> Result<i64, DomainError> {
    if !user_exists(pool, command.user_id).await? {
        return Err(DomainError::NotFound("user"));
    }

    sqlx::query_scalar::<_, i64>(
        "INSERT INTO availability_slots (user_id, slot) VALUES ($1, $2) RETURNING id",
    )
    .bind(command.user_id)
    .bind(&command.slot)
    .fetch_one(pool)
    .await
    .map_err(|e| infra("availability insert failed", e))
}

/// Handles `DeleteAvailabilitySlot`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no matching slot exists for this user.
pub async fn handle_delete_availability_slot(
    command: &DeleteAvailabilitySlot,
    pool: &PgPool,
) -> Result<(), DomainError> {
    let result = sqlx::query("DELETE FROM availability_slots WHERE id = $1 AND user_id = $2")
        .bind(command.slot_id)
        .bind(command.user_id)
        .execute(pool)
        .await
        .map_err(|e| infra("availability delete failed", e))?;
    if result.rows_affected() == 0 {
        return Err(DomainError::NotFound("availability slot"));
    }
    Ok(())
}

/// Handles `ReplaceAvailability`: atomically swaps a user's slot list for
/// the given one, skipping empty strings.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown user.
pub async fn handle_replace_availability(
    command: &ReplaceAvailability,
    pool: &PgPool,
) -> Result<(), DomainError> {
    if !user_exists(pool, command.user_id).await? {
        return Err(DomainError::NotFound("user"));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| infra("transaction begin failed", e))?;

    sqlx::query("DELETE FROM availability_slots WHERE user_id = $1")
        .bind(command.user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| infra("availability delete failed", e))?;

    for slot in command.slots.iter().filter(|s| !s.is_empty()) {
        sqlx::query("INSERT INTO availability_slots (user_id, slot) VALUES ($1, $2)")
            .bind(command.user_id)
            .bind(slot)
            .execute(&mut *tx)
            .await
            .map_err(|e| infra("availability insert failed", e))?;
    }

    tx.commit()
        .await
        .map_err(|e| infra("transaction commit failed", e))?;
    Ok(())
}
