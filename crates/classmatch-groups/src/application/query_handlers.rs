//! Query handlers for the Groups context.

use chrono::{DateTime, Utc};
use classmatch_core::error::DomainError;
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

fn infra(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("{context}: {e}"))
}

async fn group_exists(pool: &PgPool, group_id: i64) -> Result<bool, DomainError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM study_groups WHERE id = $1")
        .bind(group_id)
        .fetch_optional(pool)
        .await
        .map(|row| row.is_some())
        .map_err(|e| infra("group lookup failed", e))
}

/// A group row in list results, with its course, owner, and active member
/// count.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct GroupSummary {
    /// The group id.
    pub id: i64,
    /// Group name.
    pub name: String,
    /// Group description.
    pub description: Option<String>,
    /// Free-text meeting time.
    pub meeting_time: Option<String>,
    /// Free-text location.
    pub location: Option<String>,
    /// Member cap, if any.
    pub max_members: Option<i32>,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Owner display name.
    pub owner_name: String,
    /// Active member count.
    pub member_count: i64,
}

/// A member of a group.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct GroupMemberView {
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
    /// Membership role.
    pub role: String,
    /// Membership status.
    pub status: String,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

/// A message with its author.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MessageView {
    /// The message id.
    pub id: i64,
    /// Message body.
    pub content: String,
    /// Posting timestamp.
    pub created_at: DateTime<Utc>,
    /// Author user id.
    pub user_id: i64,
    /// Author display name.
    pub author_name: String,
    /// Author avatar reference.
    pub author_avatar: Option<String>,
}

/// A message with its group and author, for single-message lookup.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MessageDetail {
    /// The message id.
    pub id: i64,
    /// The group it was posted in.
    pub group_id: i64,
    /// Message body.
    pub content: String,
    /// Posting timestamp.
    pub created_at: DateTime<Utc>,
    /// Author user id.
    pub user_id: i64,
    /// Author display name.
    pub author_name: String,
    /// Author avatar reference.
    pub author_avatar: Option<String>,
}

/// Full group detail: group, course, owner, members, recent messages.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct GroupDetail {
    /// The group id.
    pub id: i64,
    /// Group name.
    pub name: String,
    /// Group description.
    pub description: Option<String>,
    /// Free-text meeting time.
    pub meeting_time: Option<String>,
    /// Free-text location.
    pub location: Option<String>,
    /// Member cap, if any.
    pub max_members: Option<i32>,
    /// Tags blob.
    pub tags: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Course id.
    pub course_id: String,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Owner user id.
    pub owner_id: i64,
    /// Owner display name.
    pub owner_name: String,
    /// All members, admins first.
    #[sqlx(skip)]
    pub members: Vec<GroupMemberView>,
    /// Most recent messages, newest first, capped at 50.
    #[sqlx(skip)]
    pub messages: Vec<MessageView>,
}

/// A group a user belongs to.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct UserGroupView {
    /// The group id.
    pub id: i64,
    /// Group name.
    pub name: String,
    /// Group description.
    pub description: Option<String>,
    /// Free-text meeting time.
    pub meeting_time: Option<String>,
    /// Free-text location.
    pub location: Option<String>,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Owner display name.
    pub owner_name: String,
    /// The user's role in the group.
    pub role: String,
    /// The user's join timestamp.
    pub joined_at: DateTime<Utc>,
    /// Active member count.
    pub member_count: i64,
}

/// A group in a course's listing.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CourseGroupView {
    /// The group id.
    pub id: i64,
    /// Group name.
    pub name: String,
    /// Group description.
    pub description: Option<String>,
    /// Free-text meeting time.
    pub meeting_time: Option<String>,
    /// Free-text location.
    pub location: Option<String>,
    /// Member cap, if any.
    pub max_members: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Owner display name.
    pub owner_name: String,
    /// Active member count.
    pub member_count: i64,
}

/// Lists unarchived groups with owner, course, and active member counts,
/// newest first. Optionally filtered to one course.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on query failure.
pub async fn list_groups(
    course_id: Option<&str>,
    pool: &PgPool,
) -> Result<Vec<GroupSummary>, DomainError> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT g.id, g.name, g.description, g.meeting_time, g.location, g.max_members, \
                c.code AS course_code, c.name AS course_name, \
                u.name AS owner_name, \
                COUNT(gm.user_id) AS member_count \
         FROM study_groups g \
         JOIN courses c ON g.course_id = c.id \
         JOIN users u ON g.owner_user_id = u.id \
         LEFT JOIN group_members gm ON g.id = gm.group_id AND gm.status = 'active' \
         WHERE NOT g.is_archived",
    );
    if let Some(course_id) = course_id {
        builder.push(" AND g.course_id = ");
        builder.push_bind(course_id);
    }
    builder.push(
        " GROUP BY g.id, c.code, c.name, u.name \
          ORDER BY g.created_at DESC",
    );

    builder
        .build_query_as::<GroupSummary>()
        .fetch_all(pool)
        .await
        .map_err(|e| infra("group query failed", e))
}

/// Retrieves a group with its members (admins first) and the 50 most recent
/// messages (newest first). Archived groups are still visible by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown group.
pub async fn get_group_detail(group_id: i64, pool: &PgPool) -> Result<GroupDetail, DomainError> {
    let detail = sqlx::query_as::<_, GroupDetail>(
        "SELECT g.id, g.name, g.description, g.meeting_time, g.location, g.max_members, \
                g.tags, g.created_at, \
                c.id AS course_id, c.code AS course_code, c.name AS course_name, \
                u.id AS owner_id, u.name AS owner_name \
         FROM study_groups g \
         JOIN courses c ON g.course_id = c.id \
         JOIN users u ON g.owner_user_id = u.id \
         WHERE g.id = $1",
    )
    .bind(group_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| infra("group query failed", e))?;
    let Some(mut detail) = detail else {
        return Err(DomainError::NotFound("group"));
    };

    detail.members = fetch_members(group_id, pool).await?;
    detail.messages = fetch_messages(group_id, 50, 0, pool).await?;
    Ok(detail)
}

async fn fetch_members(
    group_id: i64,
    pool: &PgPool,
) -> Result<Vec<GroupMemberView>, DomainError> {
    sqlx::query_as::<_, GroupMemberView>(
        "SELECT u.id, u.name, u.email, u.avatar, u.major, u.year, \
                gm.role, gm.status, gm.joined_at \
         FROM group_members gm \
         JOIN users u ON gm.user_id = u.id \
         WHERE gm.group_id = $1 \
         ORDER BY CASE WHEN gm.role = 'admin' THEN 0 ELSE 1 END, gm.joined_at",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await
    .map_err(|e| infra("member query failed", e))
}

async fn fetch_messages(
    group_id: i64,
    limit: i64,
    offset: i64,
    pool: &PgPool,
) -> Result<Vec<MessageView>, DomainError> {
    sqlx::query_as::<_, MessageView>(
        "SELECT m.id, m.content, m.created_at, \
                u.id AS user_id, u.name AS author_name, u.avatar AS author_avatar \
         FROM messages m \
         JOIN users u ON m.user_id = u.id \
         WHERE m.group_id = $1 \
         ORDER BY m.created_at DESC \
         LIMIT $2 OFFSET $3",
    )
    .bind(group_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(|e| infra("message query failed", e))
}

/// Lists all members of a group, admins first.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown group.
pub async fn list_group_members(
    group_id: i64,
    pool: &PgPool,
) -> Result<Vec<GroupMemberView>, DomainError> {
    if !group_exists(pool, group_id).await? {
        return Err(DomainError::NotFound("group"));
    }
    fetch_members(group_id, pool).await
}

/// Returns a page of a group's messages, newest first.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown group.
pub async fn list_group_messages(
    group_id: i64,
    limit: i64,
    offset: i64,
    pool: &PgPool,
) -> Result<Vec<MessageView>, DomainError> {
    if !group_exists(pool, group_id).await? {
        return Err(DomainError::NotFound("group"));
    }
    fetch_messages(group_id, limit, offset, pool).await
}

/// Retrieves one message with its author.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown message.
pub async fn get_message(message_id: i64, pool: &PgPool) -> Result<MessageDetail, DomainError> {
    sqlx::query_as::<_, MessageDetail>(
        "SELECT m.id, m.group_id, m.content, m.created_at, \
                u.id AS user_id, u.name AS author_name, u.avatar AS author_avatar \
         FROM messages m \
         JOIN users u ON m.user_id = u.id \
         WHERE m.id = $1",
    )
    .bind(message_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| infra("message query failed", e))?
    .ok_or(DomainError::NotFound("message"))
}

/// Lists the unarchived groups a user is an active member of, most recently
/// joined first.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown user.
pub async fn list_user_groups(
    user_id: i64,
    pool: &PgPool,
) -> Result<Vec<UserGroupView>, DomainError> {
    let user = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| infra("user lookup failed", e))?;
    if user.is_none() {
        return Err(DomainError::NotFound("user"));
    }

    sqlx::query_as::<_, UserGroupView>(
        "SELECT g.id, g.name, g.description, g.meeting_time, g.location, \
                c.code AS course_code, c.name AS course_name, \
                u.name AS owner_name, \
                gm.role, gm.joined_at, \
                COUNT(gm2.user_id) AS member_count \
         FROM group_members gm \
         JOIN study_groups g ON gm.group_id = g.id \
         JOIN courses c ON g.course_id = c.id \
         JOIN users u ON g.owner_user_id = u.id \
         LEFT JOIN group_members gm2 ON g.id = gm2.group_id AND gm2.status = 'active' \
         WHERE gm.user_id = $1 AND gm.status = 'active' AND NOT g.is_archived \
         GROUP BY g.id, c.code, c.name, u.name, gm.role, gm.joined_at \
         ORDER BY gm.joined_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| infra("group query failed", e))
}

/// Lists a course's unarchived groups with active member counts, newest
/// first.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on query failure.
pub async fn list_groups_for_course(
    course_id: &str,
    pool: &PgPool,
) -> Result<Vec<CourseGroupView>, DomainError> {
    sqlx::query_as::<_, CourseGroupView>(
        "SELECT g.id, g.name, g.description, g.meeting_time, g.location, g.max_members, \
                g.created_at, \
                u.name AS owner_name, \
                COUNT(gm.user_id) AS member_count \
         FROM study_groups g \
         JOIN users u ON g.owner_user_id = u.id \
         LEFT JOIN group_members gm ON g.id = gm.group_id AND gm.status = 'active' \
         WHERE g.course_id = $1 AND NOT g.is_archived \
         GROUP BY g.id, u.name \
         ORDER BY g.created_at DESC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
    .map_err(|e| infra("group query failed", e))
}
