//! Command handlers for the Groups context.
//!
//! Handlers that change group state publish the matching domain event after
//! their transaction commits. Publishing happens in the same call stack; a
//! notification handler failure therefore surfaces to the caller even though
//! the state change has already persisted.

use classmatch_core::bus::EventBus;
use classmatch_core::error::DomainError;
use classmatch_core::event::{GroupCreated, GroupEvent, GroupJoined, GroupMessagePosted};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::commands::{
    CreateGroup, DeleteGroup, DeleteMessage, JoinGroup, LeaveGroup, PostMessage,
    TransferOwnership, UpdateGroup,
};

fn infra(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("{context}: {e}"))
}

/// Handles `CreateGroup`: inserts the group and its owner as an active
/// admin member in one transaction, then publishes `GroupCreated`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on storage failure, including a
/// failed notification write during publish.
pub async fn handle_create_group(
    command: &CreateGroup,
    pool: &PgPool,
    bus: &EventBus,
) -> Result<i64, DomainError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| infra("transaction begin failed", e))?;

    let group_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO study_groups \
         (owner_user_id, course_id, name, description, meeting_time, location, max_members) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(command.owner_user_id)
    .bind(&command.course_id)
    .bind(&command.name)
    .bind(&command.description)
    .bind(&command.meeting_time)
    .bind(&command.location)
    .bind(command.max_members)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| infra("group insert failed", e))?;

    sqlx::query(
        "INSERT INTO group_members (group_id, user_id, role, status) \
         VALUES ($1, $2, 'admin', 'active')",
    )
    .bind(group_id)
    .bind(command.owner_user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| infra("member insert failed", e))?;

    tx.commit()
        .await
        .map_err(|e| infra("transaction commit failed", e))?;

    bus.publish(&GroupEvent::GroupCreated(GroupCreated {
        group_id,
        owner_user_id: command.owner_user_id,
    }))
    .await?;

    Ok(group_id)
}

/// Handles `UpdateGroup`: applies a partial update over the allowed fields.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty patch and
/// `DomainError::NotFound` for an unknown group.
pub async fn handle_update_group(
    command: &UpdateGroup,
    pool: &PgPool,
) -> Result<(), DomainError> {
    let patch = &command.patch;
    if patch.is_empty() {
        return Err(DomainError::Validation("no valid fields to update".into()));
    }

    let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM study_groups WHERE id = $1")
        .bind(command.group_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| infra("group lookup failed", e))?;
    if exists.is_none() {
        return Err(DomainError::NotFound("group"));
    }

    let mut builder = QueryBuilder::<Postgres>::new("UPDATE study_groups SET ");
    let mut fields = builder.separated(", ");
    if let Some(name) = &patch.name {
        fields.push("name = ").push_bind_unseparated(name);
    }
    if let Some(description) = &patch.description {
        fields
            .push("description = ")
            .push_bind_unseparated(description);
    }
    if let Some(meeting_time) = &patch.meeting_time {
        fields
            .push("meeting_time = ")
            .push_bind_unseparated(meeting_time);
    }
    if let Some(location) = &patch.location {
        fields.push("location = ").push_bind_unseparated(location);
    }
    if let Some(max_members) = patch.max_members {
        fields
            .push("max_members = ")
            .push_bind_unseparated(max_members);
    }
    if let Some(tags) = &patch.tags {
        fields.push("tags = ").push_bind_unseparated(tags);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(command.group_id);

    builder
        .build()
        .execute(pool)
        .await
        .map_err(|e| infra("group update failed", e))?;
    Ok(())
}

/// Handles `DeleteGroup`: removes the row on `hard`, otherwise archives it.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown group.
pub async fn handle_delete_group(
    command: &DeleteGroup,
    pool: &PgPool,
) -> Result<(), DomainError> {
    let sql = if command.hard {
        "DELETE FROM study_groups WHERE id = $1"
    } else {
        "UPDATE study_groups SET is_archived = TRUE WHERE id = $1"
    };
    let result = sqlx::query(sql)
        .bind(command.group_id)
        .execute(pool)
        .await
        .map_err(|e| infra("group delete failed", e))?;
    if result.rows_affected() == 0 {
        return Err(DomainError::NotFound("group"));
    }
    Ok(())
}

/// Handles `JoinGroup`: adds the user as an active member if the group has
/// room, then publishes `GroupJoined` carrying the group's owner.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown group,
/// `DomainError::Validation` when the group is full, and
/// `DomainError::Conflict` when the user is already a member.
pub async fn handle_join_group(
    command: &JoinGroup,
    pool: &PgPool,
    bus: &EventBus,
) -> Result<(), DomainError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| infra("transaction begin failed", e))?;

    let group = sqlx::query_as::<_, (i64, Option<i32>)>(
        "SELECT owner_user_id, max_members FROM study_groups WHERE id = $1",
    )
    .bind(command.group_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| infra("group lookup failed", e))?;
    let Some((owner_user_id, max_members)) = group else {
        return Err(DomainError::NotFound("group"));
    };

    let active_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM group_members WHERE group_id = $1 AND status = 'active'",
    )
    .bind(command.group_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| infra("member count failed", e))?;

    if let Some(max) = max_members {
        if active_count >= i64::from(max) {
            return Err(DomainError::Validation("group is full".into()));
        }
    }

    sqlx::query(
        "INSERT INTO group_members (group_id, user_id, role, status) \
         VALUES ($1, $2, 'member', 'active')",
    )
    .bind(command.group_id)
    .bind(command.user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            DomainError::Conflict("user is already a member of this group".into())
        }
        _ => infra("member insert failed", e),
    })?;

    tx.commit()
        .await
        .map_err(|e| infra("transaction commit failed", e))?;

    bus.publish(&GroupEvent::GroupJoined(GroupJoined {
        group_id: command.group_id,
        user_id: command.user_id,
        owner_user_id,
    }))
    .await?;

    Ok(())
}

/// Handles `LeaveGroup`: removes the membership row. The owner cannot
/// leave; they must transfer ownership or delete the group.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown group or membership and
/// `DomainError::Validation` when the owner tries to leave.
pub async fn handle_leave_group(command: &LeaveGroup, pool: &PgPool) -> Result<(), DomainError> {
    let owner = sqlx::query_scalar::<_, i64>(
        "SELECT owner_user_id FROM study_groups WHERE id = $1",
    )
    .bind(command.group_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| infra("group lookup failed", e))?;
    let Some(owner_user_id) = owner else {
        return Err(DomainError::NotFound("group"));
    };
    if owner_user_id == command.user_id {
        return Err(DomainError::Validation(
            "owner cannot leave group; transfer ownership or delete the group".into(),
        ));
    }

    let result = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
        .bind(command.group_id)
        .bind(command.user_id)
        .execute(pool)
        .await
        .map_err(|e| infra("member delete failed", e))?;
    if result.rows_affected() == 0 {
        return Err(DomainError::NotFound("group member"));
    }
    Ok(())
}

/// Handles `TransferOwnership`: points the group at the new owner and swaps
/// the admin role, all in one transaction.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown group and
/// `DomainError::Validation` when the new owner is not an active member.
pub async fn handle_transfer_ownership(
    command: &TransferOwnership,
    pool: &PgPool,
) -> Result<(), DomainError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| infra("transaction begin failed", e))?;

    let owner = sqlx::query_scalar::<_, i64>(
        "SELECT owner_user_id FROM study_groups WHERE id = $1",
    )
    .bind(command.group_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| infra("group lookup failed", e))?;
    let Some(old_owner_id) = owner else {
        return Err(DomainError::NotFound("group"));
    };

    let member = sqlx::query_scalar::<_, i64>(
        "SELECT user_id FROM group_members \
         WHERE group_id = $1 AND user_id = $2 AND status = 'active'",
    )
    .bind(command.group_id)
    .bind(command.new_owner_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| infra("member lookup failed", e))?;
    if member.is_none() {
        return Err(DomainError::Validation(
            "new owner must be an active member".into(),
        ));
    }

    sqlx::query("UPDATE study_groups SET owner_user_id = $1 WHERE id = $2")
        .bind(command.new_owner_id)
        .bind(command.group_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| infra("group update failed", e))?;

    sqlx::query("UPDATE group_members SET role = 'admin' WHERE group_id = $1 AND user_id = $2")
        .bind(command.group_id)
        .bind(command.new_owner_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| infra("member update failed", e))?;

    sqlx::query("UPDATE group_members SET role = 'member' WHERE group_id = $1 AND user_id = $2")
        .bind(command.group_id)
        .bind(old_owner_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| infra("member update failed", e))?;

    tx.commit()
        .await
        .map_err(|e| infra("transaction commit failed", e))?;
    Ok(())
}

/// Handles `PostMessage`: inserts the message, then publishes
/// `GroupMessagePosted` so active members get notified.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on storage failure, including a
/// failed notification write during publish.
pub async fn handle_post_message(
    command: &PostMessage,
    pool: &PgPool,
    bus: &EventBus,
) -> Result<i64, DomainError> {
    let message_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO messages (group_id, user_id, content) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(command.group_id)
    .bind(command.user_id)
    .bind(&command.content)
    .fetch_one(pool)
    .await
    .map_err(|e| infra("message insert failed", e))?;

    bus.publish(&GroupEvent::GroupMessagePosted(GroupMessagePosted {
        group_id: command.group_id,
        user_id: command.user_id,
        message_id,
    }))
    .await?;

    Ok(message_id)
}

/// Handles `DeleteMessage`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown message.
pub async fn handle_delete_message(
    command: &DeleteMessage,
    pool: &PgPool,
) -> Result<(), DomainError> {
    let result = sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(command.message_id)
        .execute(pool)
        .await
        .map_err(|e| infra("message delete failed", e))?;
    if result.rows_affected() == 0 {
        return Err(DomainError::NotFound("message"));
    }
    Ok(())
}
