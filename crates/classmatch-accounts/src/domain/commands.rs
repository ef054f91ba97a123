//! Commands for the Accounts context.

use classmatch_core::command::Command;
use uuid::Uuid;

/// Command to register a new user account.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Login email; unique across users.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Declared major, if any.
    pub major: Option<String>,
    /// Academic year, if any.
    pub year: Option<String>,
    /// Profile bio, if any.
    pub bio: Option<String>,
}

impl Command for RegisterUser {
    fn command_type(&self) -> &'static str {
        "accounts.register_user"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to authenticate a user by email and password.
#[derive(Debug, Clone)]
pub struct LoginUser {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl Command for LoginUser {
    fn command_type(&self) -> &'static str {
        "accounts.login_user"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserProfilePatch {
    /// New display name.
    pub name: Option<String>,
    /// New major.
    pub major: Option<String>,
    /// New academic year.
    pub year: Option<String>,
    /// New avatar reference.
    pub avatar: Option<String>,
    /// New bio.
    pub bio: Option<String>,
    /// New study preferences blob.
    pub study_prefs: Option<String>,
}

impl UserProfilePatch {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.major.is_none()
            && self.year.is_none()
            && self.avatar.is_none()
            && self.bio.is_none()
            && self.study_prefs.is_none()
    }
}

/// Command to update a user's profile fields.
#[derive(Debug, Clone)]
pub struct UpdateUserProfile {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user to update.
    pub user_id: i64,
    /// The fields to change.
    pub patch: UserProfilePatch,
}

impl Command for UpdateUserProfile {
    fn command_type(&self) -> &'static str {
        "accounts.update_user_profile"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete a user account.
#[derive(Debug, Clone)]
pub struct DeleteUser {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user to delete.
    pub user_id: i64,
}

impl Command for DeleteUser {
    fn command_type(&self) -> &'static str {
        "accounts.delete_user"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to create a catalog course. Course ids are external catalog
/// identifiers, not generated.
#[derive(Debug, Clone)]
pub struct CreateCourse {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
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

impl Command for CreateCourse {
    fn command_type(&self) -> &'static str {
        "accounts.create_course"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to enroll a user in a course.
#[derive(Debug, Clone)]
pub struct EnrollInCourse {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course to enroll in.
    pub course_id: String,
    /// The enrolling user.
    pub user_id: i64,
}

impl Command for EnrollInCourse {
    fn command_type(&self) -> &'static str {
        "accounts.enroll_in_course"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to remove a user's enrollment in a course.
#[derive(Debug, Clone)]
pub struct UnenrollFromCourse {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course to unenroll from.
    pub course_id: String,
    /// The user.
    pub user_id: i64,
}

impl Command for UnenrollFromCourse {
    fn command_type(&self) -> &'static str {
        "accounts.unenroll_from_course"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to add one free-text availability slot for a user.
#[derive(Debug, Clone)]
pub struct AddAvailabilitySlot {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning user.
    pub user_id: i64,
    /// Slot description, e.g. "Tue 14:00-16:00".
    pub slot: String,
}

impl Command for AddAvailabilitySlot {
    fn command_type(&self) -> &'static str {
        "accounts.add_availability_slot"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete one of a user's availability slots.
#[derive(Debug, Clone)]
pub struct DeleteAvailabilitySlot {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning user.
    pub user_id: i64,
    /// The slot to delete.
    pub slot_id: i64,
}

impl Command for DeleteAvailabilitySlot {
    fn command_type(&self) -> &'static str {
        "accounts.delete_availability_slot"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to replace all of a user's availability slots. Empty strings in
/// `slots` are skipped.
#[derive(Debug, Clone)]
pub struct ReplaceAvailability {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning user.
    pub user_id: i64,
    /// The new slot list.
    pub slots: Vec<String>,
}

impl Command for ReplaceAvailability {
    fn command_type(&self) -> &'static str {
        "accounts.replace_availability"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
