//! ClassMatch — Users, Courses & Availability bounded context.
//!
//! Covers account registration and login, profile management, the course
//! catalog with enrollments, and free-text availability slots.

pub mod application;
pub mod domain;
