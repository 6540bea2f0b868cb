//! Domain model structs.
//!
//! Each submodule contains `FromRow` entity structs matching the database
//! row for its table, plus any pure helpers tied to that row shape.

pub mod device;
pub mod notification;
pub mod user;
