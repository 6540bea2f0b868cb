//! Request handlers.

pub mod notification;
