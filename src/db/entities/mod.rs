//! Database entities

pub mod recipes;
pub mod users;
