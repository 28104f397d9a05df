//! API handlers

pub mod completion;
pub mod health;
pub mod wiki;
