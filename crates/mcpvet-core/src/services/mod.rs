//! Pure domain services.

pub mod security;
