// DTO layer - API request/response shapes
pub mod admin;
pub mod auth;
pub mod common;
pub mod user;
