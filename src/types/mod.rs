// Types layer - Database entities, internal domain types and API DTOs
pub mod db;
pub mod dto;
pub mod internal;
