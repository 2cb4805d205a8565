//! Core library for gezin, a household organizer.
//!
//! - [`entity`]: the record types (family members, calendar events, shopping,
//!   meals, sleepovers, tasks) with their drafts and patches
//! - [`store`]: remote store clients (REST, Supabase, in-memory)
//! - [`gateway`]: typed per-entity access to a store
//! - [`app_data`]: the in-memory application state and its mutators
//! - [`auth`]: the login session
//! - [`views`]: filtering, sorting, grouping and summary counts

pub mod app_data;
pub mod auth;
pub mod config;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod store;
pub mod views;

pub use app_data::{AppData, Collections, LoadReport, Stored};
pub use config::{Backend, GezinConfig, LoadPolicy};
pub use entity::*;
pub use error::{GezinError, GezinResult};
pub use store::{Health, MemoryStore, RemoteStore, RestStore, SupabaseStore, connect};
