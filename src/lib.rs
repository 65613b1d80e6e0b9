#![doc = "The `tasknest` library crate."]
#![doc = ""]
#![doc = "Per-user task management over HTTP: account registration, session-based"]
#![doc = "authentication, and task CRUD where every task is visible only to its owner."]
#![doc = "The binary (`main.rs`) wires these modules into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
