#![doc = "The `todoflow` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain kernel, the command/query dispatch core, the todo,"]
#![doc = "client and membership models with their handlers, the document-store adapters,"]
#![doc = "routing configuration, and error handling for the Todoflow application."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod commands;
pub mod config;
pub mod cqs;
pub mod error;
pub mod handlers;
pub mod kernel;
pub mod mail;
pub mod models;
pub mod queries;
pub mod routes;
pub mod store;
pub mod time;

pub use crate::error::AppError;
pub use crate::handlers::{build_dispatch, Dependencies, Dispatch};
