//! Shared kernel: the result envelope, identities, entities and the action
//! model that domain types build on.

pub mod action;
pub mod entity;
pub mod history;
pub mod identity;
pub mod outcome;
pub mod persistence;

pub use action::{Action, ActionState, ApplyAction};
pub use entity::Entity;
pub use history::{HasHistory, History};
pub use identity::Identity;
pub use outcome::{Failure, Outcome};
pub use persistence::{ensure_active, Finder, Repository, StoreError};
