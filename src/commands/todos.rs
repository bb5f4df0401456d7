use serde::Deserialize;
use validator::Validate;

use crate::cqs::Command;
use crate::models::{TodoAction, TodoId, TodoState};

/// Creates a pending todo. The id is assigned server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTodoCommand {
    #[serde(skip, default = "TodoId::generate")]
    pub id: TodoId,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
}

impl CreateTodoCommand {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: TodoId::generate(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTodoCommand {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteTodoCommand {
    #[validate(length(min = 1))]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartTodoCommand {
    #[validate(length(min = 1))]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompleteTodoCommand {
    #[validate(length(min = 1))]
    pub id: String,
}

/// A command that moves one todo to a fixed state.
pub trait TodoTransition: Command {
    const ACTION: TodoAction;

    fn todo_id(&self) -> &str;
}

impl TodoTransition for StartTodoCommand {
    const ACTION: TodoAction = TodoAction::new(TodoState::InProgress);

    fn todo_id(&self) -> &str {
        &self.id
    }
}

impl TodoTransition for CompleteTodoCommand {
    const ACTION: TodoAction = TodoAction::new(TodoState::Completed);

    fn todo_id(&self) -> &str {
        &self.id
    }
}

impl Command for CreateTodoCommand {}
impl Command for UpdateTodoCommand {}
impl Command for DeleteTodoCommand {}
impl Command for StartTodoCommand {}
impl Command for CompleteTodoCommand {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payload_gets_generated_id() {
        let first: CreateTodoCommand =
            serde_json::from_str(r#"{"description":"Buy milk"}"#).unwrap();
        let second: CreateTodoCommand =
            serde_json::from_str(r#"{"description":"Buy milk","id":"chosen"}"#).unwrap();
        assert_ne!(first.id, second.id);
        assert_ne!(second.id.as_str(), "chosen");
    }

    #[test]
    fn test_description_is_required() {
        assert!(CreateTodoCommand::new("Buy milk").validate().is_ok());
        assert!(CreateTodoCommand::new("").validate().is_err());

        let update = UpdateTodoCommand {
            id: "t-1".to_string(),
            description: String::new(),
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_transitions_target_expected_states() {
        assert_eq!(StartTodoCommand::ACTION.state(), TodoState::InProgress);
        assert_eq!(CompleteTodoCommand::ACTION.state(), TodoState::Completed);
    }
}
