use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use tokio_util::sync::CancellationToken;

use crate::kernel::{
    Action, ActionState, ApplyAction, Entity, Failure, Finder, HasHistory, History, StoreError,
};

crate::typed_identity!(
    /// Identifier of a [`Todo`].
    TodoId
);

/// The state of a todo.
/// Stored and exchanged as `"Pending"`, `"In Progress"` or `"Completed"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum TodoState {
    /// Created, not started yet.
    Pending,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
}

impl ActionState for TodoState {
    const INVALID_MESSAGE: &'static str = "Todo state value is invalid.";

    fn all() -> &'static [Self] {
        &[TodoState::Pending, TodoState::InProgress, TodoState::Completed]
    }

    fn as_str(&self) -> &'static str {
        match self {
            TodoState::Pending => "Pending",
            TodoState::InProgress => "In Progress",
            TodoState::Completed => "Completed",
        }
    }
}

impl TodoState {
    /// Validates `value` against the three canonical states.
    pub fn new(value: &str) -> Result<Self, Failure> {
        Self::parse(value)
    }
}

impl TryFrom<String> for TodoState {
    type Error = Failure;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TodoState::parse(&value)
    }
}

impl From<TodoState> for &'static str {
    fn from(state: TodoState) -> Self {
        state.as_str()
    }
}

impl fmt::Display for TodoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested state transition for a todo.
pub type TodoAction = Action<TodoState>;

/// A todo item, persisted as a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    id: TodoId,
    description: String,
    state: TodoState,
    is_done: bool,
    #[serde(flatten)]
    history: History,
}

impl Todo {
    /// Creates a pending todo. The creation time is stamped.
    pub fn new(id: TodoId, description: impl Into<String>) -> Self {
        let mut todo = Self {
            id,
            description: description.into(),
            state: TodoState::Pending,
            is_done: false,
            history: History::default(),
        };
        todo.set_as_created();
        todo
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> TodoState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub fn change_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.set_as_modified();
    }
}

impl ApplyAction<TodoState> for Todo {
    // No transition guards: any state may follow any other.
    fn apply_action(&mut self, action: TodoAction) {
        let state = action.state();
        self.is_done = state == TodoState::Completed;
        self.state = state;
        self.set_as_modified();
    }
}

impl Entity for Todo {
    type Id = TodoId;
    type Key<'a> = &'a TodoId;

    fn id(&self) -> &TodoId {
        &self.id
    }

    fn identity_key(&self) -> Self::Key<'_> {
        &self.id
    }
}

crate::entity_equality!(Todo);

impl HasHistory for Todo {
    fn history(&self) -> &History {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }
}

/// Read side for todos.
#[async_trait]
pub trait TodoFinder: Finder<Todo> {
    /// Every stored todo. Unbounded.
    async fn all(&self, cancel: &CancellationToken) -> Result<Vec<Todo>, StoreError>;
}

/// Read model returned by todo queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResult {
    pub id: String,
    pub description: String,
    pub state: String,
    pub is_done: bool,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl From<&Todo> for TodoResult {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id().to_string(),
            description: todo.description().to_string(),
            state: todo.state().to_string(),
            is_done: todo.is_done(),
            created: todo.created(),
            modified: todo.modified(),
        }
    }
}
