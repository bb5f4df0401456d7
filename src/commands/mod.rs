//! Commands: validated requests that change state.

pub mod todos;
pub mod users;

pub use todos::{
    CompleteTodoCommand, CreateTodoCommand, DeleteTodoCommand, StartTodoCommand, TodoTransition,
    UpdateTodoCommand,
};
pub use users::{
    ConfirmEmailCommand, CreatePasswordCommand, ForgotPasswordCommand, RegisterUserCommand,
    ResetPasswordCommand,
};
