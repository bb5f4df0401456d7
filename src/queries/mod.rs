//! Queries: read requests and the result types they resolve to.

pub mod clients;
pub mod todos;
pub mod users;

pub use clients::{ValidateClientQuery, ValidateClientRedirectUriQuery, ValidateClientResult};
pub use todos::{AllTodosQuery, TodoByIdQuery};
pub use users::{LoginResult, UserByNameQuery, UserInfoQuery, UserNamePasswordLoginQuery};
