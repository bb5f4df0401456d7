use serde::Deserialize;

use crate::cqs::Query;
use crate::models::TodoResult;

#[derive(Debug, Clone, Deserialize)]
pub struct TodoByIdQuery {
    pub id: String,
}

impl Query for TodoByIdQuery {
    type Output = Option<TodoResult>;
}

/// Every todo, in no particular order.
#[derive(Debug, Clone, Default)]
pub struct AllTodosQuery;

impl Query for AllTodosQuery {
    type Output = Vec<TodoResult>;
}
