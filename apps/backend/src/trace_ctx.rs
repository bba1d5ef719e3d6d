//! Task-local trace context.
//!
//! `RequestTrace` scopes every request future with a trace id; anything
//! running inside that future (handlers, the workflow runner, store adapters)
//! can read it back for log correlation and problem responses.

use std::cell::RefCell;
use std::future::Future;

use tokio::task_local;

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Trace id of the current task, or `"unknown"` outside a traced scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
        .unwrap_or_else(|| "unknown".to_string())
}

/// Fresh, lexically sortable trace id.
pub fn new_trace_id() -> String {
    ulid::Ulid::new().to_string()
}

/// Run `future` with `trace_id` installed for its whole lifetime.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}
