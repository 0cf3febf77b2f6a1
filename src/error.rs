//! Error taxonomy and the per-list error callback.
//!
//! Every fallible operation on a [`JumpList`](crate::JumpList) does two things
//! when it fails: it calls the list's [`ErrorHandler`] with three descriptive
//! strings, then returns the matching [`ListError`] to the caller. Validation
//! happens before any mutation, so a failed call never leaves a list half
//! edited.

use std::rc::Rc;

use thiserror::Error;

/// Callback invoked with `(operation, argument, message)` whenever a list
/// operation fails. The return value of the callback is not consulted.
pub type ErrorHandler = Rc<dyn Fn(&str, &str, &str)>;

/// Failure of a list operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// A list handle was required but absent.
    #[error("Given list was absent")]
    NullArgument,
    /// The index is `>= size` (or `> size` for insert and split).
    #[error("Index {index} out of range for list of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    /// Pop attempted on a list with no elements.
    #[error("List contains no items")]
    EmptySequence,
    /// A node, list or jump table array could not be allocated.
    #[error("Memory allocation error")]
    AllocationFailure,
}

impl ListError {
    /// The offending argument as shown to error handlers.
    pub fn argument(&self) -> String {
        match self {
            ListError::IndexOutOfRange { index, .. } => format!("({index})"),
            _ => "NA".to_string(),
        }
    }
}

/// The handler new lists start with. Emits a `tracing` error event.
pub fn default_handler() -> ErrorHandler {
    Rc::new(log_error)
}

fn log_error(operation: &str, argument: &str, message: &str) {
    tracing::error!(operation, argument, "list error: {message}");
}

/// Run `handler` for `error` and hand the error back for propagation.
pub(crate) fn report(handler: &ErrorHandler, operation: &str, error: ListError) -> ListError {
    handler(operation, &error.argument(), &error.to_string());
    error
}
