//! Error reporting: every failing operation returns a `ListError` and calls
//! the list's handler with `(operation, argument, message)`.

use std::cell::RefCell;
use std::rc::Rc;

use jumplist::{ErrorHandler, JumpList, ListError, default_handler, merge};
use tracing_test::traced_test;

// =============================================================================
// Helpers
// =============================================================================

type Calls = Rc<RefCell<Vec<(String, String, String)>>>;

fn recorder() -> (ErrorHandler, Calls) {
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let sink = calls.clone();
    let handler: ErrorHandler = Rc::new(move |op: &str, arg: &str, msg: &str| {
        sink.borrow_mut()
            .push((op.to_string(), arg.to_string(), msg.to_string()));
    });
    (handler, calls)
}

fn recorded_list(n: i32) -> (JumpList<i32>, Calls) {
    let mut list: JumpList<i32> = (0..n).collect();
    let (handler, calls) = recorder();
    list.set_error_handler(handler);
    (list, calls)
}

fn call(op: &str, arg: &str, msg: &str) -> (String, String, String) {
    (op.to_string(), arg.to_string(), msg.to_string())
}

// =============================================================================
// Per-operation reports
// =============================================================================

#[test]
fn get_past_end() {
    let (mut list, calls) = recorded_list(5);
    assert_eq!(
        list.get(5),
        Err(ListError::IndexOutOfRange { index: 5, size: 5 })
    );
    assert_eq!(
        calls.borrow().as_slice(),
        &[call("get", "(5)", "Index 5 out of range for list of size 5")]
    );
}

#[test]
fn remove_on_empty_is_out_of_range() {
    let (mut list, calls) = recorded_list(0);
    assert_eq!(
        list.remove(0),
        Err(ListError::IndexOutOfRange { index: 0, size: 0 })
    );
    assert_eq!(calls.borrow()[0].0, "remove");
    assert_eq!(calls.borrow()[0].1, "(0)");
}

#[test]
fn pop_on_empty() {
    let (mut list, calls) = recorded_list(0);
    assert_eq!(list.pop(), Err(ListError::EmptySequence));
    assert_eq!(
        calls.borrow().as_slice(),
        &[call("pop", "NA", "List contains no items")]
    );
}

#[test]
fn insert_and_split_bounds() {
    let (mut list, calls) = recorded_list(3);
    assert!(list.insert(3, 9).is_ok());
    assert!(list.insert(5, 9).is_err());
    assert!(list.split(4).is_ok());
    assert!(list.split(5).is_err());
    let ops: Vec<String> = calls.borrow().iter().map(|c| c.0.clone()).collect();
    assert_eq!(ops, vec!["insert", "split"]);
    assert_eq!(list.len(), 4);
}

#[test]
fn merge_without_target() {
    let (handler, calls) = recorder();
    let mut other: JumpList<i32> = (0..3).collect();
    other.set_error_handler(handler);
    assert_eq!(merge(None, Some(&mut other)), Err(ListError::NullArgument));
    assert_eq!(
        calls.borrow().as_slice(),
        &[call("merge", "NA", "Given list was absent")]
    );
}

#[test]
fn successful_operations_stay_silent() {
    let (mut list, calls) = recorded_list(2_500);
    list.get(1_234).unwrap();
    list.insert(0, -1).unwrap();
    list.remove(10).unwrap();
    list.pop().unwrap();
    list.sort();
    let mut tail = list.split(1_000).unwrap();
    list.merge(&mut tail).unwrap();
    let _ = list.filter(|v| *v > 0).unwrap();
    assert!(calls.borrow().is_empty());
}

// =============================================================================
// Handler management
// =============================================================================

#[test]
fn set_handler_returns_previous() {
    let mut list: JumpList<i32> = JumpList::new();
    let (first, first_calls) = recorder();
    let (second, second_calls) = recorder();

    list.set_error_handler(first);
    let _ = list.pop();
    let previous = list.set_error_handler(second);
    let _ = list.pop();
    previous("manual", "NA", "direct call");

    assert_eq!(first_calls.borrow().len(), 2);
    assert_eq!(first_calls.borrow()[1].0, "manual");
    assert_eq!(second_calls.borrow().len(), 1);
}

#[test]
fn derived_lists_inherit_handler() {
    let (mut list, calls) = recorded_list(10);
    let mut tail = list.split(5).unwrap();
    let mut evens = list.filter(|v| v % 2 == 0).unwrap();
    let mut odds = list.split_where(|v| v % 2 == 1).unwrap();
    let _ = tail.get(100);
    let _ = evens.get(100);
    let _ = odds.get(100);
    assert_eq!(calls.borrow().len(), 3);
}

// =============================================================================
// Default handler
// =============================================================================

#[test]
#[traced_test]
fn default_handler_logs() {
    let mut list: JumpList<i32> = JumpList::new();
    assert_eq!(list.pop(), Err(ListError::EmptySequence));
    assert!(logs_contain("list error"));
    assert!(logs_contain("List contains no items"));
}

#[test]
#[traced_test]
fn default_handler_can_be_called_directly() {
    let handler = default_handler();
    handler("get", "(7)", "Index 7 out of range for list of size 2");
    assert!(logs_contain("Index 7 out of range"));
}
