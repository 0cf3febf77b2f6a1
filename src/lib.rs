//! Jumplist - a doubly-linked sequence with fast indexed access.
//!
//! Appends are amortized O(1), and `get` is close to O(1) in practice: a
//! sparse jump table holds a node every 1000 positions and a cursor
//! remembers the last node reached, so resolving an index walks at most
//! half a table increment, and usually a single link for sequential scans.
//! Ordered insert and remove, split, merge, filtering and a stable in-place
//! merge sort round out the API.
//!
//! # Quick Start
//!
//! ```
//! use jumplist::JumpList;
//!
//! let mut list = JumpList::new();
//! for i in 0..10_001 {
//!     list.add(i).unwrap();
//! }
//! assert_eq!(*list.get(5000).unwrap(), 5000);
//! assert_eq!(list.jump_value(5), Some(&5000));
//!
//! list.insert(0, -1).unwrap();
//! assert_eq!(list.remove(0), Ok(-1));
//!
//! let mut tail = list.split(10_000).unwrap();
//! assert_eq!(tail.len(), 1);
//! list.merge(&mut tail).unwrap();
//! assert_eq!(list.len(), 10_001);
//! ```
//!
//! # Errors
//!
//! Fallible operations return [`ListError`] and also call the list's
//! [`ErrorHandler`] with `(operation, argument, message)`. The default
//! handler logs through `tracing`.

mod compare;
mod config;
mod error;
mod list;

pub use compare::{Comparator, FnComparator, NaturalOrder};
pub use config::{Config, INITIAL_TABLE_CAPACITY, JUMP_INCREMENT};
pub use error::{ErrorHandler, ListError, default_handler};
pub use list::{IntoIter, Iter, JumpList, ReleaseHook, merge};
