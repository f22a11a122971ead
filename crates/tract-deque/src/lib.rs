// Ring buffer slots are shared between the owner and thieves
#![allow(unsafe_code)]

//! Bounded work-stealing deque.
//!
//! A fixed-capacity ring buffer with two atomic indices:
//!
//! ```text
//!            head                      tail
//!             │                         │
//!   ┌───┬───┬─▼─┬───┬───┬───┬───┬───┬───▼───┐
//!   │   │   │ a │ b │ c │ d │ e │   │       │
//!   └───┴───┴───┴───┴───┴───┴───┴───┴───────┘
//!             ▲                   ▲
//!        thieves steal       owner pushes and
//!        oldest (FIFO)       pops newest (LIFO)
//! ```
//!
//! The owning [`Worker`] is the only handle that can push or pop; it is
//! `Send` but not `Sync`, so exactly one thread ever touches `tail`.
//! [`Stealer`] handles are cheap to clone and claim items from `head` with a
//! compare-and-swap.
//!
//! Capacity never grows. A push into a full deque returns
//! [`DequeError::CapacityExhausted`].
//!
//! # Example
//!
//! ```
//! use tract_deque::Worker;
//!
//! let worker = Worker::new_default();
//! let stealer = worker.stealer();
//!
//! worker.push(1).unwrap();
//! worker.push(2).unwrap();
//! worker.push(3).unwrap();
//!
//! assert_eq!(stealer.steal(), Some(1));
//! assert_eq!(worker.pop(), Some(3));
//! assert_eq!(worker.pop(), Some(2));
//! assert_eq!(worker.pop(), None);
//! ```

mod deque;
mod error;

pub use deque::{DEFAULT_CAPACITY, Stealer, Worker};
pub use error::DequeError;
