//! Ready queues for reactor-driven output producers.
//!
//! Three layers, each built on the previous one:
//!
//! 1. [`ReadyQueue`]: single-threaded `front`/`pending` structure with the
//!    terminator protocol
//! 2. [`ThreadSafeReadyQueue`]: one lock around every call, for registration
//!    from worker threads
//! 3. [`PriorityReadyQueue`]: stream cancellation and weight/dependency
//!    ordered insertion for multiplexed connections
//!
//! ## Reactor loop
//!
//! ```
//! use std::sync::Arc;
//! use readyq::{Entry, PriorityReadyQueue, Producer};
//!
//! struct Body(&'static str);
//!
//! impl Producer for Body {
//!     fn ready(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let queue = PriorityReadyQueue::new();
//! queue.append(Entry::Plain(Arc::new(Body("hello"))));
//! queue.append(Entry::Terminator);
//!
//! let mut closed = false;
//! while queue.length() == 1 {
//!     let Some(entry) = queue.peek(0) else { continue };
//!     match entry.producer() {
//!         Some(body) => assert_eq!(body.0, "hello"),
//!         None => closed = true,
//!     }
//!     queue.pop_front();
//! }
//! assert!(closed);
//! ```

pub mod entry;
pub mod priority;
pub mod ready;
pub mod sync;

pub use entry::{Entry, Prioritized, Readiness};
pub use priority::PriorityReadyQueue;
pub use ready::{DrainReady, ReadyQueue};
pub use sync::ThreadSafeReadyQueue;
