// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Treesort - an AVL-balanced ordered index with per-key occurrence chains.
//!
//! # Quick Start
//!
//! ```
//! use treesort::{Index, Order};
//!
//! // Duplicates share a node and keep their insertion order
//! let mut index: Index<i32> = [5, 3, 8, 3, 1].into_iter().collect();
//! let sorted: Vec<i32> = index.flatten(Order::Ascending).copied().collect();
//! assert_eq!(sorted, vec![1, 3, 3, 5, 8]);
//!
//! // Removing the last occurrence of a key removes its node
//! index.delete(&3);
//! index.delete(&3);
//! assert!(index.search(&3).is_err());
//! ```

pub mod chain;
pub mod error;
pub mod index;
mod render;
pub mod sort;

pub use chain::Chain;
pub use error::{Error, InvariantError};
pub use index::{Flatten, Index, Order};
pub use sort::tree_sort;
