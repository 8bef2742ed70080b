//! Red-black ordered map for Rust.
//!
//! This crate provides [`RbTreeMap`], an ordered associative container backed
//! by a red-black binary search tree with O(log n) search, insert and delete,
//! plus the ordered queries a balanced tree makes cheap:
//!
//! - [`first_key_value`](RbTreeMap::first_key_value) /
//!   [`last_key_value`](RbTreeMap::last_key_value) - the extreme entries
//! - [`ceiling_entry`](RbTreeMap::ceiling_entry) /
//!   [`floor_entry`](RbTreeMap::floor_entry) - the nearest entry at or
//!   beyond a probe key
//! - [`range`](RbTreeMap::range) - lazy iteration over any key sub-range
//!
//! # Example
//!
//! ```
//! use garnet_tree::RbTreeMap;
//!
//! let mut scores = RbTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Standard map operations work as expected
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Ordered queries (O(log n))
//! assert_eq!(scores.first_key_value(), Some((&"Alice", &100)));
//! assert_eq!(scores.ceiling_key(&"Ben"), Some(&"Bob"));
//!
//! // Sorted iteration
//! let names: Vec<_> = scores.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Familiar API** - Mirrors `std::collections::BTreeMap` where the two overlap
//! - **No unsafe code** - Nodes live in an index arena; parent/child links are
//!   handles, not pointers
//!
//! # Implementation
//!
//! The tree is the classic red-black construction: every node is red or
//! black, the root is black, red nodes have black children, and every path
//! from a node down to a leaf crosses the same number of black nodes. Those
//! rules bound the height at 2 log(n + 1), and insert/delete restore them
//! with at most a constant number of local rotations plus recoloring.
//!
//! Leaf positions hold a single shared sentinel node rather than an absent
//! pointer, so the fix-up routines never branch on a missing child. All
//! nodes, the sentinel included, live in one arena indexed by compact
//! handles, which sidesteps the reference-cycle problem a parent/child graph
//! poses for ownership without reaching for `Rc` or raw pointers.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

extern crate alloc;

mod raw;

pub mod rbtree_map;

pub use rbtree_map::RbTreeMap;
