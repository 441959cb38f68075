//! Recursive hashing over typed values with domain separation.

mod hashable;
mod recursive_hash;

pub use hashable::{Hashable, HashableForm};
pub use recursive_hash::HashService;
