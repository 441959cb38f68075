//! Prime-order group arithmetic and its vector and matrix algebra.

mod arith;
mod elements;
mod group_matrix;
mod group_vector;
mod groups;
mod multi_exp;

pub use elements::{GqElement, GroupMember, ZqElement};
pub use group_matrix::GroupMatrix;
pub use group_vector::GroupVector;
pub use groups::{GqGroup, ZqGroup};
pub use multi_exp::{multi_mod_exp, MultiExpBackend, SimultaneousMultiExp};

pub(crate) use arith::{is_probable_prime, mod_inverse};

#[cfg(test)]
pub(crate) use groups::test_groups;
