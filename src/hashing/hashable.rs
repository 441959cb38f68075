use num_bigint::BigUint;

use crate::math::{GqElement, GqGroup, GroupMatrix, GroupMember, GroupVector, ZqElement};

/// A value the recursive hash can consume.
///
/// The set is closed: byte arrays, non-negative integers, strings and
/// non-empty lists of further hashables. Domain types project into it
/// through [`HashableForm`], which doubles as their canonical
/// serialisation anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hashable {
    ByteArray(Vec<u8>),
    Number(BigUint),
    String(String),
    List(Vec<Hashable>),
}

impl Hashable {
    /// List of the UTF-8 strings in `items`, typically auxiliary
    /// information attached to a proof.
    pub fn from_strings<S: AsRef<str>>(items: &[S]) -> Hashable {
        Hashable::List(
            items
                .iter()
                .map(|s| Hashable::String(s.as_ref().to_owned()))
                .collect(),
        )
    }
}

impl From<Vec<u8>> for Hashable {
    fn from(bytes: Vec<u8>) -> Self {
        Hashable::ByteArray(bytes)
    }
}

impl From<&[u8]> for Hashable {
    fn from(bytes: &[u8]) -> Self {
        Hashable::ByteArray(bytes.to_vec())
    }
}

impl From<BigUint> for Hashable {
    fn from(n: BigUint) -> Self {
        Hashable::Number(n)
    }
}

impl From<u64> for Hashable {
    fn from(n: u64) -> Self {
        Hashable::Number(BigUint::from(n))
    }
}

impl From<&str> for Hashable {
    fn from(s: &str) -> Self {
        Hashable::String(s.to_owned())
    }
}

impl From<String> for Hashable {
    fn from(s: String) -> Self {
        Hashable::String(s)
    }
}

impl From<Vec<Hashable>> for Hashable {
    fn from(items: Vec<Hashable>) -> Self {
        Hashable::List(items)
    }
}

/// Projection of a domain type into the closed [`Hashable`] set.
pub trait HashableForm {
    fn to_hashable_form(&self) -> Hashable;
}

impl HashableForm for Hashable {
    fn to_hashable_form(&self) -> Hashable {
        self.clone()
    }
}

impl HashableForm for GqElement {
    fn to_hashable_form(&self) -> Hashable {
        Hashable::Number(self.value().clone())
    }
}

impl HashableForm for ZqElement {
    fn to_hashable_form(&self) -> Hashable {
        Hashable::Number(self.value().clone())
    }
}

impl HashableForm for GqGroup {
    /// The domain parameters `(p, q, g)`, the template every proof
    /// challenge starts from.
    fn to_hashable_form(&self) -> Hashable {
        Hashable::List(vec![
            Hashable::Number(self.p().clone()),
            Hashable::Number(self.q().clone()),
            Hashable::Number(self.g().clone()),
        ])
    }
}

impl<E> HashableForm for GroupVector<E>
where
    E: GroupMember + HashableForm,
{
    fn to_hashable_form(&self) -> Hashable {
        Hashable::List(self.iter().map(HashableForm::to_hashable_form).collect())
    }
}

impl<E> HashableForm for GroupMatrix<E>
where
    E: GroupMember + HashableForm,
{
    /// Rows in index order, each row a list: row-major, matching the
    /// storage layout.
    fn to_hashable_form(&self) -> Hashable {
        Hashable::List(
            (0..self.n_rows())
                .map(|i| Hashable::List(self.row_iter(i).map(|e| e.to_hashable_form()).collect()))
                .collect(),
        )
    }
}
