use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use super::elements::{GqElement, GroupMember, ZqElement};
use super::multi_exp::multi_mod_exp;
use crate::error::{CryptoError, CryptoResult};

/// An immutable ordered sequence of elements sharing one group.
#[derive(Clone)]
pub struct GroupVector<E: GroupMember> {
    elements: Vec<E>,
    group: Arc<E::Group>,
}

impl<E: GroupMember> GroupVector<E> {
    /// Builds a vector from a non-empty element list, taking the group
    /// from the first element and checking the rest against it.
    pub fn from_elements(elements: Vec<E>) -> CryptoResult<Self> {
        let first = elements.first().ok_or(CryptoError::EmptyWithoutGroup)?;
        let group = Arc::clone(first.group());
        if elements.iter().any(|e| e.group().as_ref() != group.as_ref()) {
            return Err(CryptoError::invalid(
                "all vector elements must belong to the same group",
            ));
        }
        Ok(GroupVector { elements, group })
    }

    /// Builds a possibly empty vector; the group must be supplied
    /// explicitly so that emptiness never erases it.
    pub fn from_elements_with_group(elements: Vec<E>, group: &Arc<E::Group>) -> CryptoResult<Self> {
        if elements.iter().any(|e| e.group().as_ref() != group.as_ref()) {
            return Err(CryptoError::invalid(
                "all vector elements must belong to the supplied group",
            ));
        }
        Ok(GroupVector {
            elements,
            group: Arc::clone(group),
        })
    }

    pub fn empty(group: &Arc<E::Group>) -> Self {
        GroupVector {
            elements: Vec::new(),
            group: Arc::clone(group),
        }
    }

    pub fn group(&self) -> &Arc<E::Group> {
        &self.group
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, i: usize) -> &E {
        &self.elements[i]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.elements
    }

    /// A new vector with `element` appended.
    pub fn append(&self, element: E) -> GroupVector<E> {
        assert_eq!(
            element.group().as_ref(),
            self.group.as_ref(),
            "appended element must belong to the vector's group"
        );
        let mut elements = self.elements.clone();
        elements.push(element);
        GroupVector {
            elements,
            group: Arc::clone(&self.group),
        }
    }

    /// A new vector with `element` prepended.
    pub fn prepend(&self, element: E) -> GroupVector<E> {
        assert_eq!(
            element.group().as_ref(),
            self.group.as_ref(),
            "prepended element must belong to the vector's group"
        );
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.push(element);
        elements.extend_from_slice(&self.elements);
        GroupVector {
            elements,
            group: Arc::clone(&self.group),
        }
    }

    /// Concatenation of `self` and `other`, in order.
    pub fn concat(&self, other: &GroupVector<E>) -> GroupVector<E> {
        assert_eq!(
            self.group.as_ref(),
            other.group.as_ref(),
            "concatenated vectors must share one group"
        );
        let mut elements = self.elements.clone();
        elements.extend_from_slice(&other.elements);
        GroupVector {
            elements,
            group: Arc::clone(&self.group),
        }
    }

    /// The elements in `[from, to)`.
    pub fn subvector(&self, from: usize, to: usize) -> GroupVector<E> {
        GroupVector {
            elements: self.elements[from..to].to_vec(),
            group: Arc::clone(&self.group),
        }
    }
}

impl<E: GroupMember> Index<usize> for GroupVector<E> {
    type Output = E;

    fn index(&self, i: usize) -> &E {
        &self.elements[i]
    }
}

impl<E: GroupMember> PartialEq for GroupVector<E> {
    fn eq(&self, other: &Self) -> bool {
        self.group.as_ref() == other.group.as_ref() && self.elements == other.elements
    }
}

impl<E: GroupMember> Eq for GroupVector<E> {}

impl<E: GroupMember> fmt::Debug for GroupVector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elements.iter()).finish()
    }
}

impl<E: GroupMember> IntoIterator for GroupVector<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, E: GroupMember> IntoIterator for &'a GroupVector<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl GroupVector<ZqElement> {
    /// Element-wise sum. Panics on length or group mismatch.
    pub fn add(&self, other: &GroupVector<ZqElement>) -> GroupVector<ZqElement> {
        assert_eq!(self.len(), other.len(), "vector sizes must match");
        let elements = self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| a.add(b))
            .collect();
        GroupVector {
            elements,
            group: Arc::clone(&self.group),
        }
    }

    /// Element-wise product (Hadamard). Panics on length or group mismatch.
    pub fn hadamard(&self, other: &GroupVector<ZqElement>) -> GroupVector<ZqElement> {
        assert_eq!(self.len(), other.len(), "vector sizes must match");
        let elements = self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| a.multiply(b))
            .collect();
        GroupVector {
            elements,
            group: Arc::clone(&self.group),
        }
    }

    /// Every element scaled by `scalar`.
    pub fn scalar_multiply(&self, scalar: &ZqElement) -> GroupVector<ZqElement> {
        let elements = self.iter().map(|a| a.multiply(scalar)).collect();
        GroupVector {
            elements,
            group: Arc::clone(&self.group),
        }
    }

    /// `Σ elementᵢ mod q`; zero for the empty vector.
    pub fn sum(&self) -> ZqElement {
        self.iter()
            .fold(ZqElement::zero(&self.group), |acc, e| acc.add(e))
    }

    /// `∏ elementᵢ mod q`; one for the empty vector.
    pub fn product(&self) -> ZqElement {
        self.iter()
            .fold(ZqElement::one(&self.group), |acc, e| acc.multiply(e))
    }
}

impl GroupVector<GqElement> {
    /// Element-wise product. Panics on length or group mismatch.
    pub fn entrywise_multiply(&self, other: &GroupVector<GqElement>) -> GroupVector<GqElement> {
        assert_eq!(self.len(), other.len(), "vector sizes must match");
        let elements = self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| a.multiply(b))
            .collect();
        GroupVector {
            elements,
            group: Arc::clone(&self.group),
        }
    }

    /// Every element raised to the same `exponent`.
    pub fn exponentiate(&self, exponent: &ZqElement) -> GroupVector<GqElement> {
        let elements = self.iter().map(|a| a.exponentiate(exponent)).collect();
        GroupVector {
            elements,
            group: Arc::clone(&self.group),
        }
    }

    /// Element-wise exponentiation by a vector of the same length.
    pub fn entrywise_exponentiate(
        &self,
        exponents: &GroupVector<ZqElement>,
    ) -> GroupVector<GqElement> {
        assert_eq!(self.len(), exponents.len(), "vector sizes must match");
        let elements = self
            .iter()
            .zip(exponents.iter())
            .map(|(a, e)| a.exponentiate(e))
            .collect();
        GroupVector {
            elements,
            group: Arc::clone(&self.group),
        }
    }

    /// `∏ selfᵢ^exponentsᵢ` through the simultaneous-exponentiation
    /// fast path. Panics on length or order mismatch.
    pub fn multi_exponentiate(&self, exponents: &GroupVector<ZqElement>) -> GqElement {
        assert_eq!(self.len(), exponents.len(), "vector sizes must match");
        if let Some(e) = exponents.iter().next() {
            assert_eq!(
                e.group().q(),
                self.group.q(),
                "exponents must come from the Zq group of the same order"
            );
        }
        let bases: Vec<_> = self.iter().map(|b| b.value().clone()).collect();
        let exps: Vec<_> = exponents.iter().map(|e| e.value().clone()).collect();
        let value = multi_mod_exp(&bases, &exps, self.group.p());
        GqElement::create(value, &self.group)
            .expect("a product of group members stays in the group")
    }

    /// `∏ selfᵢ`; identity for the empty vector.
    pub fn product(&self) -> GqElement {
        self.iter()
            .fold(GqElement::identity(&self.group), |acc, e| acc.multiply(e))
    }
}
