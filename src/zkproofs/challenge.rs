use std::sync::Arc;

use crate::error::CryptoResult;
use crate::hashing::{Hashable, HashService, HashableForm};
use crate::math::{ZqElement, ZqGroup};

/// Ordered builder for a Fiat-Shamir hash list.
///
/// Each proof's challenge consumes a long, order-sensitive list of
/// hashables; assembling it through this builder keeps the protocol
/// definition and the code in one-to-one correspondence. The same
/// builder calls appear verbatim in `gen` and `verify`.
#[derive(Debug, Default)]
pub struct ChallengeContext {
    items: Vec<Hashable>,
}

impl ChallengeContext {
    pub fn new() -> Self {
        ChallengeContext { items: Vec::new() }
    }

    /// Appends the hashable form of `value`.
    pub fn push(mut self, value: &impl HashableForm) -> Self {
        self.items.push(value.to_hashable_form());
        self
    }

    /// Appends an already-built hashable.
    pub fn push_raw(mut self, value: Hashable) -> Self {
        self.items.push(value);
        self
    }

    /// Appends the auxiliary list `(tag)` or `(tag, aux₀, aux₁, …)`;
    /// the caller's strings are only included when present.
    pub fn tagged_aux<S: AsRef<str>>(mut self, tag: &str, aux: &[S]) -> Self {
        let mut list = Vec::with_capacity(1 + aux.len());
        list.push(Hashable::String(tag.to_owned()));
        list.extend(aux.iter().map(|s| Hashable::String(s.as_ref().to_owned())));
        self.items.push(Hashable::List(list));
        self
    }

    /// Derives the challenge in `Zq` from the accumulated list.
    pub fn derive(self, hash: &HashService, group: &Arc<ZqGroup>) -> CryptoResult<ZqElement> {
        hash.recursive_hash_to_zq(group, &self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::test_groups::toy_gq;
    use crate::math::GqElement;

    #[test]
    fn identical_builders_derive_identical_challenges() {
        let hash = HashService::new();
        let group = toy_gq();
        let zq = ZqGroup::same_order_as(&group);
        let y = GqElement::generator(&group);
        let build = || {
            ChallengeContext::new()
                .push(group.as_ref())
                .push(&y)
                .tagged_aux("TestProof", &["aux"])
        };
        let a = build().derive(&hash, &zq).unwrap();
        let b = build().derive(&hash, &zq).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_aux_omits_the_caller_strings() {
        let hash = HashService::new();
        let zq = ZqGroup::same_order_as(&toy_gq());
        let tagged_only = ChallengeContext::new()
            .tagged_aux::<&str>("TestProof", &[])
            .derive(&hash, &zq)
            .unwrap();
        let manual = ChallengeContext::new()
            .push_raw(Hashable::List(vec![Hashable::from("TestProof")]))
            .derive(&hash, &zq)
            .unwrap();
        assert_eq!(tagged_only, manual);
    }

    #[test]
    fn order_matters() {
        let hash = HashService::new();
        let zq = ZqGroup::same_order_as(&toy_gq());
        let ab = ChallengeContext::new()
            .push_raw(Hashable::from("a"))
            .push_raw(Hashable::from("b"))
            .derive(&hash, &zq)
            .unwrap();
        let ba = ChallengeContext::new()
            .push_raw(Hashable::from("b"))
            .push_raw(Hashable::from("a"))
            .derive(&hash, &zq)
            .unwrap();
        assert_ne!(ab, ba);
    }
}
