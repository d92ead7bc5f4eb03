use core::marker::PhantomData;

use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsField;

use super::traits::IsMerkleTreeBackend;

/// Transparent backend for unit tests: "hashing" a leaf doubles it and a
/// parent is the sum of its children, so trees stay easy to compute by hand.
#[derive(Debug, Clone, Default)]
pub struct TestBackend<F> {
    phantom: PhantomData<F>,
}

impl<F> IsMerkleTreeBackend for TestBackend<F>
where
    F: IsField,
{
    type Node = FieldElement<F>;
    type Data = FieldElement<F>;

    fn hash_data(leaf: &FieldElement<F>) -> FieldElement<F> {
        leaf + leaf
    }

    fn hash_new_parent(left: &FieldElement<F>, right: &FieldElement<F>) -> FieldElement<F> {
        left + right
    }
}
