use lodestark_crypto::merkle_tree::batch::BatchProof;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsField;

use crate::config::Commitment;

/// Opened leaves of one commitment plus the batch Merkle proof backing them.
/// The opened positions are not stored: the verifier re-derives them from
/// the transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOpening<F: IsField> {
    /// One row per opened position, in ascending position order.
    pub values: Vec<Vec<FieldElement<F>>>,
    pub proof: BatchProof<Commitment>,
}

/// One FRI layer's contribution to the proof: the layer root and the opened
/// cosets feeding the fold checks. The first layer's root is the composition
/// root repeated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FriLayerProof<F: IsField> {
    pub root: Commitment,
    pub opening: BatchOpening<F>,
}

/// A complete serialized-form STARK proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarkProof<F: IsField> {
    pub trace_root: Commitment,
    pub composition_root: Commitment,
    /// Trace rows opened at every execution query index and its
    /// next-in-base-domain neighbour.
    pub trace_opening: BatchOpening<F>,
    /// Composition values opened at the execution query indices.
    pub composition_opening: BatchOpening<F>,
    /// One entry per FRI fold, each opening the source layer's cosets.
    pub fri_layers: Vec<FriLayerProof<F>>,
    /// The final FRI layer, shipped verbatim.
    pub remainder: Vec<FieldElement<F>>,
}
