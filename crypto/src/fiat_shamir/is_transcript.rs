use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsField;
use lodestark_math::traits::ByteConversion;

/// An append-only public-coin channel.
///
/// Both parties drive an identical transcript: the prover appends its
/// commitments and samples its challenges, the verifier replays the same
/// sequence from the proof and recovers the same challenges.
pub trait IsTranscript<F: IsField>
where
    FieldElement<F>: ByteConversion,
{
    /// Absorbs raw bytes (commitment roots, parameters).
    fn append_bytes(&mut self, new_bytes: &[u8]);

    /// Absorbs the canonical encoding of a field element.
    fn append_field_element(&mut self, element: &FieldElement<F>) {
        self.append_bytes(&element.to_bytes_be());
    }

    /// The current 256-bit digest of everything absorbed so far.
    fn state(&self) -> [u8; 32];

    /// Draws a field element challenge.
    fn sample_field_element(&mut self) -> FieldElement<F>;

    /// Draws an integer challenge in `[0, upper_bound)`.
    fn sample_u64(&mut self, upper_bound: u64) -> u64;
}
