use core::marker::PhantomData;

use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsField;
use lodestark_math::traits::ByteConversion;
use sha2::{Digest, Sha256};

use super::is_transcript::IsTranscript;

/// Deterministic hash sponge transcript.
///
/// The state is a single digest. Absorbing bytes rehashes `state || bytes`.
/// Challenges hash `state || counter` with a monotone big-endian counter, so
/// repeated draws between absorptions stay distinct without mutating the
/// absorbed state.
pub struct DefaultTranscript<F: IsField, D: Digest = Sha256> {
    state: [u8; 32],
    counter: u64,
    phantom1: PhantomData<F>,
    phantom2: PhantomData<D>,
}

impl<F: IsField, D: Digest> DefaultTranscript<F, D> {
    pub fn new(seed: &[u8]) -> Self {
        let mut state = [0_u8; 32];
        state.copy_from_slice(&D::new().chain_update(seed).finalize());
        Self {
            state,
            counter: 0,
            phantom1: PhantomData,
            phantom2: PhantomData,
        }
    }

    fn challenge_bytes(&mut self) -> [u8; 32] {
        let digest = D::new()
            .chain_update(self.state)
            .chain_update(self.counter.to_be_bytes())
            .finalize();
        self.counter += 1;
        let mut challenge = [0_u8; 32];
        challenge.copy_from_slice(&digest);
        challenge
    }
}

impl<F, D> IsTranscript<F> for DefaultTranscript<F, D>
where
    F: IsField,
    D: Digest,
    FieldElement<F>: ByteConversion,
{
    fn append_bytes(&mut self, new_bytes: &[u8]) {
        let digest = D::new()
            .chain_update(self.state)
            .chain_update(new_bytes)
            .finalize();
        self.state.copy_from_slice(&digest);
    }

    fn state(&self) -> [u8; 32] {
        self.state
    }

    fn sample_field_element(&mut self) -> FieldElement<F> {
        // Fold the challenge bytes into the field, big-endian. The modular
        // reduction of a 256-bit integer leaves negligible bias for the
        // field sizes used here.
        let bytes = self.challenge_bytes();
        let radix = FieldElement::<F>::from(256);
        bytes.iter().fold(FieldElement::zero(), |acc, byte| {
            acc * &radix + FieldElement::from(*byte as u64)
        })
    }

    fn sample_u64(&mut self, upper_bound: u64) -> u64 {
        debug_assert!(upper_bound > 0);
        let bytes = self.challenge_bytes();
        let raw = u64::from_be_bytes(bytes[..8].try_into().expect("eight bytes"));
        raw % upper_bound
    }
}
