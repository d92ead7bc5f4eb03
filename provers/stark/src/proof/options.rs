use crate::errors::ConfigurationError;
use crate::traits::AIR;

pub const MAX_EXTENSION_FACTOR: usize = 32;
pub const MAX_EXE_QUERY_COUNT: usize = 128;
pub const MAX_FRI_QUERY_COUNT: usize = 64;
pub const MAX_REMAINDER_THRESHOLD: usize = 256;

/// 256-bit hash primitive backing commitments and the transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Blake2s256,
}

/// Public proof parameters. Both parties must agree on every knob; all of
/// them are absorbed into the transcript seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofOptions {
    pub hash_algorithm: HashAlgorithm,
    /// Ratio `E` between the evaluation domain and the trace length.
    pub extension_factor: usize,
    /// Number of spot checks of the constraint composition.
    pub exe_query_count: usize,
    /// Number of FRI fold checks.
    pub fri_query_count: usize,
    /// FRI folding factor `f`.
    pub fri_folding_factor: usize,
    /// Largest FRI layer shipped verbatim instead of folded further.
    pub fri_remainder_threshold: usize,
}

impl Default for ProofOptions {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Sha256,
            extension_factor: 8,
            exe_query_count: 80,
            fri_query_count: 40,
            fri_folding_factor: 4,
            fri_remainder_threshold: 256,
        }
    }
}

impl ProofOptions {
    /// Small query counts to keep test proofs quick; sound parameters come
    /// from [`ProofOptions::default`].
    pub fn default_for_testing() -> Self {
        Self {
            exe_query_count: 16,
            fri_query_count: 8,
            ..Self::default()
        }
    }

    /// Checks every public parameter against the AIR. Runs before any other
    /// work on both the prover and verifier sides.
    pub fn validate<A: AIR>(&self, air: &A) -> Result<(), ConfigurationError> {
        let context = air.context();
        let trace_length = context.trace_length;
        if !trace_length.is_power_of_two() || trace_length < 8 {
            return Err(ConfigurationError::UnsupportedTraceLength(trace_length));
        }

        if context.transition_degrees.is_empty()
            || context.transition_degrees.iter().any(|degree| *degree == 0)
        {
            return Err(ConfigurationError::InvalidConstraintDegrees);
        }

        let exemptions = context.transition_exemptions;
        if exemptions == 0 || exemptions >= trace_length / 2 {
            return Err(ConfigurationError::InvalidTransitionExemptions(exemptions));
        }

        let max_degree = context.max_constraint_degree();
        let min_extension = (2 * max_degree).next_power_of_two().max(4);
        if !self.extension_factor.is_power_of_two()
            || self.extension_factor < min_extension
            || self.extension_factor > MAX_EXTENSION_FACTOR
        {
            return Err(ConfigurationError::InvalidExtensionFactor {
                extension_factor: self.extension_factor,
                max_constraint_degree: max_degree,
            });
        }

        if self.exe_query_count == 0 || self.exe_query_count > MAX_EXE_QUERY_COUNT {
            return Err(ConfigurationError::InvalidQueryCount {
                name: "execution",
                got: self.exe_query_count,
                max: MAX_EXE_QUERY_COUNT,
            });
        }
        if self.fri_query_count == 0 || self.fri_query_count > MAX_FRI_QUERY_COUNT {
            return Err(ConfigurationError::InvalidQueryCount {
                name: "FRI",
                got: self.fri_query_count,
                max: MAX_FRI_QUERY_COUNT,
            });
        }

        if !self.fri_folding_factor.is_power_of_two()
            || self.fri_folding_factor < 2
            || self.fri_folding_factor > 8
        {
            return Err(ConfigurationError::InvalidFoldingFactor(
                self.fri_folding_factor,
            ));
        }

        // The threshold keeps every FRI layer size a multiple of the
        // extension factor, so excluded positions stay aligned through the
        // folds; the cap of 256 is what single-byte framing can ship.
        let min_threshold = self.fri_folding_factor * self.extension_factor;
        if !self.fri_remainder_threshold.is_power_of_two()
            || self.fri_remainder_threshold < min_threshold
            || self.fri_remainder_threshold > MAX_REMAINDER_THRESHOLD
        {
            return Err(ConfigurationError::InvalidRemainderThreshold {
                threshold: self.fri_remainder_threshold,
                folding_factor: self.fri_folding_factor,
                extension_factor: self.extension_factor,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples::simple_fibonacci::{FibonacciAIR, FibonacciPublicInputs};
    use lodestark_math::field::fields::fft_friendly::two_adic_32_prime_field::TwoAdic32FieldElement as FE;

    fn sample_air() -> FibonacciAIR {
        FibonacciAIR::new(
            64,
            FibonacciPublicInputs {
                a0: FE::one(),
                a1: FE::one(),
            },
        )
    }

    #[test]
    fn default_options_validate() {
        assert!(ProofOptions::default().validate(&sample_air()).is_ok());
        assert!(ProofOptions::default_for_testing()
            .validate(&sample_air())
            .is_ok());
    }

    #[test]
    fn non_power_of_two_extension_factor_is_rejected() {
        let options = ProofOptions {
            extension_factor: 6,
            ..ProofOptions::default()
        };
        assert!(matches!(
            options.validate(&sample_air()),
            Err(ConfigurationError::InvalidExtensionFactor { .. })
        ));
    }

    #[test]
    fn oversized_query_counts_are_rejected() {
        let options = ProofOptions {
            exe_query_count: 129,
            ..ProofOptions::default()
        };
        assert!(matches!(
            options.validate(&sample_air()),
            Err(ConfigurationError::InvalidQueryCount { .. })
        ));

        let options = ProofOptions {
            fri_query_count: 0,
            ..ProofOptions::default()
        };
        assert!(matches!(
            options.validate(&sample_air()),
            Err(ConfigurationError::InvalidQueryCount { .. })
        ));
    }

    #[test]
    fn remainder_threshold_below_the_fold_alignment_is_rejected() {
        let options = ProofOptions {
            extension_factor: 32,
            fri_folding_factor: 8,
            fri_remainder_threshold: 128,
            ..ProofOptions::default()
        };
        assert!(matches!(
            options.validate(&sample_air()),
            Err(ConfigurationError::InvalidRemainderThreshold { .. })
        ));
    }
}
