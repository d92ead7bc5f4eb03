use lodestark_math::fft::cpu::roots_of_unity::get_power_cycle;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsFFTField;

use crate::errors::ConfigurationError;
use crate::proof::options::ProofOptions;
use crate::traits::AIR;

/// Maximum evaluation domain size, independent of the field's two-adicity.
pub const MAX_DOMAIN_SIZE: usize = 1 << 32;

/// The cyclic evaluation domains of one proof: the base (trace) domain of
/// size `S` and the extended domain of size `N = S · E`, both plain
/// power-of-two subgroups of the field's roots of unity.
pub struct Domain<F: IsFFTField> {
    pub root_order: u32,
    pub lde_root_order: u32,
    pub blowup_factor: usize,
    pub interpolation_domain_size: usize,
    pub lde_domain_size: usize,
    pub trace_primitive_root: FieldElement<F>,
    pub lde_primitive_root: FieldElement<F>,
    pub trace_roots_of_unity: Vec<FieldElement<F>>,
    pub lde_roots_of_unity: Vec<FieldElement<F>>,
}

impl<F: IsFFTField> Domain<F> {
    pub fn new<A>(air: &A, options: &ProofOptions) -> Result<Self, ConfigurationError>
    where
        A: AIR<Field = F>,
    {
        let trace_length = air.step_count();
        let blowup_factor = options.extension_factor;
        let lde_domain_size = trace_length * blowup_factor;

        if lde_domain_size > MAX_DOMAIN_SIZE
            || lde_domain_size.trailing_zeros() as u64 > F::TWO_ADICITY
        {
            return Err(ConfigurationError::DomainTooLarge {
                domain_size: lde_domain_size,
                max: MAX_DOMAIN_SIZE.min(1 << F::TWO_ADICITY),
            });
        }

        let root_order = trace_length.trailing_zeros();
        let lde_root_order = lde_domain_size.trailing_zeros();

        let trace_primitive_root = F::get_primitive_root_of_unity(root_order as u64)
            .map_err(|_| ConfigurationError::DomainTooLarge {
                domain_size: lde_domain_size,
                max: 1 << F::TWO_ADICITY,
            })?;
        let lde_primitive_root = F::get_primitive_root_of_unity(lde_root_order as u64)
            .map_err(|_| ConfigurationError::DomainTooLarge {
                domain_size: lde_domain_size,
                max: 1 << F::TWO_ADICITY,
            })?;

        let trace_roots_of_unity = get_power_cycle(&trace_primitive_root, trace_length);
        let lde_roots_of_unity = get_power_cycle(&lde_primitive_root, lde_domain_size);

        Ok(Self {
            root_order,
            lde_root_order,
            blowup_factor,
            interpolation_domain_size: trace_length,
            lde_domain_size,
            trace_primitive_root,
            lde_primitive_root,
            trace_roots_of_unity,
            lde_roots_of_unity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples::simple_fibonacci::{FibonacciAIR, FibonacciPublicInputs};
    use lodestark_math::field::fields::fft_friendly::two_adic_32_prime_field::TwoAdic32FieldElement as FE;

    fn sample_air(trace_length: usize) -> FibonacciAIR {
        FibonacciAIR::new(
            trace_length,
            FibonacciPublicInputs {
                a0: FE::one(),
                a1: FE::one(),
            },
        )
    }

    #[test]
    fn domain_sizes_and_roots_are_consistent() {
        let air = sample_air(16);
        let options = ProofOptions {
            extension_factor: 4,
            ..ProofOptions::default_for_testing()
        };
        let domain = Domain::new(&air, &options).unwrap();

        assert_eq!(domain.interpolation_domain_size, 16);
        assert_eq!(domain.lde_domain_size, 64);
        assert_eq!(domain.root_order, 4);
        assert_eq!(domain.lde_root_order, 6);
        // The trace domain is the E-stride subsampling of the LDE domain.
        assert_eq!(
            domain.trace_primitive_root,
            domain.lde_primitive_root.pow(4u128)
        );
        for (i, root) in domain.trace_roots_of_unity.iter().enumerate() {
            assert_eq!(root, &domain.lde_roots_of_unity[i * 4]);
        }
    }

    #[test]
    fn oversized_domains_are_rejected() {
        // 2^24 steps * 4 exceeds the 2^25 two-adicity of the field.
        let air = sample_air(1 << 24);
        let options = ProofOptions {
            extension_factor: 4,
            ..ProofOptions::default_for_testing()
        };
        assert!(matches!(
            Domain::new(&air, &options),
            Err(ConfigurationError::DomainTooLarge { .. })
        ));
    }
}
