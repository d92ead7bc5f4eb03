pub mod cancellation;
pub mod config;
pub mod constraints;
pub mod context;
pub mod debug;
pub mod domain;
pub mod errors;
pub mod examples;
pub mod frame;
pub mod fri;
pub mod proof;
pub mod prover;
pub mod queries;
pub mod registers;
pub mod trace;
pub mod traits;
pub mod transcript;
pub mod verifier;

pub use cancellation::CancellationToken;
pub use constraints::boundary::Assertion;
pub use proof::options::{HashAlgorithm, ProofOptions};
pub use proof::stark::StarkProof;
pub use prover::{prove, prove_with_cancellation};
pub use traits::AIR;
pub use verifier::verify;
