pub mod stark128_prime_field;
pub mod two_adic_32_prime_field;
