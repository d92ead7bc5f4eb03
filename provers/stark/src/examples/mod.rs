pub mod mimc;
pub mod simple_fibonacci;
