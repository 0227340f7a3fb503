//! Response fingerprinting for consultation receipts.

mod digest;

pub use digest::*;
