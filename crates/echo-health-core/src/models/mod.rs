//! Domain models for the echo-health store.

mod community;
mod profile;
mod quest;
mod receipt;
mod sos;
mod vector;
mod vitals;

pub use community::*;
pub use profile::*;
pub use quest::*;
pub use receipt::*;
pub use sos::*;
pub use vector::*;
pub use vitals::*;
