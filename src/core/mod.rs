//! Core invoice types, rounding, PPN, lifecycle and number format.
//!
//! Everything in here is pure and synchronous; persistence of the
//! number sequence lives in [`crate::sequence`].

mod builder;
mod error;
mod invoice;
mod numbering;
mod rounding;
mod types;
mod validation;
mod vat;

pub use builder::*;
pub use error::*;
pub use numbering::*;
pub use rounding::*;
pub use types::*;
pub use validation::*;
pub use vat::*;
