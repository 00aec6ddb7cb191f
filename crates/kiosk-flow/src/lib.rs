//! The coupon registration workflow: offer eligibility, uniqueness checks,
//! the append write, and bounded post-write verification.
//!
//! The backing store is eventually consistent and offers no transactions,
//! so the workflow compensates instead of guaranteeing: uniqueness is
//! checked immediately before the write, and visibility of the written row
//! is re-polled afterwards. A write whose visibility cannot be confirmed
//! within the retry budget ends in an ambiguous outcome that is never
//! retried automatically.

pub mod error;
pub mod offers;
pub mod orchestrate;
pub mod registry;
pub mod verify;

pub use error::{Outcome, RegistrationError};
pub use offers::OfferRecord;
pub use orchestrate::{CodeReport, Registrar, RegistrationRequest};
pub use registry::Assignment;
