//! Domain models with validation at construction
//!
//! Untyped JSON is turned into a `MemberSubmission` only after every field
//! passes its rule. Invalid input returns `ValidationErrors`, not panic.

pub mod email;
pub mod member;
pub mod validation;

pub use email::EmailAddress;
pub use member::{Member, MemberSubmission};
pub use validation::{FieldError, FieldErrorKind, ValidationErrors};
