pub(crate) mod de;
mod models;
mod validation;

pub use models::*;
pub use validation::{Validate, ValidationError, validate_email};
