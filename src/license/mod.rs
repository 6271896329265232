//! License lifecycle: issuing and revoking keys, and validating them against
//! client devices.

mod admin;
mod validation;

pub use admin::*;
pub use validation::*;
