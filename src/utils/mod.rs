pub mod diagnostics;
pub mod path_validator;

pub use diagnostics::verbose;
pub use path_validator::PathValidator;
