pub mod validator;

pub use validator::{validate, validate_row};
