pub mod import_session;

pub use import_session::{ImportSession, ImportStep};
