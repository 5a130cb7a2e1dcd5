pub mod import_row;
pub mod level;
pub mod options;
pub mod reference;
pub mod summary;
pub mod validation;

pub use import_row::{ImportRow, RawRow};
pub use level::QuestionLevel;
pub use options::ImportOptions;
pub use reference::{Chapter, Level, Subject};
pub use summary::ImportSummary;
pub use validation::{RowError, ValidationResult};
