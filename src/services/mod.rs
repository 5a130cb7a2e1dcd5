pub mod batch_submitter;
pub mod progress;
pub mod report_writer;

pub use batch_submitter::{BatchSubmitter, SubmitOutcome};
pub use progress::ProgressSimulator;
pub use report_writer::ReportWriter;
