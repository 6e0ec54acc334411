pub mod resume_log;

pub use resume_log::{is_drained, ResumeLog, ResumeLogEntry};
