pub mod accelerator_config;
pub mod download_accelerator;
pub mod download_error;
pub mod download_report;
pub mod run_state;

// 重导出公共类型
pub use accelerator_config::{AcceleratorConfig, KnownLength, DEFAULT_CONCURRENCY};
pub use download_accelerator::{DownloadAccelerator, RangeWriter, WriteOutcome};
pub use download_error::{DownloadError, SlotFailure};
pub use download_report::{DownloadMode, DownloadReport};
pub use run_state::RunState;
