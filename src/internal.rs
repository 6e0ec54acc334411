pub mod accelerator;
pub mod range;
pub mod resume;
pub mod storage;
pub mod transport;
