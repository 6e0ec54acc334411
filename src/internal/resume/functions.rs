pub mod derive_log_id;
pub mod log_layout;
