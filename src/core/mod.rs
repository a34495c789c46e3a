/// コアシステムモジュール
pub mod app_controller;
pub mod config;
pub mod config_validation;
pub mod error;
pub mod jpeg;
pub mod status;

pub use app_controller::CameraApp;
pub use config::{AppConfig, ConfigError};
pub use error::CameraError;
pub use jpeg::{extract_jpeg, find_jpeg_range};
pub use status::{LogStatus, StatusSink};
