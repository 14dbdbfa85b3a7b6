//! Input handling
//! Loads posting records and candidate skill lists

pub mod file_detector;
pub mod manager;

pub use manager::InputManager;
