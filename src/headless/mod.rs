//! Headless training and capture
//!
//! This module provides infrastructure for evolving policies offline without a window:
//! - Pixel buffer rendering of generation snapshots
//! - GIF capture as a presenter
//! - Truncation-selection training over feedforward policies
//! - RON reports of training runs

mod gif_capture;
mod pixel_renderer;
mod report;
mod training_env;

pub use gif_capture::GifCapture;
pub use pixel_renderer::PixelRenderer;
pub use report::TrainingReport;
pub use training_env::{TrainingConfig, TrainingEnv, TrainingStats};
