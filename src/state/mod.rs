/// State management module
///
/// This module handles all application state:
/// - Image types shared between the picker, pipeline and writer (data.rs)
/// - The filter pipeline that keeps the processed image current (pipeline.rs)
/// - Persisted user settings (settings.rs)

pub mod data;
pub mod pipeline;
pub mod settings;
