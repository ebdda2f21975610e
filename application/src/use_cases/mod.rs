//! Application use cases

pub mod relay_text;
pub mod text_to_image;
