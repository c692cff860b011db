/// Audio file decoding and sample-rate conversion
pub mod loader;

pub use loader::load_audio;
