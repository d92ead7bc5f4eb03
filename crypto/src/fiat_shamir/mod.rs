pub mod default_transcript;
pub mod is_transcript;
