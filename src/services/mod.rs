pub mod anonymizer;
pub mod redaction;
pub mod scoring;
