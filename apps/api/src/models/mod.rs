pub mod gap;
pub mod language;
pub mod resume;
