pub mod detect;
pub mod discovery;
pub mod ingest;

pub use detect::{detect_version, detect_version_in_buffer};
pub use discovery::speed_jump_files_in;
pub use ingest::{ingest_buffer, ingest_file};
