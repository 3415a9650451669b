//! Utility modules shared by the servers and the CLI

pub mod detect;
pub mod encode;
pub mod temp_files;
pub mod validate;
