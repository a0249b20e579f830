pub mod init;
pub mod reader;

pub use init::setup;
pub use reader::{parse_instance, read_instance};
