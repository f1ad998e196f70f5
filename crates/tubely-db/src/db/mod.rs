pub mod thumbnail;
pub mod video;
