pub mod publish;

pub use publish::{sign_video, VideoPublishService};
