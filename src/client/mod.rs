pub mod analysis;
pub mod error;
pub mod video_id;

pub use analysis::AnalysisClient;
pub use error::ClientError;
pub use video_id::VideoId;
