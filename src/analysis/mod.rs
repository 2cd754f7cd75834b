pub mod category;
pub mod metrics;
pub mod normalize;
pub mod projections;
pub mod ranking;
pub mod report;
pub mod sentiment;
pub mod types;

pub use report::{GlobalReport, ReportOptions, VideoReport};
pub use types::{Comment, VideoSummary};
