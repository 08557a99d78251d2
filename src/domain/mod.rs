//! Domain types free of I/O: subscribers, channel posts, summaries and
//! health classification.

pub mod health;
pub mod id;
pub mod post;
pub mod subscriber;
pub mod summary;

pub use health::{HealthCheck, HealthLevel, HealthReport, Thresholds};
pub use id::UserId;
pub use post::ChannelPost;
pub use subscriber::{NewSubscriber, Subscriber};
pub use summary::{Confidence, Impact, SectorImpact, StockImpact, Summary};
