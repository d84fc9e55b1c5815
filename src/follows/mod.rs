//! Follow relationships and the visibility rules built on them

pub mod handlers;
pub mod service;
pub mod visibility;

pub use service::FollowService;
pub use visibility::{Visibility, VisibilityGuard};
