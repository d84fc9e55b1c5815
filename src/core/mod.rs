//! Core types shared by every module: domain records, errors, pagination,
//! caller identity and the storage contracts

pub mod auth;
pub mod content;
pub mod error;
pub mod follow;
pub mod query;
pub mod store;

pub use auth::{Caller, CallerContext, JwtCodec};
pub use error::{SocialError, SocialResult, StorageError};
pub use follow::{FollowEdge, FollowState, FollowStatus};
pub use query::{Page, PageLimits, PageRequest};
pub use store::Stores;
