//! # snapgraph
//!
//! Social graph backend: follow requests between users, and posts, comments
//! and likes whose visibility depends on those follows.
//!
//! ## Features
//!
//! - **Follow state machine**: `NoRelation -> Pending -> Accepted`, with
//!   accept, reject, unfollow and remove-follower transitions
//! - **Visibility guard**: private profiles are visible only to their owner
//!   and accepted followers, re-checked at every content boundary
//! - **Typed errors**: every operation returns [`SocialResult`], storage
//!   failures are logged and absorbed into [`SocialError::Storage`]
//! - **Pluggable storage**: in-memory by default, PostgreSQL behind the
//!   `postgres` feature
//! - **REST surface**: axum routes under `/api` with bearer JWT callers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use snapgraph::prelude::*;
//!
//! let store = InMemoryStore::new();
//! let owner = store.insert_user(UserProfile::new("ana", "Ana", true)).await?;
//! let fan = store.insert_user(UserProfile::new("bo", "Bo", false)).await?;
//!
//! let state = AppState::new(Stores::from_backend(store), AppConfig::default());
//! state.follows.follow_user(fan.id, owner.id).await?;
//! state.follows.accept_follow(owner.id, fan.id).await?;
//!
//! assert!(state.guard.can_view(Some(fan.id), owner.id, true).await.is_allowed());
//! ```

pub mod config;
pub mod content;
pub mod core;
pub mod follows;
pub mod logging;
pub mod server;
pub mod storage;

pub use crate::core::error::{SocialError, SocialResult};

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{Caller, CallerContext, JwtCodec},
        content::{Comment, CommentView, Like, LikeTarget, Post, PostView, UserProfile, UserSummary},
        error::{SocialError, SocialResult, StorageError},
        follow::{FollowEdge, FollowState, FollowStatus},
        query::{Page, PageLimits, PageRequest},
        store::{CommentStore, FollowStore, LikeStore, PostStore, Stores, UserDirectory},
    };

    // === Services ===
    pub use crate::content::{
        AddCommentRequest, CommentService, CreatePostRequest, EditCommentRequest, EditPostRequest,
        LikeService, PostService,
    };
    pub use crate::follows::{FollowService, Visibility, VisibilityGuard};

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config & Server ===
    pub use crate::config::AppConfig;
    pub use crate::logging::init_tracing;
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use uuid::Uuid;
}
