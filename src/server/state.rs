//! Shared application state handed to every handler

use crate::config::AppConfig;
use crate::content::{CommentService, LikeService, PostService};
use crate::core::auth::JwtCodec;
use crate::core::store::Stores;
use crate::follows::{FollowService, VisibilityGuard};
use axum::extract::FromRef;
use std::sync::Arc;

/// Services wired over one set of stores
#[derive(Clone)]
pub struct AppState {
    pub follows: FollowService,
    pub guard: VisibilityGuard,
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
    pub jwt: Arc<JwtCodec>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(stores: Stores, config: AppConfig) -> Self {
        let pagination = &config.pagination;

        let follows = FollowService::new(stores.follows.clone(), stores.users.clone(), pagination.users);
        let guard = VisibilityGuard::new(follows.clone(), stores.users.clone());

        let posts = PostService::new(
            stores.clone(),
            guard.clone(),
            pagination.posts,
            config.comments.deleted_display_name.clone(),
        );
        let comments = CommentService::new(
            stores.clone(),
            guard.clone(),
            pagination.comments,
            config.comments.clone(),
        );
        let likes = LikeService::new(stores, guard.clone(), pagination.likes);

        Self {
            follows,
            guard,
            posts,
            comments,
            likes,
            jwt: Arc::new(JwtCodec::from_config(&config.auth)),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<JwtCodec> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
