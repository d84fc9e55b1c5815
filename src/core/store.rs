//! Storage contracts consumed by the core
//!
//! Backends report failures through `anyhow::Result`. They never decide
//! policy: duplicate or missing rows come back as `Ok(false)` / `Ok(None)`
//! and the services turn those into typed errors.

use crate::core::content::{Comment, Like, LikeTarget, Post, UserProfile};
use crate::core::follow::{EdgeOrder, EdgeQuery, FollowEdge};
use crate::core::query::{Page, PageRequest};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Persistence of follow edges
#[async_trait]
pub trait FollowStore: Send + Sync {
    /// Find the edge for an ordered pair
    async fn find_edge(&self, follower_id: &Uuid, followee_id: &Uuid) -> Result<Option<FollowEdge>>;

    /// Insert a new edge
    ///
    /// Returns `false` when an edge already exists for the pair.
    async fn insert_edge(&self, edge: FollowEdge) -> Result<bool>;

    /// Replace an existing edge
    ///
    /// Returns `false` when no edge exists for the pair.
    async fn update_edge(&self, edge: FollowEdge) -> Result<bool>;

    /// Remove the edge for an ordered pair
    ///
    /// Returns `false` when no edge exists for the pair.
    async fn remove_edge(&self, follower_id: &Uuid, followee_id: &Uuid) -> Result<bool>;

    /// List edges matching `query`, sorted ascending by `order`
    async fn query_edges(
        &self,
        query: EdgeQuery,
        order: EdgeOrder,
        page: PageRequest,
    ) -> Result<Page<FollowEdge>>;
}

/// Read access to user profiles
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Get a profile by id
    async fn get_user(&self, user_id: &Uuid) -> Result<Option<UserProfile>>;

    /// Get a profile by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<UserProfile>>;

    /// Get several profiles at once; unknown ids are skipped
    async fn get_users(&self, user_ids: &[Uuid]) -> Result<Vec<UserProfile>>;

    /// Privacy flag of a user, `None` when the user does not exist
    async fn get_privacy_flag(&self, user_id: &Uuid) -> Result<Option<bool>> {
        Ok(self.get_user(user_id).await?.map(|user| user.is_private))
    }
}

/// Persistence of posts
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert_post(&self, post: Post) -> Result<Post>;

    async fn get_post(&self, post_id: &Uuid) -> Result<Option<Post>>;

    /// Returns `false` when the post does not exist
    async fn update_post(&self, post: Post) -> Result<bool>;

    /// Returns `false` when the post does not exist
    async fn delete_post(&self, post_id: &Uuid) -> Result<bool>;

    /// Posts authored by any of `user_ids`, newest first
    async fn posts_by_users(&self, user_ids: &[Uuid], page: PageRequest) -> Result<Page<Post>>;
}

/// Persistence of comments
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert_comment(&self, comment: Comment) -> Result<Comment>;

    async fn get_comment(&self, comment_id: &Uuid) -> Result<Option<Comment>>;

    /// Returns `false` when the comment does not exist
    async fn update_comment(&self, comment: Comment) -> Result<bool>;

    /// Top-level comments of a post, oldest first (deleted ones included)
    async fn comments_for_post(&self, post_id: &Uuid, page: PageRequest) -> Result<Page<Comment>>;

    /// Direct replies to a comment, oldest first (deleted ones included)
    async fn replies_for_comment(
        &self,
        comment_id: &Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>>;

    /// Remove every comment of a post, returning the removed ids
    async fn delete_for_post(&self, post_id: &Uuid) -> Result<Vec<Uuid>>;
}

/// Persistence of likes on posts and comments
#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Returns `false` when the user already likes the target
    async fn insert_like(&self, like: Like) -> Result<bool>;

    /// Returns `false` when there was no such like
    async fn remove_like(&self, user_id: &Uuid, target: &LikeTarget) -> Result<bool>;

    async fn count_likes(&self, target: &LikeTarget) -> Result<usize>;

    /// Likes of a target ordered by user id ascending
    async fn likes_for(&self, target: &LikeTarget, page: PageRequest) -> Result<Page<Like>>;

    /// Remove every like of a target
    async fn delete_for_target(&self, target: &LikeTarget) -> Result<()>;
}

/// Every store the services need, behind shared trait objects
#[derive(Clone)]
pub struct Stores {
    pub follows: Arc<dyn FollowStore>,
    pub users: Arc<dyn UserDirectory>,
    pub posts: Arc<dyn PostStore>,
    pub comments: Arc<dyn CommentStore>,
    pub likes: Arc<dyn LikeStore>,
}

impl Stores {
    /// Use one backend for every store
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: FollowStore + UserDirectory + PostStore + CommentStore + LikeStore + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            follows: backend.clone(),
            users: backend.clone(),
            posts: backend.clone(),
            comments: backend.clone(),
            likes: backend,
        }
    }
}
