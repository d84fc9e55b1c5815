//! In-memory implementation of every store for testing and development

use crate::core::content::{Comment, Like, LikeTarget, Post, UserProfile};
use crate::core::follow::{EdgeOrder, EdgeQuery, FollowEdge};
use crate::core::query::{Page, PageRequest};
use crate::core::store::{CommentStore, FollowStore, LikeStore, PostStore, UserDirectory};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserProfile>,
    edges: HashMap<(Uuid, Uuid), FollowEdge>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    likes: HashMap<(Uuid, LikeTarget), Like>,
}

/// In-memory store implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }

    /// Register or replace a user profile
    pub async fn insert_user(&self, user: UserProfile) -> Result<UserProfile> {
        self.write()?.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Change a user's privacy flag
    ///
    /// Returns `false` when the user does not exist.
    pub async fn set_private(&self, user_id: &Uuid, is_private: bool) -> Result<bool> {
        let mut tables = self.write()?;
        match tables.users.get_mut(user_id) {
            Some(user) => {
                user.is_private = is_private;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl FollowStore for InMemoryStore {
    async fn find_edge(&self, follower_id: &Uuid, followee_id: &Uuid) -> Result<Option<FollowEdge>> {
        Ok(self.read()?.edges.get(&(*follower_id, *followee_id)).cloned())
    }

    async fn insert_edge(&self, edge: FollowEdge) -> Result<bool> {
        let mut tables = self.write()?;
        if tables.edges.contains_key(&edge.key()) {
            return Ok(false);
        }
        tables.edges.insert(edge.key(), edge);
        Ok(true)
    }

    async fn update_edge(&self, edge: FollowEdge) -> Result<bool> {
        let mut tables = self.write()?;
        match tables.edges.get_mut(&edge.key()) {
            Some(existing) => {
                *existing = edge;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_edge(&self, follower_id: &Uuid, followee_id: &Uuid) -> Result<bool> {
        Ok(self
            .write()?
            .edges
            .remove(&(*follower_id, *followee_id))
            .is_some())
    }

    async fn query_edges(
        &self,
        query: EdgeQuery,
        order: EdgeOrder,
        page: PageRequest,
    ) -> Result<Page<FollowEdge>> {
        let mut edges: Vec<FollowEdge> = self
            .read()?
            .edges
            .values()
            .filter(|edge| query.matches(edge))
            .cloned()
            .collect();

        order.sort(&mut edges);
        Ok(page.slice(edges))
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn get_user(&self, user_id: &Uuid) -> Result<Option<UserProfile>> {
        Ok(self.read()?.users.get(user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserProfile>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn get_users(&self, user_ids: &[Uuid]) -> Result<Vec<UserProfile>> {
        let tables = self.read()?;
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl PostStore for InMemoryStore {
    async fn insert_post(&self, post: Post) -> Result<Post> {
        self.write()?.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, post_id: &Uuid) -> Result<Option<Post>> {
        Ok(self.read()?.posts.get(post_id).cloned())
    }

    async fn update_post(&self, post: Post) -> Result<bool> {
        let mut tables = self.write()?;
        match tables.posts.get_mut(&post.id) {
            Some(existing) => {
                *existing = post;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_post(&self, post_id: &Uuid) -> Result<bool> {
        Ok(self.write()?.posts.remove(post_id).is_some())
    }

    async fn posts_by_users(&self, user_ids: &[Uuid], page: PageRequest) -> Result<Page<Post>> {
        let mut posts: Vec<Post> = self
            .read()?
            .posts
            .values()
            .filter(|post| user_ids.contains(&post.user_id))
            .cloned()
            .collect();

        posts.sort_by(|a, b| b.date_posted.cmp(&a.date_posted).then(b.id.cmp(&a.id)));
        Ok(page.slice(posts))
    }
}

fn oldest_first(comments: &mut [Comment]) {
    comments.sort_by(|a, b| a.date_posted.cmp(&b.date_posted).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn insert_comment(&self, comment: Comment) -> Result<Comment> {
        self.write()?.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, comment_id: &Uuid) -> Result<Option<Comment>> {
        Ok(self.read()?.comments.get(comment_id).cloned())
    }

    async fn update_comment(&self, comment: Comment) -> Result<bool> {
        let mut tables = self.write()?;
        match tables.comments.get_mut(&comment.id) {
            Some(existing) => {
                *existing = comment;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn comments_for_post(&self, post_id: &Uuid, page: PageRequest) -> Result<Page<Comment>> {
        let mut comments: Vec<Comment> = self
            .read()?
            .comments
            .values()
            .filter(|c| &c.post_id == post_id && !c.is_reply())
            .cloned()
            .collect();

        oldest_first(&mut comments);
        Ok(page.slice(comments))
    }

    async fn replies_for_comment(
        &self,
        comment_id: &Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>> {
        let mut replies: Vec<Comment> = self
            .read()?
            .comments
            .values()
            .filter(|c| c.parent_comment_id.as_ref() == Some(comment_id))
            .cloned()
            .collect();

        oldest_first(&mut replies);
        Ok(page.slice(replies))
    }

    async fn delete_for_post(&self, post_id: &Uuid) -> Result<Vec<Uuid>> {
        let mut tables = self.write()?;
        let removed: Vec<Uuid> = tables
            .comments
            .values()
            .filter(|c| &c.post_id == post_id)
            .map(|c| c.id)
            .collect();

        tables.comments.retain(|_, c| &c.post_id != post_id);
        Ok(removed)
    }
}

#[async_trait]
impl LikeStore for InMemoryStore {
    async fn insert_like(&self, like: Like) -> Result<bool> {
        let mut tables = self.write()?;
        let key = (like.user_id, like.target);
        if tables.likes.contains_key(&key) {
            return Ok(false);
        }
        tables.likes.insert(key, like);
        Ok(true)
    }

    async fn remove_like(&self, user_id: &Uuid, target: &LikeTarget) -> Result<bool> {
        Ok(self.write()?.likes.remove(&(*user_id, *target)).is_some())
    }

    async fn count_likes(&self, target: &LikeTarget) -> Result<usize> {
        Ok(self
            .read()?
            .likes
            .values()
            .filter(|like| &like.target == target)
            .count())
    }

    async fn likes_for(&self, target: &LikeTarget, page: PageRequest) -> Result<Page<Like>> {
        let mut likes: Vec<Like> = self
            .read()?
            .likes
            .values()
            .filter(|like| &like.target == target)
            .cloned()
            .collect();

        likes.sort_by_key(|like| like.user_id);
        Ok(page.slice(likes))
    }

    async fn delete_for_target(&self, target: &LikeTarget) -> Result<()> {
        self.write()?.likes.retain(|(_, t), _| t != target);
        Ok(())
    }
}
