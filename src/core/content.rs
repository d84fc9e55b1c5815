//! Users, posts, comments and likes as stored, plus the views handed to callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user profile as seen by this service
///
/// Profiles are owned by user management; this crate only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub profile_picture_url: Option<String>,
    pub is_private: bool,
}

impl UserProfile {
    pub fn new(username: impl Into<String>, display_name: impl Into<String>, is_private: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            display_name: display_name.into(),
            profile_picture_url: None,
            is_private,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            profile_picture_url: self.profile_picture_url.clone(),
        }
    }
}

/// Public display fields of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub profile_picture_url: Option<String>,
}

impl UserSummary {
    /// Author shown in place of a removed comment's author
    pub fn placeholder(display_name: &str) -> Self {
        Self {
            id: Uuid::nil(),
            username: String::new(),
            display_name: display_name.to_string(),
            profile_picture_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub date_posted: DateTime<Utc>,
    pub pictures: Vec<String>,
}

impl Post {
    pub fn new(user_id: Uuid, description: impl Into<String>, pictures: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            description: description.into(),
            date_posted: Utc::now(),
            pictures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub parent_comment_id: Option<Uuid>,
    pub is_deleted: bool,
    pub date_posted: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        post_id: Uuid,
        user_id: Uuid,
        content: impl Into<String>,
        parent_comment_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content: content.into(),
            parent_comment_id,
            is_deleted: false,
            date_posted: Utc::now(),
        }
    }

    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }
}

/// What a like points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LikeTarget {
    Post(Uuid),
    Comment(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: Uuid,
    pub target: LikeTarget,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: Uuid, target: LikeTarget) -> Self {
        Self {
            user_id,
            target,
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub description: String,
    pub date_posted: DateTime<Utc>,
    pub number_of_pictures: usize,
    pub pictures: Vec<String>,
    pub author: UserSummary,
    pub like_count: usize,
}

impl PostView {
    pub fn new(post: Post, author: UserSummary, like_count: usize) -> Self {
        Self {
            id: post.id,
            description: post.description,
            date_posted: post.date_posted,
            number_of_pictures: post.pictures.len(),
            pictures: post.pictures,
            author,
            like_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub is_reply: bool,
    pub parent_comment_id: Option<Uuid>,
    pub is_deleted: bool,
    pub date_posted: DateTime<Utc>,
    pub like_count: usize,
    pub author: UserSummary,
}

impl CommentView {
    pub fn new(comment: Comment, author: UserSummary, like_count: usize) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            is_reply: comment.is_reply(),
            content: comment.content,
            parent_comment_id: comment.parent_comment_id,
            is_deleted: comment.is_deleted,
            date_posted: comment.date_posted,
            like_count,
            author,
        }
    }

    /// Replace the author of a deleted comment with a placeholder
    ///
    /// Identity and thread linkage are left untouched so replies still attach.
    pub fn mask_if_deleted(mut self, placeholder_name: &str) -> Self {
        if self.is_deleted {
            self.author = UserSummary::placeholder(placeholder_name);
        }
        self
    }
}
