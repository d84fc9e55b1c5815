use crate::config::CommentConfig;
use crate::content::summaries_by_id;
use crate::core::content::{Comment, CommentView, LikeTarget, Post, UserSummary};
use crate::core::error::{SocialError, SocialResult, StorageContext};
use crate::core::query::{Page, PageLimits, PageRequest};
use crate::core::store::Stores;
use crate::follows::VisibilityGuard;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCommentRequest {
    pub post_id: Uuid,

    #[validate(length(min = 1, max = 2200, message = "Comment must be between 1 and 2200 characters"))]
    pub content: String,

    /// Set when replying to another comment of the same post
    #[serde(default)]
    pub parent_comment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EditCommentRequest {
    #[validate(length(min = 1, max = 2200, message = "Comment must be between 1 and 2200 characters"))]
    pub content: String,
}

#[derive(Clone)]
pub struct CommentService {
    stores: Stores,
    guard: VisibilityGuard,
    limits: PageLimits,
    presentation: CommentConfig,
}

impl CommentService {
    pub fn new(stores: Stores, guard: VisibilityGuard, limits: PageLimits, presentation: CommentConfig) -> Self {
        Self {
            stores,
            guard,
            limits,
            presentation,
        }
    }

    /// Top-level comments of a post, oldest first
    pub async fn get_comments_for_post(
        &self,
        caller_id: Option<Uuid>,
        post_id: Uuid,
        page: PageRequest,
    ) -> SocialResult<Page<CommentView>> {
        let post = self.find_post(post_id).await?;
        self.guard.authorize(caller_id, post.user_id).await?;

        let comments = self
            .stores
            .comments
            .comments_for_post(&post_id, page.clamp(self.limits))
            .await
            .or_storage("comments_for_post")?;

        self.views(comments).await
    }

    /// Replies to a comment, oldest first
    pub async fn get_replies_for_comment(
        &self,
        caller_id: Option<Uuid>,
        comment_id: Uuid,
        page: PageRequest,
    ) -> SocialResult<Page<CommentView>> {
        let comment = self.find_comment(comment_id).await?;
        let post = self.find_post(comment.post_id).await?;
        self.guard.authorize(caller_id, post.user_id).await?;

        let replies = self
            .stores
            .comments
            .replies_for_comment(&comment_id, page.clamp(self.limits))
            .await
            .or_storage("replies_for_comment")?;

        self.views(replies).await
    }

    pub async fn add_comment(&self, caller_id: Uuid, request: AddCommentRequest) -> SocialResult<CommentView> {
        request.validate()?;

        let post = self.find_post(request.post_id).await?;
        self.guard.authorize(Some(caller_id), post.user_id).await?;

        if let Some(parent_id) = request.parent_comment_id {
            let parent = self.find_comment(parent_id).await?;
            if parent.post_id != post.id {
                return Err(SocialError::validation(
                    "parent_comment_id",
                    "Parent comment belongs to another post",
                ));
            }
            if parent.is_deleted {
                return Err(SocialError::not_found("comment", parent_id));
            }
        }

        let comment = self
            .stores
            .comments
            .insert_comment(Comment::new(
                post.id,
                caller_id,
                request.content,
                request.parent_comment_id,
            ))
            .await
            .or_storage("insert_comment")?;

        tracing::debug!(comment_id = %comment.id, post_id = %post.id, "comment added");
        self.view(comment).await
    }

    pub async fn edit_comment(
        &self,
        caller_id: Uuid,
        comment_id: Uuid,
        request: EditCommentRequest,
    ) -> SocialResult<CommentView> {
        request.validate()?;

        let mut comment = self.find_comment(comment_id).await?;
        if comment.is_deleted {
            return Err(SocialError::conflict("Deleted comments cannot be edited"));
        }
        if comment.user_id != caller_id {
            return Err(SocialError::forbidden("Only the author can edit this comment"));
        }

        comment.content = request.content;
        self.save(comment.clone()).await?;

        self.view(comment).await
    }

    /// Soft delete: the row stays so replies keep their parent
    pub async fn delete_comment(&self, caller_id: Uuid, comment_id: Uuid) -> SocialResult<()> {
        let mut comment = self.find_comment(comment_id).await?;
        if comment.is_deleted {
            return Err(SocialError::not_found("comment", comment_id));
        }
        if comment.user_id != caller_id {
            return Err(SocialError::forbidden("Only the author can delete this comment"));
        }

        comment.is_deleted = true;
        comment.content = self.presentation.deleted_content.clone();
        self.save(comment).await?;

        tracing::debug!(%comment_id, user_id = %caller_id, "comment deleted");
        Ok(())
    }

    async fn save(&self, comment: Comment) -> SocialResult<()> {
        let comment_id = comment.id;
        if !self
            .stores
            .comments
            .update_comment(comment)
            .await
            .or_storage("update_comment")?
        {
            return Err(SocialError::not_found("comment", comment_id));
        }
        Ok(())
    }

    async fn find_post(&self, post_id: Uuid) -> SocialResult<Post> {
        self.stores
            .posts
            .get_post(&post_id)
            .await
            .or_storage("get_post")?
            .ok_or_else(|| SocialError::not_found("post", post_id))
    }

    async fn find_comment(&self, comment_id: Uuid) -> SocialResult<Comment> {
        self.stores
            .comments
            .get_comment(&comment_id)
            .await
            .or_storage("get_comment")?
            .ok_or_else(|| SocialError::not_found("comment", comment_id))
    }

    async fn like_count(&self, comment_id: Uuid) -> SocialResult<usize> {
        self.stores
            .likes
            .count_likes(&LikeTarget::Comment(comment_id))
            .await
            .or_storage("count_likes")
    }

    async fn view(&self, comment: Comment) -> SocialResult<CommentView> {
        let placeholder = self.presentation.deleted_display_name.as_str();
        let like_count = self.like_count(comment.id).await?;
        let author = self
            .stores
            .users
            .get_user(&comment.user_id)
            .await
            .or_storage("get_user")?
            .map(|user| user.summary())
            .unwrap_or_else(|| UserSummary::placeholder(placeholder));

        Ok(CommentView::new(comment, author, like_count).mask_if_deleted(placeholder))
    }

    /// Attach authors and like counts, then mask deleted comments
    async fn views(&self, comments: Page<Comment>) -> SocialResult<Page<CommentView>> {
        let authors = summaries_by_id(
            self.stores.users.as_ref(),
            comments.items.iter().map(|c| c.user_id),
        )
        .await?;

        let counts = try_join_all(comments.items.iter().map(|comment| self.like_count(comment.id))).await?;

        let placeholder = self.presentation.deleted_display_name.as_str();
        let mut counts = counts.into_iter();
        Ok(comments.map(|comment| {
            let author = authors
                .get(&comment.user_id)
                .cloned()
                .unwrap_or_else(|| UserSummary::placeholder(placeholder));
            CommentView::new(comment, author, counts.next().unwrap_or_default())
                .mask_if_deleted(placeholder)
        }))
    }
}
