use crate::content::summaries_by_id;
use crate::core::content::{Comment, Like, LikeTarget, Post, UserSummary};
use crate::core::error::{SocialError, SocialResult, StorageContext};
use crate::core::query::{Page, PageLimits, PageRequest};
use crate::core::store::Stores;
use crate::follows::VisibilityGuard;
use uuid::Uuid;

#[derive(Clone)]
pub struct LikeService {
    stores: Stores,
    guard: VisibilityGuard,
    limits: PageLimits,
}

impl LikeService {
    pub fn new(stores: Stores, guard: VisibilityGuard, limits: PageLimits) -> Self {
        Self {
            stores,
            guard,
            limits,
        }
    }

    /// Users who liked a post, ordered by id
    pub async fn get_likes_for_post(
        &self,
        caller_id: Option<Uuid>,
        post_id: Uuid,
        page: PageRequest,
    ) -> SocialResult<Page<UserSummary>> {
        let post = self.find_post(post_id).await?;
        self.guard.authorize(caller_id, post.user_id).await?;

        self.likers(LikeTarget::Post(post_id), page).await
    }

    /// Users who liked a comment, ordered by id
    pub async fn get_likes_for_comment(
        &self,
        caller_id: Option<Uuid>,
        comment_id: Uuid,
        page: PageRequest,
    ) -> SocialResult<Page<UserSummary>> {
        let (_, post) = self.comment_with_post(comment_id).await?;
        self.guard.authorize(caller_id, post.user_id).await?;

        self.likers(LikeTarget::Comment(comment_id), page).await
    }

    pub async fn like_post(&self, caller_id: Uuid, post_id: Uuid) -> SocialResult<()> {
        let post = self.find_post(post_id).await?;
        self.guard.authorize(Some(caller_id), post.user_id).await?;

        self.insert(caller_id, LikeTarget::Post(post_id)).await
    }

    pub async fn unlike_post(&self, caller_id: Uuid, post_id: Uuid) -> SocialResult<()> {
        self.remove(caller_id, LikeTarget::Post(post_id)).await
    }

    /// Deleted comments cannot be liked
    pub async fn like_comment(&self, caller_id: Uuid, comment_id: Uuid) -> SocialResult<()> {
        let (comment, post) = self.comment_with_post(comment_id).await?;
        self.guard.authorize(Some(caller_id), post.user_id).await?;
        if comment.is_deleted {
            return Err(SocialError::not_found("comment", comment_id));
        }

        self.insert(caller_id, LikeTarget::Comment(comment_id)).await
    }

    pub async fn unlike_comment(&self, caller_id: Uuid, comment_id: Uuid) -> SocialResult<()> {
        self.remove(caller_id, LikeTarget::Comment(comment_id)).await
    }

    async fn insert(&self, caller_id: Uuid, target: LikeTarget) -> SocialResult<()> {
        if !self
            .stores
            .likes
            .insert_like(Like::new(caller_id, target))
            .await
            .or_storage("insert_like")?
        {
            return Err(SocialError::conflict("Already liked"));
        }

        tracing::debug!(user_id = %caller_id, ?target, "liked");
        Ok(())
    }

    async fn remove(&self, caller_id: Uuid, target: LikeTarget) -> SocialResult<()> {
        if !self
            .stores
            .likes
            .remove_like(&caller_id, &target)
            .await
            .or_storage("remove_like")?
        {
            return Err(SocialError::not_found("like", caller_id));
        }

        tracing::debug!(user_id = %caller_id, ?target, "unliked");
        Ok(())
    }

    async fn likers(&self, target: LikeTarget, page: PageRequest) -> SocialResult<Page<UserSummary>> {
        let likes = self
            .stores
            .likes
            .likes_for(&target, page.clamp(self.limits))
            .await
            .or_storage("likes_for")?;

        let users = summaries_by_id(
            self.stores.users.as_ref(),
            likes.items.iter().map(|like| like.user_id),
        )
        .await?;

        Ok(likes.filter_map(|like| users.get(&like.user_id).cloned()))
    }

    async fn find_post(&self, post_id: Uuid) -> SocialResult<Post> {
        self.stores
            .posts
            .get_post(&post_id)
            .await
            .or_storage("get_post")?
            .ok_or_else(|| SocialError::not_found("post", post_id))
    }

    /// Owner resolution for comments goes through the parent post
    async fn comment_with_post(&self, comment_id: Uuid) -> SocialResult<(Comment, Post)> {
        let comment = self
            .stores
            .comments
            .get_comment(&comment_id)
            .await
            .or_storage("get_comment")?
            .ok_or_else(|| SocialError::not_found("comment", comment_id))?;

        let post = self.find_post(comment.post_id).await?;
        Ok((comment, post))
    }
}
