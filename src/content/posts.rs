use crate::content::summaries_by_id;
use crate::core::content::{LikeTarget, Post, PostView, UserSummary};
use crate::core::error::{SocialError, SocialResult, StorageContext, user_not_found};
use crate::core::follow::{EdgeOrder, EdgeQuery};
use crate::core::query::{Page, PageLimits, PageRequest};
use crate::core::store::Stores;
use crate::follows::VisibilityGuard;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(max = 2200, message = "Description cannot exceed 2200 characters"))]
    pub description: String,

    /// URLs returned by the upload provider
    #[validate(length(min = 1, max = 10, message = "A post needs between 1 and 10 pictures"))]
    pub pictures: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EditPostRequest {
    #[validate(length(max = 2200, message = "Description cannot exceed 2200 characters"))]
    pub description: String,
}

#[derive(Clone)]
pub struct PostService {
    stores: Stores,
    guard: VisibilityGuard,
    limits: PageLimits,
    removed_name: String,
}

impl PostService {
    pub fn new(stores: Stores, guard: VisibilityGuard, limits: PageLimits, removed_name: impl Into<String>) -> Self {
        Self {
            stores,
            guard,
            limits,
            removed_name: removed_name.into(),
        }
    }

    pub async fn get_post(&self, caller_id: Option<Uuid>, post_id: Uuid) -> SocialResult<PostView> {
        let post = self.find_post(post_id).await?;
        let owner = self.guard.authorize(caller_id, post.user_id).await?;
        let like_count = self.like_count(post.id).await?;

        Ok(PostView::new(post, owner.summary(), like_count))
    }

    /// Posts of one user, newest first
    pub async fn get_posts_for_user(
        &self,
        caller_id: Option<Uuid>,
        user_id: Uuid,
        page: PageRequest,
    ) -> SocialResult<Page<PostView>> {
        self.guard.authorize(caller_id, user_id).await?;

        let posts = self
            .stores
            .posts
            .posts_by_users(&[user_id], page.clamp(self.limits))
            .await
            .or_storage("posts_by_users")?;

        self.views(posts).await
    }

    /// The caller's posts and those of every followee they may see, newest first
    pub async fn get_feed(&self, caller_id: Uuid, page: PageRequest) -> SocialResult<Page<PostView>> {
        let edges = self
            .stores
            .follows
            .query_edges(
                EdgeQuery::follows_of(caller_id),
                EdgeOrder::ByFollowee,
                PageRequest::all(),
            )
            .await
            .or_storage("query_edges")?;

        let followee_ids: Vec<Uuid> = edges.items.iter().map(|edge| edge.followee_id).collect();
        let followees = self
            .stores
            .users
            .get_users(&followee_ids)
            .await
            .or_storage("get_users")?;

        let mut authors = vec![caller_id];
        for followee in followees {
            if self
                .guard
                .can_view(Some(caller_id), followee.id, followee.is_private)
                .await
                .is_allowed()
            {
                authors.push(followee.id);
            }
        }

        let posts = self
            .stores
            .posts
            .posts_by_users(&authors, page.clamp(self.limits))
            .await
            .or_storage("posts_by_users")?;

        self.views(posts).await
    }

    pub async fn create_post(&self, caller_id: Uuid, request: CreatePostRequest) -> SocialResult<PostView> {
        request.validate()?;

        let author = self
            .stores
            .users
            .get_user(&caller_id)
            .await
            .or_storage("get_user")?
            .ok_or_else(|| user_not_found(caller_id))?;

        let post = self
            .stores
            .posts
            .insert_post(Post::new(caller_id, request.description, request.pictures))
            .await
            .or_storage("insert_post")?;

        tracing::debug!(post_id = %post.id, user_id = %caller_id, "post created");
        Ok(PostView::new(post, author.summary(), 0))
    }

    pub async fn edit_post(
        &self,
        caller_id: Uuid,
        post_id: Uuid,
        request: EditPostRequest,
    ) -> SocialResult<PostView> {
        request.validate()?;

        let mut post = self.owned_post(caller_id, post_id).await?;
        post.description = request.description;

        if !self
            .stores
            .posts
            .update_post(post.clone())
            .await
            .or_storage("update_post")?
        {
            return Err(SocialError::not_found("post", post_id));
        }

        self.get_post(Some(caller_id), post_id).await
    }

    /// Delete a post together with its comments and every like on them
    pub async fn delete_post(&self, caller_id: Uuid, post_id: Uuid) -> SocialResult<()> {
        self.owned_post(caller_id, post_id).await?;

        let comment_ids = self
            .stores
            .comments
            .delete_for_post(&post_id)
            .await
            .or_storage("delete_for_post")?;

        for comment_id in comment_ids {
            self.stores
                .likes
                .delete_for_target(&LikeTarget::Comment(comment_id))
                .await
                .or_storage("delete_for_target")?;
        }

        self.stores
            .likes
            .delete_for_target(&LikeTarget::Post(post_id))
            .await
            .or_storage("delete_for_target")?;

        if !self
            .stores
            .posts
            .delete_post(&post_id)
            .await
            .or_storage("delete_post")?
        {
            return Err(SocialError::not_found("post", post_id));
        }

        tracing::debug!(%post_id, user_id = %caller_id, "post deleted");
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

    async fn owned_post(&self, caller_id: Uuid, post_id: Uuid) -> SocialResult<Post> {
        let post = self.find_post(post_id).await?;
        if post.user_id != caller_id {
            return Err(SocialError::forbidden("Only the author can change this post"));
        }
        Ok(post)
    }

    async fn like_count(&self, post_id: Uuid) -> SocialResult<usize> {
        self.stores
            .likes
            .count_likes(&LikeTarget::Post(post_id))
            .await
            .or_storage("count_likes")
    }

    async fn views(&self, posts: Page<Post>) -> SocialResult<Page<PostView>> {
        let authors = summaries_by_id(
            self.stores.users.as_ref(),
            posts.items.iter().map(|post| post.user_id),
        )
        .await?;

        let counts = try_join_all(posts.items.iter().map(|post| self.like_count(post.id))).await?;
        let mut counts = counts.into_iter();
        Ok(posts.map(|post| {
            let author = authors
                .get(&post.user_id)
                .cloned()
                .unwrap_or_else(|| UserSummary::placeholder(&self.removed_name));
            PostView::new(post, author, counts.next().unwrap_or_default())
        }))
    }
}
