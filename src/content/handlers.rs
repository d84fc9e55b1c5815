//! HTTP handlers for posts, comments and likes
//!
//! Reads accept anonymous callers; mutations need a bearer token.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::content::{AddCommentRequest, CreatePostRequest, EditCommentRequest, EditPostRequest};
use crate::core::auth::Caller;
use crate::core::content::{CommentView, PostView, UserSummary};
use crate::core::error::SocialResult;
use crate::core::query::{Page, PageRequest};
use crate::server::AppState;

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<CreatePostRequest>,
) -> SocialResult<(StatusCode, Json<PostView>)> {
    let post = state.posts.create_post(caller.require_user()?, request).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(post_id): Path<Uuid>,
) -> SocialResult<Json<PostView>> {
    Ok(Json(state.posts.get_post(caller.user_id(), post_id).await?))
}

/// PATCH /api/posts/{post_id}
pub async fn edit_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(post_id): Path<Uuid>,
    Json(request): Json<EditPostRequest>,
) -> SocialResult<Json<PostView>> {
    let post = state
        .posts
        .edit_post(caller.require_user()?, post_id, request)
        .await?;
    Ok(Json(post))
}

/// DELETE /api/posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(post_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    state.posts.delete_post(caller.require_user()?, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{user_id}/posts
pub async fn posts_for_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> SocialResult<Page<PostView>> {
    state
        .posts
        .get_posts_for_user(caller.user_id(), user_id, page)
        .await
}

/// GET /api/feed
pub async fn feed(
    State(state): State<AppState>,
    caller: Caller,
    Query(page): Query<PageRequest>,
) -> SocialResult<Page<PostView>> {
    state.posts.get_feed(caller.require_user()?, page).await
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// GET /api/posts/{post_id}/comments
pub async fn comments_for_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(post_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> SocialResult<Page<CommentView>> {
    state
        .comments
        .get_comments_for_post(caller.user_id(), post_id, page)
        .await
}

/// GET /api/comments/{comment_id}/replies
pub async fn replies_for_comment(
    State(state): State<AppState>,
    caller: Caller,
    Path(comment_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> SocialResult<Page<CommentView>> {
    state
        .comments
        .get_replies_for_comment(caller.user_id(), comment_id, page)
        .await
}

/// POST /api/comments
pub async fn add_comment(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<AddCommentRequest>,
) -> SocialResult<(StatusCode, Json<CommentView>)> {
    let comment = state
        .comments
        .add_comment(caller.require_user()?, request)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// PATCH /api/comments/{comment_id}
pub async fn edit_comment(
    State(state): State<AppState>,
    caller: Caller,
    Path(comment_id): Path<Uuid>,
    Json(request): Json<EditCommentRequest>,
) -> SocialResult<Json<CommentView>> {
    let comment = state
        .comments
        .edit_comment(caller.require_user()?, comment_id, request)
        .await?;
    Ok(Json(comment))
}

/// DELETE /api/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    caller: Caller,
    Path(comment_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    state
        .comments
        .delete_comment(caller.require_user()?, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

/// GET /api/posts/{post_id}/likes
pub async fn likes_for_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(post_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> SocialResult<Page<UserSummary>> {
    state
        .likes
        .get_likes_for_post(caller.user_id(), post_id, page)
        .await
}

/// GET /api/comments/{comment_id}/likes
pub async fn likes_for_comment(
    State(state): State<AppState>,
    caller: Caller,
    Path(comment_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> SocialResult<Page<UserSummary>> {
    state
        .likes
        .get_likes_for_comment(caller.user_id(), comment_id, page)
        .await
}

/// POST /api/posts/{post_id}/like
pub async fn like_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(post_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    state.likes.like_post(caller.require_user()?, post_id).await?;
    Ok(StatusCode::CREATED)
}

/// DELETE /api/posts/{post_id}/like
pub async fn unlike_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(post_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    state.likes.unlike_post(caller.require_user()?, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/comments/{comment_id}/like
pub async fn like_comment(
    State(state): State<AppState>,
    caller: Caller,
    Path(comment_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    state
        .likes
        .like_comment(caller.require_user()?, comment_id)
        .await?;
    Ok(StatusCode::CREATED)
}

/// DELETE /api/comments/{comment_id}/like
pub async fn unlike_comment(
    State(state): State<AppState>,
    caller: Caller,
    Path(comment_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    state
        .likes
        .unlike_comment(caller.require_user()?, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
