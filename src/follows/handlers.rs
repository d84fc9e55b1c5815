//! HTTP handlers for follow operations
//!
//! Path ids name the *other* user; the caller always comes from the bearer
//! token. Listings answer with the items as body and a `Pagination` header.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

use crate::core::auth::Caller;
use crate::core::content::UserSummary;
use crate::core::error::SocialResult;
use crate::core::follow::{FollowEdge, FollowStatus};
use crate::core::query::{Page, PageRequest};
use crate::follows::Visibility;
use crate::server::AppState;

/// Response for the visibility endpoint
#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
    pub owner_id: Uuid,
    pub visibility: Visibility,
}

/// POST /api/follows/{user_id}
pub async fn follow_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
) -> SocialResult<(StatusCode, Json<FollowEdge>)> {
    let edge = state.follows.follow_user(caller.require_user()?, user_id).await?;
    Ok((StatusCode::CREATED, Json(edge)))
}

/// DELETE /api/follows/{user_id}
pub async fn unfollow_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    state.follows.unfollow_user(caller.require_user()?, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/follows/{user_id}/status
pub async fn follow_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
) -> SocialResult<Json<FollowStatus>> {
    let status = state
        .follows
        .get_follow_status(caller.require_user()?, user_id)
        .await;
    Ok(Json(status))
}

/// GET /api/follows
pub async fn list_follows(
    State(state): State<AppState>,
    caller: Caller,
    Query(page): Query<PageRequest>,
) -> SocialResult<Page<UserSummary>> {
    state.follows.get_follows(caller.require_user()?, page).await
}

/// GET /api/follows/find/{username}
pub async fn find_in_follows(
    State(state): State<AppState>,
    caller: Caller,
    Path(username): Path<String>,
) -> SocialResult<Json<UserSummary>> {
    let user = state
        .follows
        .find_user_in_follows(caller.require_user()?, &username)
        .await?;
    Ok(Json(user))
}

/// GET /api/followers
pub async fn list_followers(
    State(state): State<AppState>,
    caller: Caller,
    Query(page): Query<PageRequest>,
) -> SocialResult<Page<UserSummary>> {
    state.follows.get_followers(caller.require_user()?, page).await
}

/// GET /api/followers/find/{username}
pub async fn find_in_followers(
    State(state): State<AppState>,
    caller: Caller,
    Path(username): Path<String>,
) -> SocialResult<Json<UserSummary>> {
    let user = state
        .follows
        .find_user_in_followers(caller.require_user()?, &username)
        .await?;
    Ok(Json(user))
}

/// GET /api/followers/pending
pub async fn pending_followers(
    State(state): State<AppState>,
    caller: Caller,
    Query(page): Query<PageRequest>,
) -> SocialResult<Page<UserSummary>> {
    state
        .follows
        .get_not_accepted_followers(caller.require_user()?, page)
        .await
}

/// POST /api/followers/{user_id}/accept
pub async fn accept_follower(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
) -> SocialResult<Json<FollowEdge>> {
    let edge = state.follows.accept_follow(caller.require_user()?, user_id).await?;
    Ok(Json(edge))
}

/// POST /api/followers/{user_id}/reject
pub async fn reject_follower(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    state.follows.reject_follow(caller.require_user()?, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/followers/{user_id}
pub async fn remove_follower(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    state.follows.remove_follower(caller.require_user()?, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/visibility/{owner_id}
///
/// Reports the decision instead of enforcing it; anonymous callers allowed.
pub async fn visibility(
    State(state): State<AppState>,
    caller: Caller,
    Path(owner_id): Path<Uuid>,
) -> SocialResult<Json<VisibilityResponse>> {
    let (owner, visibility) = state.guard.check(caller.user_id(), owner_id).await?;
    Ok(Json(VisibilityResponse {
        owner_id: owner.id,
        visibility,
    }))
}
