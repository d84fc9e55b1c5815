//! Route table for the `/api` surface

use crate::content::handlers as content;
use crate::follows::handlers as follows;
use crate::server::state::AppState;
use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde_json::{Value, json};

/// Build every API route (mounted under `/api` by the builder)
///
/// - follows: `/follows...`, `/followers...`, `/visibility/{owner_id}`
/// - posts: `/posts...`, `/users/{user_id}/posts`, `/feed`
/// - comments: `/posts/{post_id}/comments`, `/comments...`
/// - likes: `/posts/{post_id}/likes`, `/comments/{comment_id}/likes`, `.../like`
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        // Follows
        .route("/follows", get(follows::list_follows))
        .route("/follows/find/{username}", get(follows::find_in_follows))
        .route(
            "/follows/{user_id}",
            post(follows::follow_user).delete(follows::unfollow_user),
        )
        .route("/follows/{user_id}/status", get(follows::follow_status))
        .route("/followers", get(follows::list_followers))
        .route("/followers/find/{username}", get(follows::find_in_followers))
        .route("/followers/pending", get(follows::pending_followers))
        .route("/followers/{user_id}", delete(follows::remove_follower))
        .route("/followers/{user_id}/accept", post(follows::accept_follower))
        .route("/followers/{user_id}/reject", post(follows::reject_follower))
        .route("/visibility/{owner_id}", get(follows::visibility))
        // Posts
        .route("/posts", post(content::create_post))
        .route(
            "/posts/{post_id}",
            get(content::get_post)
                .patch(content::edit_post)
                .delete(content::delete_post),
        )
        .route("/users/{user_id}/posts", get(content::posts_for_user))
        .route("/feed", get(content::feed))
        // Comments
        .route("/posts/{post_id}/comments", get(content::comments_for_post))
        .route("/comments", post(content::add_comment))
        .route(
            "/comments/{comment_id}",
            axum::routing::patch(content::edit_comment).delete(content::delete_comment),
        )
        .route(
            "/comments/{comment_id}/replies",
            get(content::replies_for_comment),
        )
        // Likes
        .route("/posts/{post_id}/likes", get(content::likes_for_post))
        .route(
            "/posts/{post_id}/like",
            post(content::like_post).delete(content::unlike_post),
        )
        .route("/comments/{comment_id}/likes", get(content::likes_for_comment))
        .route(
            "/comments/{comment_id}/like",
            post(content::like_comment).delete(content::unlike_comment),
        )
        .with_state(state)
}

/// Build health check routes
pub fn build_health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "snapgraph"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_routes() {
        for path in ["/health", "/healthz"] {
            let response = build_health_routes()
                .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["status"], "ok");
            assert_eq!(json["service"], "snapgraph");
        }
    }
}
