//! Macro-generated test suite running the services over a real backend.
//!
//! Every test wires an `AppState` around the factory's store, so the same
//! flows run against memory and Postgres.
//!
//! # Generated Tests
//!
//! - `test_private_follow_lifecycle` — request, pending list, accept, remove
//! - `test_reject_pending_only` — reject pending; rejecting accepted is a conflict
//! - `test_public_owner_never_lists_pending`
//! - `test_private_content_follows_edge_state` — posts, comments, likes gate on acceptance
//! - `test_feed_includes_visible_followees`
//! - `test_deleted_comment_keeps_thread`
//! - `test_delete_post_cascades`

/// Generate the social flow suite.
///
/// `$factory` must evaluate to a `Clone` backend with `insert_user` and
/// `set_private`.
#[macro_export]
macro_rules! social_flow_tests {
    ($factory:expr) => {
        mod social_flow_tests {
            use super::*;
            use snapgraph::config::AppConfig;
            use snapgraph::content::{AddCommentRequest, CreatePostRequest};
            use snapgraph::core::error::SocialError;
            use snapgraph::core::follow::FollowState;
            use snapgraph::core::query::PageRequest;
            use snapgraph::core::store::Stores;
            use snapgraph::follows::Visibility;
            use snapgraph::server::AppState;
            use uuid::Uuid;

            fn state_for<B>(store: &B) -> AppState
            where
                B: Clone
                    + snapgraph::core::store::FollowStore
                    + snapgraph::core::store::UserDirectory
                    + snapgraph::core::store::PostStore
                    + snapgraph::core::store::CommentStore
                    + snapgraph::core::store::LikeStore
                    + 'static,
            {
                AppState::new(Stores::from_backend(store.clone()), AppConfig::default())
            }

            fn post_request(description: &str) -> CreatePostRequest {
                CreatePostRequest {
                    description: description.to_string(),
                    pictures: pictures(1),
                }
            }

            fn comment_request(post_id: Uuid, content: &str, parent: Option<Uuid>) -> AddCommentRequest {
                AddCommentRequest {
                    post_id,
                    content: content.to_string(),
                    parent_comment_id: parent,
                }
            }

            // ==================================================================
            // Follow lifecycle
            // ==================================================================

            #[tokio::test]
            async fn test_private_follow_lifecycle() {
                let store = $factory;
                let state = state_for(&store);
                let owner = store.insert_user(profile("flow_owner", true)).await.unwrap();
                let fan = store.insert_user(profile("flow_fan", false)).await.unwrap();

                let edge = state.follows.follow_user(fan.id, owner.id).await.unwrap();
                assert!(!edge.accepted);
                assert_eq!(
                    state.follows.get_follow_status(fan.id, owner.id).await.state(),
                    FollowState::Pending
                );

                let pending = state
                    .follows
                    .get_not_accepted_followers(owner.id, PageRequest::default())
                    .await
                    .unwrap();
                assert_eq!(pending.items, vec![fan.summary()]);

                let accepted = state.follows.accept_follow(owner.id, fan.id).await.unwrap();
                assert!(accepted.accepted);
                assert!(
                    state
                        .follows
                        .get_follow_status(fan.id, owner.id)
                        .await
                        .grants_access()
                );
                assert!(
                    state
                        .follows
                        .get_not_accepted_followers(owner.id, PageRequest::default())
                        .await
                        .unwrap()
                        .is_empty()
                );

                let followers = state
                    .follows
                    .get_followers(owner.id, PageRequest::default())
                    .await
                    .unwrap();
                assert_eq!(followers.total_count, 1);
                let found = state
                    .follows
                    .find_user_in_follows(fan.id, &owner.username)
                    .await
                    .unwrap();
                assert_eq!(found.id, owner.id);

                state.follows.remove_follower(owner.id, fan.id).await.unwrap();
                assert_eq!(
                    state.follows.get_follow_status(fan.id, owner.id).await.state(),
                    FollowState::NoRelation
                );
                assert!(matches!(
                    state.follows.remove_follower(owner.id, fan.id).await,
                    Err(SocialError::NotFound { .. })
                ));
            }

            #[tokio::test]
            async fn test_reject_pending_only() {
                let store = $factory;
                let state = state_for(&store);
                let owner = store.insert_user(profile("reject_owner", true)).await.unwrap();
                let fan = store.insert_user(profile("reject_fan", false)).await.unwrap();

                state.follows.follow_user(fan.id, owner.id).await.unwrap();
                state.follows.reject_follow(owner.id, fan.id).await.unwrap();
                assert_eq!(
                    state.follows.get_follow_status(fan.id, owner.id).await.state(),
                    FollowState::NoRelation
                );

                state.follows.follow_user(fan.id, owner.id).await.unwrap();
                state.follows.accept_follow(owner.id, fan.id).await.unwrap();
                assert!(matches!(
                    state.follows.reject_follow(owner.id, fan.id).await,
                    Err(SocialError::Conflict { .. })
                ));
                assert!(matches!(
                    state.follows.accept_follow(owner.id, fan.id).await,
                    Err(SocialError::Conflict { .. })
                ));
                assert!(
                    state
                        .follows
                        .get_follow_status(fan.id, owner.id)
                        .await
                        .grants_access()
                );
            }

            #[tokio::test]
            async fn test_public_owner_never_lists_pending() {
                let store = $factory;
                let state = state_for(&store);
                let owner = store.insert_user(profile("public_owner", false)).await.unwrap();
                let fan = store.insert_user(profile("public_fan", false)).await.unwrap();

                state.follows.follow_user(fan.id, owner.id).await.unwrap();

                let pending = state
                    .follows
                    .get_not_accepted_followers(owner.id, PageRequest::default())
                    .await
                    .unwrap();
                assert!(pending.is_empty());
                assert_eq!(pending.total_count, 0);

                // Going private surfaces the stored request
                store.set_private(&owner.id, true).await.unwrap();
                let pending = state
                    .follows
                    .get_not_accepted_followers(owner.id, PageRequest::default())
                    .await
                    .unwrap();
                assert_eq!(pending.total_count, 1);
            }

            // ==================================================================
            // Gated content
            // ==================================================================

            #[tokio::test]
            async fn test_private_content_follows_edge_state() {
                let store = $factory;
                let state = state_for(&store);
                let owner = store.insert_user(profile("gate_owner", true)).await.unwrap();
                let fan = store.insert_user(profile("gate_fan", false)).await.unwrap();

                let post = state
                    .posts
                    .create_post(owner.id, post_request("private sunset"))
                    .await
                    .unwrap();

                for requester in [None, Some(fan.id)] {
                    assert!(matches!(
                        state.posts.get_post(requester, post.id).await,
                        Err(SocialError::Forbidden { .. })
                    ));
                }
                assert_eq!(
                    state.guard.check(Some(fan.id), owner.id).await.unwrap().1,
                    Visibility::Deny
                );

                state.follows.follow_user(fan.id, owner.id).await.unwrap();
                assert!(matches!(
                    state.likes.like_post(fan.id, post.id).await,
                    Err(SocialError::Forbidden { .. })
                ));

                state.follows.accept_follow(owner.id, fan.id).await.unwrap();
                assert_eq!(
                    state.posts.get_post(Some(fan.id), post.id).await.unwrap().id,
                    post.id
                );
                state.likes.like_post(fan.id, post.id).await.unwrap();
                state
                    .comments
                    .add_comment(fan.id, comment_request(post.id, "lovely", None))
                    .await
                    .unwrap();

                let view = state.posts.get_post(Some(owner.id), post.id).await.unwrap();
                assert_eq!(view.like_count, 1);

                // Removing the follower closes the gate again
                state.follows.remove_follower(owner.id, fan.id).await.unwrap();
                assert!(matches!(
                    state
                        .comments
                        .get_comments_for_post(Some(fan.id), post.id, PageRequest::default())
                        .await,
                    Err(SocialError::Forbidden { .. })
                ));
                assert!(matches!(
                    state
                        .likes
                        .get_likes_for_post(Some(fan.id), post.id, PageRequest::default())
                        .await,
                    Err(SocialError::Forbidden { .. })
                ));
            }

            #[tokio::test]
            async fn test_feed_includes_visible_followees() {
                let store = $factory;
                let state = state_for(&store);
                let reader = store.insert_user(profile("feed_reader", false)).await.unwrap();
                let open = store.insert_user(profile("feed_open", false)).await.unwrap();
                let closed = store.insert_user(profile("feed_closed", true)).await.unwrap();

                let own = state.posts.create_post(reader.id, post_request("mine")).await.unwrap();
                let public = state.posts.create_post(open.id, post_request("public")).await.unwrap();
                let hidden = state.posts.create_post(closed.id, post_request("hidden")).await.unwrap();

                state.follows.follow_user(reader.id, open.id).await.unwrap();
                state.follows.follow_user(reader.id, closed.id).await.unwrap();

                let feed = state.posts.get_feed(reader.id, PageRequest::default()).await.unwrap();
                let ids: Vec<Uuid> = feed.items.iter().map(|p| p.id).collect();
                assert!(ids.contains(&own.id));
                assert!(ids.contains(&public.id));
                assert!(!ids.contains(&hidden.id));

                state.follows.accept_follow(closed.id, reader.id).await.unwrap();
                let feed = state.posts.get_feed(reader.id, PageRequest::default()).await.unwrap();
                assert_eq!(feed.total_count, 3);
            }

            // ==================================================================
            // Comments and cascades
            // ==================================================================

            #[tokio::test]
            async fn test_deleted_comment_keeps_thread() {
                let store = $factory;
                let state = state_for(&store);
                let author = store.insert_user(profile("thread_author", false)).await.unwrap();
                let replier = store.insert_user(profile("thread_replier", false)).await.unwrap();

                let post = state.posts.create_post(author.id, post_request("thread")).await.unwrap();
                let top = state
                    .comments
                    .add_comment(author.id, comment_request(post.id, "first!", None))
                    .await
                    .unwrap();
                let reply = state
                    .comments
                    .add_comment(replier.id, comment_request(post.id, "agreed", Some(top.id)))
                    .await
                    .unwrap();
                assert!(reply.is_reply);

                state.comments.delete_comment(author.id, top.id).await.unwrap();

                let listed = state
                    .comments
                    .get_comments_for_post(None, post.id, PageRequest::default())
                    .await
                    .unwrap();
                assert_eq!(listed.items.len(), 1);
                let masked = &listed.items[0];
                assert_eq!(masked.id, top.id);
                assert!(masked.is_deleted);
                assert_eq!(masked.content, "[Deleted]");
                assert_eq!(masked.author.display_name, "[Removed]");

                let replies = state
                    .comments
                    .get_replies_for_comment(None, top.id, PageRequest::default())
                    .await
                    .unwrap();
                assert_eq!(replies.items.len(), 1);
                assert_eq!(replies.items[0].author.id, replier.id);

                assert!(matches!(
                    state
                        .comments
                        .add_comment(replier.id, comment_request(post.id, "late", Some(top.id)))
                        .await,
                    Err(SocialError::NotFound { .. })
                ));
            }

            #[tokio::test]
            async fn test_delete_post_cascades() {
                let store = $factory;
                let state = state_for(&store);
                let author = store.insert_user(profile("cascade_author", false)).await.unwrap();
                let fan = store.insert_user(profile("cascade_fan", false)).await.unwrap();

                let post = state.posts.create_post(author.id, post_request("bye")).await.unwrap();
                let comment = state
                    .comments
                    .add_comment(fan.id, comment_request(post.id, "nice", None))
                    .await
                    .unwrap();
                state.likes.like_post(fan.id, post.id).await.unwrap();
                state.likes.like_comment(author.id, comment.id).await.unwrap();

                assert!(matches!(
                    state.posts.delete_post(fan.id, post.id).await,
                    Err(SocialError::Forbidden { .. })
                ));
                state.posts.delete_post(author.id, post.id).await.unwrap();

                assert!(matches!(
                    state.posts.get_post(None, post.id).await,
                    Err(SocialError::NotFound { .. })
                ));
                assert!(matches!(
                    state
                        .likes
                        .get_likes_for_comment(None, comment.id, PageRequest::default())
                        .await,
                    Err(SocialError::NotFound { .. })
                ));
            }
        }
    };
}
