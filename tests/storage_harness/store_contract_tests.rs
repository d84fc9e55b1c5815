//! Macro-generated test suite for the store trait contracts.
//!
//! # Generated Tests
//!
//! ## FollowStore
//! - `test_edge_insert_find_remove` — insert, find, duplicate insert, remove
//! - `test_edge_update_requires_existing` — update on a missing pair is `false`
//! - `test_query_edges_filters_and_orders` — pending filter, ascending order, paging
//!
//! ## UserDirectory
//! - `test_user_lookup` — by id, by username, batch, privacy flag
//!
//! ## PostStore / CommentStore / LikeStore
//! - `test_posts_newest_first` — ordering across several authors
//! - `test_comments_threads` — top-level vs replies, update, delete_for_post
//! - `test_likes_unique_and_ordered` — duplicate insert, count, order, delete

/// Generate the store contract suite.
///
/// `$factory` must evaluate to a backend implementing every store trait.
#[macro_export]
macro_rules! store_contract_tests {
    ($factory:expr) => {
        mod store_contract_tests {
            use super::*;
            use snapgraph::core::content::{Comment, Like, LikeTarget, Post};
            use snapgraph::core::follow::{EdgeOrder, EdgeQuery, FollowEdge};
            use snapgraph::core::query::PageRequest;
            use snapgraph::core::store::{
                CommentStore, FollowStore, LikeStore, PostStore, UserDirectory,
            };
            use uuid::Uuid;

            // ==================================================================
            // FollowStore
            // ==================================================================

            #[tokio::test]
            async fn test_edge_insert_find_remove() {
                let store = $factory;
                let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

                assert!(store.insert_edge(FollowEdge::pending(a, b)).await.unwrap());
                assert!(!store.insert_edge(FollowEdge::pending(a, b)).await.unwrap());

                let found = store.find_edge(&a, &b).await.unwrap().unwrap();
                assert_eq!(found.key(), (a, b));
                assert!(!found.accepted);
                assert!(store.find_edge(&b, &a).await.unwrap().is_none());

                assert!(store.remove_edge(&a, &b).await.unwrap());
                assert!(!store.remove_edge(&a, &b).await.unwrap());
            }

            #[tokio::test]
            async fn test_edge_update_requires_existing() {
                let store = $factory;
                let mut edge = FollowEdge::pending(Uuid::new_v4(), Uuid::new_v4());
                edge.accepted = true;

                assert!(!store.update_edge(edge.clone()).await.unwrap());

                edge.accepted = false;
                store.insert_edge(edge.clone()).await.unwrap();
                edge.accepted = true;
                assert!(store.update_edge(edge.clone()).await.unwrap());

                let stored = store
                    .find_edge(&edge.follower_id, &edge.followee_id)
                    .await
                    .unwrap()
                    .unwrap();
                assert!(stored.accepted);
            }

            #[tokio::test]
            async fn test_query_edges_filters_and_orders() {
                let store = $factory;
                let owner = Uuid::new_v4();
                let mut pending: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();

                for follower in &pending {
                    store
                        .insert_edge(FollowEdge::pending(*follower, owner))
                        .await
                        .unwrap();
                }
                let mut accepted = FollowEdge::pending(Uuid::new_v4(), owner);
                accepted.accepted = true;
                store.insert_edge(accepted).await.unwrap();
                pending.sort();

                let page = store
                    .query_edges(
                        EdgeQuery::pending_for(owner),
                        EdgeOrder::ByFollower,
                        PageRequest::new(1, 3),
                    )
                    .await
                    .unwrap();
                assert_eq!(page.total_count, 4);
                assert_eq!(page.total_pages, 2);
                let ids: Vec<Uuid> = page.items.iter().map(|e| e.follower_id).collect();
                assert_eq!(ids, pending[..3].to_vec());

                let all = store
                    .query_edges(
                        EdgeQuery::followers_of(owner),
                        EdgeOrder::ByFollower,
                        everything(),
                    )
                    .await
                    .unwrap();
                assert_eq!(all.total_count, 5);
            }

            // ==================================================================
            // UserDirectory
            // ==================================================================

            #[tokio::test]
            async fn test_user_lookup() {
                let store = $factory;
                let suffix = Uuid::new_v4().simple().to_string();
                let open = store
                    .insert_user(profile(&format!("open_{suffix}"), false))
                    .await
                    .unwrap();
                let closed = store
                    .insert_user(profile(&format!("closed_{suffix}"), true))
                    .await
                    .unwrap();

                assert_eq!(store.get_user(&open.id).await.unwrap(), Some(open.clone()));
                assert_eq!(
                    store
                        .find_by_username(&closed.username)
                        .await
                        .unwrap()
                        .map(|u| u.id),
                    Some(closed.id)
                );
                assert_eq!(
                    store
                        .get_users(&[open.id, Uuid::new_v4(), closed.id])
                        .await
                        .unwrap()
                        .len(),
                    2
                );

                assert_eq!(store.get_privacy_flag(&closed.id).await.unwrap(), Some(true));
                assert!(store.set_private(&closed.id, false).await.unwrap());
                assert_eq!(store.get_privacy_flag(&closed.id).await.unwrap(), Some(false));
                assert_eq!(store.get_privacy_flag(&Uuid::new_v4()).await.unwrap(), None);
            }

            // ==================================================================
            // Content
            // ==================================================================

            #[tokio::test]
            async fn test_posts_newest_first() {
                let store = $factory;
                let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

                let mut first = Post::new(a, "first", pictures(1));
                first.date_posted = first.date_posted - chrono::Duration::minutes(10);
                let second = Post::new(b, "second", pictures(2));
                store.insert_post(first.clone()).await.unwrap();
                store.insert_post(second.clone()).await.unwrap();
                store
                    .insert_post(Post::new(Uuid::new_v4(), "other", pictures(1)))
                    .await
                    .unwrap();

                let page = store.posts_by_users(&[a, b], everything()).await.unwrap();
                let ids: Vec<Uuid> = page.items.iter().map(|p| p.id).collect();
                assert_eq!(ids, vec![second.id, first.id]);
                assert_eq!(page.items[1].pictures.len(), 1);

                let mut edited = first.clone();
                edited.description = "edited".to_string();
                assert!(store.update_post(edited).await.unwrap());
                assert_eq!(
                    store.get_post(&first.id).await.unwrap().unwrap().description,
                    "edited"
                );

                assert!(store.delete_post(&first.id).await.unwrap());
                assert!(!store.delete_post(&first.id).await.unwrap());
            }

            #[tokio::test]
            async fn test_comments_threads() {
                let store = $factory;
                let (post_id, user_id) = (Uuid::new_v4(), Uuid::new_v4());

                let mut top = Comment::new(post_id, user_id, "top", None);
                top.date_posted = top.date_posted - chrono::Duration::minutes(5);
                let later = Comment::new(post_id, user_id, "later", None);
                let reply = Comment::new(post_id, user_id, "reply", Some(top.id));
                for comment in [later.clone(), top.clone(), reply.clone()] {
                    store.insert_comment(comment).await.unwrap();
                }

                let page = store.comments_for_post(&post_id, everything()).await.unwrap();
                let ids: Vec<Uuid> = page.items.iter().map(|c| c.id).collect();
                assert_eq!(ids, vec![top.id, later.id]);

                let replies = store.replies_for_comment(&top.id, everything()).await.unwrap();
                assert_eq!(replies.items.len(), 1);
                assert_eq!(replies.items[0].parent_comment_id, Some(top.id));

                let mut deleted = top.clone();
                deleted.is_deleted = true;
                deleted.content = "[Deleted]".to_string();
                assert!(store.update_comment(deleted).await.unwrap());
                assert!(store.get_comment(&top.id).await.unwrap().unwrap().is_deleted);

                let mut removed = store.delete_for_post(&post_id).await.unwrap();
                removed.sort();
                let mut expected = vec![top.id, later.id, reply.id];
                expected.sort();
                assert_eq!(removed, expected);
            }

            #[tokio::test]
            async fn test_likes_unique_and_ordered() {
                let store = $factory;
                let target = LikeTarget::Comment(Uuid::new_v4());
                let mut users: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

                for user in &users {
                    assert!(store.insert_like(Like::new(*user, target)).await.unwrap());
                }
                assert!(!store.insert_like(Like::new(users[0], target)).await.unwrap());
                assert_eq!(store.count_likes(&target).await.unwrap(), 3);
                assert_eq!(
                    store
                        .count_likes(&LikeTarget::Post(Uuid::new_v4()))
                        .await
                        .unwrap(),
                    0
                );

                users.sort();
                let page = store.likes_for(&target, everything()).await.unwrap();
                let ids: Vec<Uuid> = page.items.iter().map(|l| l.user_id).collect();
                assert_eq!(ids, users);

                assert!(store.remove_like(&users[0], &target).await.unwrap());
                assert!(!store.remove_like(&users[0], &target).await.unwrap());

                store.delete_for_target(&target).await.unwrap();
                assert_eq!(store.count_likes(&target).await.unwrap(), 0);
            }
        }
    };
}
