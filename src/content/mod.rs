//! Posts, comments and likes
//!
//! Every read resolves the owning user (post author, or the author of the
//! post a comment belongs to) and runs the [`VisibilityGuard`] before any
//! data is fetched.
//!
//! [`VisibilityGuard`]: crate::follows::VisibilityGuard

pub mod comments;
pub mod handlers;
pub mod likes;
pub mod posts;

pub use comments::{AddCommentRequest, CommentService, EditCommentRequest};
pub use likes::LikeService;
pub use posts::{CreatePostRequest, EditPostRequest, PostService};

use crate::core::content::UserSummary;
use crate::core::error::{SocialResult, StorageContext};
use crate::core::store::UserDirectory;
use std::collections::HashMap;
use uuid::Uuid;

/// Summaries for a set of users, keyed by id
async fn summaries_by_id(
    users: &dyn UserDirectory,
    ids: impl IntoIterator<Item = Uuid>,
) -> SocialResult<HashMap<Uuid, UserSummary>> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();

    Ok(users
        .get_users(&ids)
        .await
        .or_storage("get_users")?
        .into_iter()
        .map(|user| (user.id, user.summary()))
        .collect())
}
