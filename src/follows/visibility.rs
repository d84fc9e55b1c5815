//! Privacy gate applied at every content boundary

use crate::core::content::UserProfile;
use crate::core::error::{SocialError, SocialResult, StorageContext, user_not_found};
use crate::core::store::UserDirectory;
use crate::follows::service::FollowService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Allow,
    Deny,
}

impl Visibility {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Visibility::Allow)
    }
}

/// Decides whether a requester may see content owned by someone
///
/// Each call re-reads the follow edge; nothing is cached between requests.
#[derive(Clone)]
pub struct VisibilityGuard {
    follows: FollowService,
    users: Arc<dyn UserDirectory>,
}

impl VisibilityGuard {
    pub fn new(follows: FollowService, users: Arc<dyn UserDirectory>) -> Self {
        Self { follows, users }
    }

    /// Decision for an owner whose privacy flag is already known
    pub async fn can_view(
        &self,
        requester_id: Option<Uuid>,
        owner_id: Uuid,
        owner_is_private: bool,
    ) -> Visibility {
        if !owner_is_private {
            return Visibility::Allow;
        }
        let Some(requester_id) = requester_id else {
            return Visibility::Deny;
        };
        if requester_id == owner_id {
            return Visibility::Allow;
        }

        if self
            .follows
            .get_follow_status(requester_id, owner_id)
            .await
            .grants_access()
        {
            Visibility::Allow
        } else {
            Visibility::Deny
        }
    }

    /// Resolve the owner's current privacy flag and decide
    pub async fn check(&self, requester_id: Option<Uuid>, owner_id: Uuid) -> SocialResult<(UserProfile, Visibility)> {
        let owner = self
            .users
            .get_user(&owner_id)
            .await
            .or_storage("get_user")?
            .ok_or_else(|| user_not_found(owner_id))?;

        let decision = self.can_view(requester_id, owner.id, owner.is_private).await;
        Ok((owner, decision))
    }

    /// Like [`VisibilityGuard::check`], turning `Deny` into `Forbidden`
    pub async fn authorize(&self, requester_id: Option<Uuid>, owner_id: Uuid) -> SocialResult<UserProfile> {
        match self.check(requester_id, owner_id).await? {
            (owner, Visibility::Allow) => Ok(owner),
            (_, Visibility::Deny) => {
                tracing::debug!(?requester_id, %owner_id, "visibility denied");
                Err(SocialError::forbidden("This profile is private"))
            }
        }
    }
}
