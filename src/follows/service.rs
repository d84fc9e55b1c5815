//! Follow state machine
//!
//! Per ordered pair (follower, followee) the states are
//! `NoRelation -> Pending -> Accepted`; both `Pending` and `Accepted` go back
//! to `NoRelation` when the edge is removed. Every mutation reports a typed
//! [`SocialError`] instead of a bare success flag.

use crate::core::content::{UserProfile, UserSummary};
use crate::core::error::{SocialError, SocialResult, StorageContext, user_not_found};
use crate::core::follow::{EdgeOrder, EdgeQuery, FollowEdge, FollowStatus};
use crate::core::query::{Page, PageLimits, PageRequest};
use crate::core::store::{FollowStore, UserDirectory};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

fn follow_not_found(follower_id: &Uuid, followee_id: &Uuid) -> SocialError {
    SocialError::not_found("follow", format!("{follower_id}->{followee_id}"))
}

/// Follow operations over a [`FollowStore`]
#[derive(Clone)]
pub struct FollowService {
    edges: Arc<dyn FollowStore>,
    users: Arc<dyn UserDirectory>,
    limits: PageLimits,
}

impl FollowService {
    pub fn new(edges: Arc<dyn FollowStore>, users: Arc<dyn UserDirectory>, limits: PageLimits) -> Self {
        Self {
            edges,
            users,
            limits,
        }
    }

    /// Create a pending edge `follower -> followee`
    pub async fn follow_user(&self, follower_id: Uuid, followee_id: Uuid) -> SocialResult<FollowEdge> {
        if follower_id == followee_id {
            return Err(SocialError::validation("user_id", "Users cannot follow themselves"));
        }

        self.users
            .get_user(&followee_id)
            .await
            .or_storage("get_user")?
            .ok_or_else(|| user_not_found(followee_id))?;

        if self
            .edges
            .find_edge(&follower_id, &followee_id)
            .await
            .or_storage("find_edge")?
            .is_some()
        {
            return Err(SocialError::conflict("User is already in follows"));
        }

        let edge = FollowEdge::pending(follower_id, followee_id);
        if !self
            .edges
            .insert_edge(edge.clone())
            .await
            .or_storage("insert_edge")?
        {
            return Err(SocialError::conflict("User is already in follows"));
        }

        tracing::debug!(%follower_id, %followee_id, "follow requested");
        Ok(edge)
    }

    /// Status of the edge `follower -> followee`
    ///
    /// Never fails: a storage error is logged and reported as no relation.
    pub async fn get_follow_status(&self, follower_id: Uuid, followee_id: Uuid) -> FollowStatus {
        match self.edges.find_edge(&follower_id, &followee_id).await {
            Ok(edge) => FollowStatus::from_edge(edge.as_ref()),
            Err(err) => {
                tracing::warn!(%follower_id, %followee_id, error = %err, "follow status lookup failed");
                FollowStatus::NONE
            }
        }
    }

    /// Remove the caller's own edge, whatever its state
    pub async fn unfollow_user(&self, follower_id: Uuid, followee_id: Uuid) -> SocialResult<()> {
        if !self
            .edges
            .remove_edge(&follower_id, &followee_id)
            .await
            .or_storage("remove_edge")?
        {
            return Err(follow_not_found(&follower_id, &followee_id));
        }

        tracing::debug!(%follower_id, %followee_id, "unfollowed");
        Ok(())
    }

    /// `Pending -> Accepted` for the edge `requester -> accepter`
    pub async fn accept_follow(&self, accepter_id: Uuid, requester_id: Uuid) -> SocialResult<FollowEdge> {
        let mut edge = self.pending_edge(&requester_id, &accepter_id).await?;
        edge.accepted = true;

        if !self
            .edges
            .update_edge(edge.clone())
            .await
            .or_storage("update_edge")?
        {
            return Err(follow_not_found(&requester_id, &accepter_id));
        }

        tracing::debug!(%accepter_id, %requester_id, "follow accepted");
        Ok(edge)
    }

    /// `Pending -> NoRelation` for the edge `requester -> accepter`
    ///
    /// An accepted edge cannot be rejected; use [`FollowService::remove_follower`].
    pub async fn reject_follow(&self, accepter_id: Uuid, requester_id: Uuid) -> SocialResult<()> {
        self.pending_edge(&requester_id, &accepter_id).await?;

        if !self
            .edges
            .remove_edge(&requester_id, &accepter_id)
            .await
            .or_storage("remove_edge")?
        {
            return Err(follow_not_found(&requester_id, &accepter_id));
        }

        tracing::debug!(%accepter_id, %requester_id, "follow rejected");
        Ok(())
    }

    /// The owner drops the edge `follower -> owner`, pending or accepted
    pub async fn remove_follower(&self, owner_id: Uuid, follower_id: Uuid) -> SocialResult<()> {
        if !self
            .edges
            .remove_edge(&follower_id, &owner_id)
            .await
            .or_storage("remove_edge")?
        {
            return Err(follow_not_found(&follower_id, &owner_id));
        }

        tracing::debug!(%owner_id, %follower_id, "follower removed");
        Ok(())
    }

    /// Requesters waiting for `owner_id` to accept, ordered by id
    ///
    /// Empty for a public owner even when pending edges are stored.
    pub async fn get_not_accepted_followers(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> SocialResult<Page<UserSummary>> {
        let page = page.clamp(self.limits);
        let is_private = self
            .users
            .get_privacy_flag(&owner_id)
            .await
            .or_storage("get_privacy_flag")?
            .ok_or_else(|| user_not_found(owner_id))?;

        if !is_private {
            return Ok(Page::empty(page));
        }

        let edges = self
            .edges
            .query_edges(EdgeQuery::pending_for(owner_id), EdgeOrder::ByFollower, page)
            .await
            .or_storage("query_edges")?;

        self.summaries(edges, |edge| edge.follower_id).await
    }

    /// Users `user_id` follows, ordered by followee id
    pub async fn get_follows(&self, user_id: Uuid, page: PageRequest) -> SocialResult<Page<UserSummary>> {
        let edges = self
            .edges
            .query_edges(
                EdgeQuery::follows_of(user_id),
                EdgeOrder::ByFollowee,
                page.clamp(self.limits),
            )
            .await
            .or_storage("query_edges")?;

        self.summaries(edges, |edge| edge.followee_id).await
    }

    /// Users following `user_id`, ordered by follower id
    pub async fn get_followers(&self, user_id: Uuid, page: PageRequest) -> SocialResult<Page<UserSummary>> {
        let edges = self
            .edges
            .query_edges(
                EdgeQuery::followers_of(user_id),
                EdgeOrder::ByFollower,
                page.clamp(self.limits),
            )
            .await
            .or_storage("query_edges")?;

        self.summaries(edges, |edge| edge.follower_id).await
    }

    /// Look up `username` among the users `user_id` follows
    pub async fn find_user_in_follows(&self, user_id: Uuid, username: &str) -> SocialResult<UserSummary> {
        let user = self.user_by_username(username).await?;
        self.edges
            .find_edge(&user_id, &user.id)
            .await
            .or_storage("find_edge")?
            .ok_or_else(|| SocialError::not_found("follow", username))?;

        Ok(user.summary())
    }

    /// Look up `username` among the users following `user_id`
    pub async fn find_user_in_followers(&self, user_id: Uuid, username: &str) -> SocialResult<UserSummary> {
        let user = self.user_by_username(username).await?;
        self.edges
            .find_edge(&user.id, &user_id)
            .await
            .or_storage("find_edge")?
            .ok_or_else(|| SocialError::not_found("follower", username))?;

        Ok(user.summary())
    }

    async fn pending_edge(&self, follower_id: &Uuid, followee_id: &Uuid) -> SocialResult<FollowEdge> {
        let edge = self
            .edges
            .find_edge(follower_id, followee_id)
            .await
            .or_storage("find_edge")?
            .ok_or_else(|| follow_not_found(follower_id, followee_id))?;

        if edge.accepted {
            return Err(SocialError::conflict("Follow request was already accepted"));
        }
        Ok(edge)
    }

    async fn user_by_username(&self, username: &str) -> SocialResult<UserProfile> {
        self.users
            .find_by_username(username)
            .await
            .or_storage("find_by_username")?
            .ok_or_else(|| SocialError::not_found("user", username))
    }

    /// Resolve the user on one side of each edge, keeping the page order
    async fn summaries(
        &self,
        edges: Page<FollowEdge>,
        side: impl Fn(&FollowEdge) -> Uuid,
    ) -> SocialResult<Page<UserSummary>> {
        let ids: Vec<Uuid> = edges.items.iter().map(&side).collect();
        let profiles: HashMap<Uuid, UserSummary> = self
            .users
            .get_users(&ids)
            .await
            .or_storage("get_users")?
            .into_iter()
            .map(|user| (user.id, user.summary()))
            .collect();

        Ok(edges.filter_map(|edge| profiles.get(&side(&edge)).cloned()))
    }
}
