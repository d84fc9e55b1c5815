//! Follow edges and the status derived from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directed follow relationship (follower → followee)
///
/// At most one edge exists per ordered pair. `accepted == false` marks a
/// pending request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    /// The user who asked to follow
    pub follower_id: Uuid,

    /// The user being followed
    pub followee_id: Uuid,

    /// Whether the followee accepted the request
    pub accepted: bool,

    /// When the request was made
    pub created_at: DateTime<Utc>,
}

impl FollowEdge {
    /// Create a pending edge
    pub fn pending(follower_id: Uuid, followee_id: Uuid) -> Self {
        Self {
            follower_id,
            followee_id,
            accepted: false,
            created_at: Utc::now(),
        }
    }

    /// Composite identity of this edge
    pub fn key(&self) -> (Uuid, Uuid) {
        (self.follower_id, self.followee_id)
    }

    pub fn state(&self) -> FollowState {
        if self.accepted {
            FollowState::Accepted
        } else {
            FollowState::Pending
        }
    }
}

/// State of an ordered pair in the follow state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowState {
    NoRelation,
    Pending,
    Accepted,
}

/// Follow status between a requester and a target
///
/// `is_follow_accepted` implies `is_already_in_follows`; the only way to
/// build one is from an optional edge, which keeps that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStatus {
    is_already_in_follows: bool,
    is_follow_accepted: bool,
}

impl FollowStatus {
    /// No edge between the pair
    pub const NONE: FollowStatus = FollowStatus {
        is_already_in_follows: false,
        is_follow_accepted: false,
    };

    pub fn from_edge(edge: Option<&FollowEdge>) -> Self {
        match edge {
            None => Self::NONE,
            Some(edge) => Self {
                is_already_in_follows: true,
                is_follow_accepted: edge.accepted,
            },
        }
    }

    pub fn is_already_in_follows(&self) -> bool {
        self.is_already_in_follows
    }

    pub fn is_follow_accepted(&self) -> bool {
        self.is_follow_accepted
    }

    /// True only for an accepted edge
    pub fn grants_access(&self) -> bool {
        self.is_already_in_follows && self.is_follow_accepted
    }

    pub fn state(&self) -> FollowState {
        match (self.is_already_in_follows, self.is_follow_accepted) {
            (true, true) => FollowState::Accepted,
            (true, false) => FollowState::Pending,
            _ => FollowState::NoRelation,
        }
    }
}

/// Filter over stored edges
///
/// Every `Some` field must match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeQuery {
    pub follower_id: Option<Uuid>,
    pub followee_id: Option<Uuid>,
    pub accepted: Option<bool>,
}

impl EdgeQuery {
    /// Edges leaving `user_id` (who they follow)
    pub fn follows_of(user_id: Uuid) -> Self {
        Self {
            follower_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Edges arriving at `user_id` (who follows them)
    pub fn followers_of(user_id: Uuid) -> Self {
        Self {
            followee_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Pending requests addressed to `user_id`
    pub fn pending_for(user_id: Uuid) -> Self {
        Self {
            followee_id: Some(user_id),
            accepted: Some(false),
            ..Self::default()
        }
    }

    pub fn matches(&self, edge: &FollowEdge) -> bool {
        self.follower_id.is_none_or(|id| edge.follower_id == id)
            && self.followee_id.is_none_or(|id| edge.followee_id == id)
            && self.accepted.is_none_or(|accepted| edge.accepted == accepted)
    }
}

/// Sort key for edge listings (always ascending)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrder {
    ByFollower,
    ByFollowee,
}

impl EdgeOrder {
    pub fn sort(&self, edges: &mut [FollowEdge]) {
        match self {
            EdgeOrder::ByFollower => edges.sort_by_key(|e| (e.follower_id, e.followee_id)),
            EdgeOrder::ByFollowee => edges.sort_by_key(|e| (e.followee_id, e.follower_id)),
        }
    }
}
