//! Follow graph read models.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Author;

/// Follow counters shown on a profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FollowStats {
    pub follower_count: u64,
    pub following_count: u64,
    /// The viewer is among the profile owner's followers
    pub is_follower: bool,
}

/// A user's follower set as listed to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FollowerSet {
    pub id: Uuid,
    /// Owner of the set: the user being followed
    pub user: Author,
}
