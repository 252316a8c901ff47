use serde::Serialize;

/// State of a like pair after a like/unlike call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub likes: u64,
}

/// State of a follow pair after a follow/unfollow call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowStatus {
    pub following: bool,
    pub followers: u64,
}
