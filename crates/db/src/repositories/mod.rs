//! Database repositories.

mod peer_rating;
mod schedule;
mod schedule_like;
mod team;
mod team_follow;
mod user;
mod user_follow;

pub use peer_rating::PeerRatingRepository;
pub use schedule::ScheduleRepository;
pub use schedule_like::ScheduleLikeRepository;
pub use team::TeamRepository;
pub use team_follow::TeamFollowRepository;
pub use user::UserRepository;
pub use user_follow::UserFollowRepository;
