//! Database entities.

pub mod peer_rating;
pub mod schedule;
pub mod schedule_like;
pub mod team;
pub mod team_follow;
pub mod user;
pub mod user_follow;

pub use peer_rating::Entity as PeerRating;
pub use schedule::Entity as Schedule;
pub use schedule_like::Entity as ScheduleLike;
pub use team::Entity as Team;
pub use team_follow::Entity as TeamFollow;
pub use user::Entity as User;
pub use user_follow::Entity as UserFollow;
