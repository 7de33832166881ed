//! Business logic services.

pub mod rating;
pub mod relationship;
pub mod schedule;
pub mod team;
pub mod user;
pub mod view;

pub use rating::{RatingService, RatingVector, RatingsAggregate, compute_displayed_ratings};
pub use relationship::{RelationshipKind, RelationshipService, ToggleResult};
pub use schedule::ScheduleService;
pub use team::TeamService;
pub use user::{UserProfileInput, UserService};
pub use view::{CacheViewInvalidator, ViewInvalidator, ViewTarget};
