//! Schedule entity (planned matches).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Team hosting the match
    #[sea_orm(indexed)]
    pub team_id: String,

    /// User who posted the schedule
    #[sea_orm(indexed)]
    pub created_by: String,

    /// Opposing team name (free text)
    #[sea_orm(nullable)]
    pub opponent: Option<String>,

    /// Venue name
    #[sea_orm(nullable)]
    pub venue: Option<String>,

    /// Kick-off time
    pub starts_at: DateTimeWithTimeZone,

    /// Likes count (denormalized)
    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_delete = "Cascade"
    )]
    Team,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,

    #[sea_orm(has_many = "super::schedule_like::Entity")]
    ScheduleLike,
}

impl Related<super::schedule_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleLike.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_related<R: EntityTrait>()
    where
        Entity: Related<R>,
    {
    }

    // The user and team entities declare has_many schedule relations, which
    // require the inverse Related impls here to resolve.
    #[test]
    fn test_schedule_links_to_creator_team_and_likes() {
        assert_related::<super::super::user::Entity>();
        assert_related::<super::super::team::Entity>();
        assert_related::<super::super::schedule_like::Entity>();
    }
}
