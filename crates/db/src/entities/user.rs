//! User entity (player profiles).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    pub username_lower: String,

    /// Access token
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    /// Avatar URL (CDN-hosted)
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Home city
    #[sea_orm(nullable)]
    pub city: Option<String>,

    /// Preferred position (pivot, ala, fixo, goleiro)
    #[sea_orm(nullable)]
    pub position: Option<String>,

    /// Self-assessed shooting skill
    #[sea_orm(default_value = 0.0)]
    pub self_shooting: f64,

    /// Self-assessed passing skill
    #[sea_orm(default_value = 0.0)]
    pub self_passing: f64,

    /// Self-assessed stamina
    #[sea_orm(default_value = 0.0)]
    pub self_stamina: f64,

    /// Self-assessed physicality
    #[sea_orm(default_value = 0.0)]
    pub self_physical: f64,

    /// Self-assessed dribbling skill
    #[sea_orm(default_value = 0.0)]
    pub self_dribbling: f64,

    /// Self-assessed defense skill
    #[sea_orm(default_value = 0.0)]
    pub self_defense: f64,

    /// Followers count (denormalized)
    #[sea_orm(default_value = 0)]
    pub followers_count: i32,

    /// Following count (denormalized)
    #[sea_orm(default_value = 0)]
    pub following_count: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::schedule::Entity")]
    Schedule,

    #[sea_orm(has_many = "super::schedule_like::Entity")]
    ScheduleLike,

    #[sea_orm(has_many = "super::team_follow::Entity")]
    TeamFollow,
}

impl Related<super::schedule_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleLike.def()
    }
}

impl Related<super::team_follow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamFollow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
