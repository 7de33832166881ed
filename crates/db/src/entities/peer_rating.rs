//! Peer rating entity (one player rates another across six skill dimensions).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "peer_rating")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// User who submitted the rating
    pub rater_id: String,

    /// Player being rated
    pub subject_id: String,

    pub shooting: f64,
    pub passing: f64,
    pub stamina: f64,
    pub physical: f64,
    pub dribbling: f64,
    pub defense: f64,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RaterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Rater,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SubjectId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,
}

impl ActiveModelBehavior for ActiveModel {}
