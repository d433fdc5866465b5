use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tournament_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "tournament_id")]
    pub tournament_id: String,
    #[sea_orm(primary_key, auto_increment = false, column_name = "user_id")]
    pub user_id: String,
    pub score: i64,
    #[sea_orm(column_name = "group_id")]
    pub group_id: String,
    #[sea_orm(column_name = "claimed_reward")]
    pub claimed_reward: bool,
    #[sea_orm(column_name = "claimed_at")]
    pub claimed_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "entered_at")]
    pub entered_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tournaments::Entity",
        from = "Column::TournamentId",
        to = "super::tournaments::Column::Id"
    )]
    Tournament,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::UserId",
        to = "super::players::Column::Id"
    )]
    Player,
}

impl Related<super::tournaments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tournament.def()
    }
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
