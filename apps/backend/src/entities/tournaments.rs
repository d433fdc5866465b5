use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tournaments")]
pub struct Model {
    /// `YYYY-MM-DD`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "starts_at")]
    pub starts_at: OffsetDateTime,
    #[sea_orm(column_name = "ends_at")]
    pub ends_at: OffsetDateTime,
    pub active: bool,
    #[sea_orm(column_name = "group_index")]
    pub group_index: i32,
    #[sea_orm(column_name = "group_count")]
    pub group_count: i32,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tournament_entries::Entity")]
    TournamentEntries,
}

impl Related<super::tournament_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TournamentEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
