//! Working hour database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::WorkingHour;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "working_hours")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub day_of_week: i32,
    pub start_min: i32,
    pub end_min: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for WorkingHour {
    fn from(model: Model) -> Self {
        WorkingHour {
            id: model.id,
            day_of_week: model.day_of_week,
            start_min: model.start_min,
            end_min: model.end_min,
        }
    }
}
