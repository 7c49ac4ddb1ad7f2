//! Appointment database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Appointment, AppointmentStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub start_at: DateTimeUtc,
    pub end_at: DateTimeUtc,
    pub status: String,
    pub note: Option<String>,
    pub price_snapshot: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::Id"
    )]
    Service,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Appointment {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status: AppointmentStatus = model
            .status
            .parse()
            .map_err(|e: String| DbErr::Type(e))?;
        Ok(Appointment {
            id: model.id,
            user_id: model.user_id,
            service_id: model.service_id,
            start_at: model.start_at,
            end_at: model.end_at,
            status,
            note: model.note,
            price_snapshot: model.price_snapshot,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
