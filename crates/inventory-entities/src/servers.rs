//! Entity для таблицы servers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Статус доступности сервера по результату последнего ping.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "SERVER_UP")]
    #[serde(rename = "SERVER_UP")]
    Up,

    #[sea_orm(string_value = "SERVER_DOWN")]
    #[serde(rename = "SERVER_DOWN")]
    Down,
}

impl Status {
    /// Статус по результату проверки доступности.
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            Status::Up
        } else {
            Status::Down
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "servers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Первичный ключ, назначается базой при вставке
    #[sea_orm(primary_key)]
    pub id: i32,

    /// IP-адрес сервера (уникальный)
    #[sea_orm(unique)]
    pub ip_address: String,

    pub name: Option<String>,

    /// Объём памяти в свободной форме ("16 GB")
    pub memory: Option<String>,

    /// Тип сервера в свободной форме
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub server_type: Option<String>,

    /// URL картинки, выбирается сервисом при создании
    pub image_url: String,

    pub status: Status,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
