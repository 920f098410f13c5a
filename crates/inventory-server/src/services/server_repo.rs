//! Прямые запросы к таблице servers.

use inventory_entities::servers::{ActiveModel, Column, Entity as ServerEntity, Model, Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

/// Поля новой записи. `id` назначает база.
pub struct NewRecord {
    pub ip_address: String,
    pub name: Option<String>,
    pub memory: Option<String>,
    pub server_type: Option<String>,
    pub image_url: String,
    pub status: Status,
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, DbErr> {
    ServerEntity::find_by_id(id).one(db).await
}

pub async fn find_by_ip_address(
    db: &DatabaseConnection,
    ip_address: &str,
) -> Result<Option<Model>, DbErr> {
    ServerEntity::find()
        .filter(Column::IpAddress.eq(ip_address))
        .one(db)
        .await
}

pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, DbErr> {
    ServerEntity::find()
        .filter(Column::Name.eq(name))
        .one(db)
        .await
}

pub async fn insert(db: &DatabaseConnection, record: NewRecord) -> Result<Model, DbErr> {
    let model = ActiveModel {
        id: NotSet,
        ip_address: Set(record.ip_address),
        name: Set(record.name),
        memory: Set(record.memory),
        server_type: Set(record.server_type),
        image_url: Set(record.image_url),
        status: Set(record.status),
    };
    model.insert(db).await
}

/// Перезаписать все поля существующей строки.
/// Если строки с таким id нет, возвращает `DbErr::RecordNotUpdated`.
pub async fn update(db: &DatabaseConnection, server: Model) -> Result<Model, DbErr> {
    server.into_active_model().reset_all().update(db).await
}

/// Удалить по id. Возвращает число удалённых строк.
pub async fn delete_by_id(db: &DatabaseConnection, id: i32) -> Result<u64, DbErr> {
    let result = ServerEntity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}

/// Первая страница размером `limit`, по возрастанию id.
pub async fn first_page(db: &DatabaseConnection, limit: u64) -> Result<Vec<Model>, DbErr> {
    ServerEntity::find()
        .order_by_asc(Column::Id)
        .paginate(db, limit)
        .fetch_page(0)
        .await
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    ServerEntity::find().count(db).await
}
