use futures::TryStreamExt;
use sqlx::{Executor, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::super::sql;
use crate::{
    app::resource::hardware::OrderItemResponse,
    domain::{
        entity::{
            hardware::{Hardware, Order, OrderItem},
            Entity,
        },
    },
    error::persistence::PersistenceError,
};

const HARDWARE_COLUMNS: &str = concat!(
    "h.id, h.created, h.updated, h.version, h.name, h.model_number, h.manufacturer, ",
    "h.datasheet, h.quantity_available, h.max_per_team, h.notes",
);

const ORDER_COLUMNS: &str = "o.id, o.created, o.updated, o.version, o.team_id, o.status";

/// Units held in orders that were neither cancelled nor returned.
const HELD_ITEMS: &str = concat!(
    "SELECT oi.hardware_id, o.team_id FROM hardware.order_item oi ",
    "JOIN hardware.order o ON o.id = oi.order_id ",
    "WHERE o.status NOT IN ('Cancelled', 'Returned')",
);

pub async fn insert_hardware<'e, E>(exec: E, hardware: &Hardware) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(&format!(
        "INSERT INTO hardware.hardware ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        HARDWARE_COLUMNS.replace("h.", ""),
    ))
    .bind(hardware.ident())
    .bind(hardware.created())
    .bind(hardware.updated())
    .bind(sql::version(hardware.version()))
    .bind(hardware.name())
    .bind(hardware.model_number())
    .bind(hardware.manufacturer())
    .bind(hardware.datasheet().as_ref().map(|url| url.to_string()))
    .bind(hardware.quantity_available() as i32)
    .bind(hardware.max_per_team().map(|max| max as i32))
    .bind(hardware.notes())
    .execute(exec)
    .await?;

    Ok(())
}

/// Every hardware item and its remaining quantity.
pub async fn list_hardware<'e, E>(exec: E) -> Result<Vec<(Hardware, u32)>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let query = format!(
        concat!(
            "SELECT {}, COALESCE(held.quantity, 0) AS held FROM hardware.hardware h ",
            "LEFT JOIN (SELECT hardware_id, COUNT(*) AS quantity FROM ({}) items GROUP BY hardware_id) held ",
            "ON held.hardware_id = h.id ORDER BY h.name, h.id",
        ),
        HARDWARE_COLUMNS, HELD_ITEMS,
    );
    let mut rows = sqlx::query(&query).fetch(exec);

    let mut list = Vec::new();
    while let Some(row) = rows.try_next().await? {
        let hardware = Hardware::try_from(&row)?;
        let held: i64 = row.try_get("held")?;
        let remaining = hardware
            .quantity_available()
            .saturating_sub(sql::count(held));
        list.push((hardware, remaining));
    }

    Ok(list)
}

/// Lock the requested hardware rows until the end of the transaction.
pub async fn lock_hardware<'e, E>(exec: E, ids: &[Uuid]) -> Result<Vec<Hardware>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::new(format!(
        "SELECT {HARDWARE_COLUMNS} FROM hardware.hardware h WHERE h.id IN "
    ));
    sql::push_list(&mut qb, ids.iter().copied());
    qb.push(" ORDER BY h.id FOR UPDATE");

    let rows = qb.build().fetch_all(exec).await?;

    Ok(rows
        .iter()
        .map(Hardware::try_from)
        .collect::<Result<_, _>>()?)
}

/// Units held by every team and by `team_id`, per hardware item.
pub async fn held_quantities<'e, E>(
    exec: E,
    ids: &[Uuid],
    team_id: Uuid,
) -> Result<Vec<(Uuid, u32, u32)>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query(&format!(
        concat!(
            "SELECT hardware_id, COUNT(*) AS total, COUNT(*) FILTER (WHERE team_id = $2) AS team ",
            "FROM ({}) items WHERE hardware_id = ANY($1) GROUP BY hardware_id",
        ),
        HELD_ITEMS,
    ))
    .bind(ids)
    .bind(team_id)
    .fetch_all(exec)
    .await?;

    rows.iter()
        .map(|row| {
            Ok((
                row.try_get("hardware_id")?,
                sql::count(row.try_get("total")?),
                sql::count(row.try_get("team")?),
            ))
        })
        .collect::<Result<_, sqlx::Error>>()
        .map_err(PersistenceError::from)
}

pub async fn insert_order<'e, E>(exec: E, order: &Order) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(concat!(
        "INSERT INTO hardware.order (id, created, updated, version, team_id, status) ",
        "VALUES ($1, $2, $3, $4, $5, $6)",
    ))
    .bind(order.ident())
    .bind(order.created())
    .bind(order.updated())
    .bind(sql::version(order.version()))
    .bind(order.team_id())
    .bind(order.status().as_str())
    .execute(exec)
    .await?;

    Ok(())
}

pub async fn insert_order_items<'e, 'i, E, I>(exec: E, items: I) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
    I: IntoIterator<Item = &'i OrderItem>,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return Ok(());
    }

    let mut qb = QueryBuilder::new(
        "INSERT INTO hardware.order_item (id, created, updated, version, order_id, hardware_id) ",
    );

    qb.push_values(items, |mut qb, item| {
        qb.push_bind(item.ident());
        qb.push_bind(item.created());
        qb.push_bind(item.updated());
        qb.push_bind(sql::version(item.version()));
        qb.push_bind(item.order_id());
        qb.push_bind(item.hardware_id());
    });

    qb.build().execute(exec).await?;

    Ok(())
}

pub async fn lock_order<'e, E>(exec: E, id: Uuid) -> Result<Option<Order>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {ORDER_COLUMNS} FROM hardware.order o WHERE o.id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(Order::try_from).transpose()?)
}

pub async fn update_order_status<'e, E>(exec: E, order: &Order) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("UPDATE hardware.order SET status = $2, updated = $3, version = $4 WHERE id = $1")
        .bind(order.ident())
        .bind(order.status().as_str())
        .bind(order.updated())
        .bind(sql::version(order.version()))
        .execute(exec)
        .await?;

    Ok(())
}

pub async fn list_team_orders<'e, E>(exec: E, team_id: Uuid) -> Result<Vec<Order>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query(&format!(
        "SELECT {ORDER_COLUMNS} FROM hardware.order o WHERE o.team_id = $1 ORDER BY o.created DESC"
    ))
    .bind(team_id)
    .fetch_all(exec)
    .await?;

    Ok(rows.iter().map(Order::try_from).collect::<Result<_, _>>()?)
}

/// Units of every order, grouped by hardware item.
pub async fn order_items<'e, E>(
    exec: E,
    order_ids: &[Uuid],
) -> Result<Vec<(Uuid, OrderItemResponse)>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query(concat!(
        "SELECT oi.order_id, oi.hardware_id, h.name, COUNT(*) AS quantity ",
        "FROM hardware.order_item oi JOIN hardware.hardware h ON h.id = oi.hardware_id ",
        "WHERE oi.order_id = ANY($1) GROUP BY oi.order_id, oi.hardware_id, h.name ORDER BY h.name",
    ))
    .bind(order_ids)
    .fetch_all(exec)
    .await?;

    rows.iter()
        .map(|row| {
            Ok((
                row.try_get("order_id")?,
                OrderItemResponse {
                    hardware_id: row.try_get("hardware_id")?,
                    name: row.try_get("name")?,
                    quantity: sql::count(row.try_get("quantity")?),
                },
            ))
        })
        .collect::<Result<_, sqlx::Error>>()
        .map_err(PersistenceError::from)
}
