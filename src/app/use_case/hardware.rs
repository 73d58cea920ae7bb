use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    app::resource::hardware::{
        CreateHardware, HardwareResponse, OrderItemResponse, OrderResponse, PlaceOrder,
        PutOrderStatus,
    },
    config::event::EventSettings,
    domain::{
        datatype::choice::OrderStatus,
        entity::{
            event::Profile,
            hardware::{Order, OrderItem},
            iam::User,
            Entity,
        },
        validation::{self, hardware::Stock, FieldErrors},
    },
    error::{
        app::ApplicationError,
        persistence::PersistenceError,
        resource::{NotFoundError, OperationCode, OperationError, ValidationError},
    },
    infra::database::repository,
};

pub async fn list_hardware(pool: &PgPool) -> Result<Vec<HardwareResponse>, ApplicationError<()>> {
    let hardware = repository::hardware::list_hardware(pool).await?;

    Ok(hardware
        .iter()
        .map(|(hardware, remaining)| (hardware, *remaining).into())
        .collect())
}

pub async fn create_hardware(
    pool: &PgPool,
    dto: CreateHardware,
) -> Result<HardwareResponse, ApplicationError<CreateHardware>> {
    let hardware = validation::hardware::hardware(&dto)
        .map_err(|errors| ValidationError::from_resource(dto, errors))?;

    repository::hardware::insert_hardware(pool, &hardware).await?;

    tracing::info!(hardware_id = %hardware.ident(), name = %hardware.name(), "hardware created");

    Ok((&hardware, hardware.quantity_available()).into())
}

async fn team_profile<R>(pool: &PgPool, user: &User) -> Result<Profile, ApplicationError<R>> {
    let profile = repository::event::find_profile_by_user(pool, user.ident())
        .await?
        .ok_or_else(|| {
            OperationError::new(
                OperationCode::ProfileRequired,
                "You must create a profile before ordering hardware.",
            )
        })?;

    Ok(profile)
}

/// Orders with their items, in the order given.
async fn order_responses(
    conn: &mut PgConnection,
    orders: &[Order],
) -> Result<Vec<OrderResponse>, PersistenceError> {
    let ids: Vec<Uuid> = orders.iter().map(Entity::ident).collect();
    let mut items: HashMap<Uuid, Vec<OrderItemResponse>> = HashMap::new();
    for (order_id, item) in repository::hardware::order_items(&mut *conn, &ids).await? {
        items.entry(order_id).or_default().push(item);
    }

    let mut team_codes: HashMap<Uuid, String> = HashMap::new();
    let mut responses = Vec::with_capacity(orders.len());
    for order in orders {
        let team_code = match team_codes.get(&order.team_id()) {
            Some(code) => code.clone(),
            None => {
                let code = repository::event::find_team(&mut *conn, order.team_id())
                    .await?
                    .map(|team| team.team_code().to_string())
                    .unwrap_or_default();
                team_codes.insert(order.team_id(), code.clone());
                code
            }
        };

        responses.push(OrderResponse {
            id: order.ident(),
            created: order.created(),
            updated: order.updated(),
            version: order.version(),
            team_id: order.team_id(),
            team_code,
            status: order.status(),
            items: items.remove(&order.ident()).unwrap_or_default(),
        });
    }

    Ok(responses)
}

async fn order_response(
    conn: &mut PgConnection,
    order: &Order,
) -> Result<OrderResponse, PersistenceError> {
    let mut responses = order_responses(conn, std::slice::from_ref(order)).await?;

    responses.pop().ok_or(PersistenceError::NotFound)
}

/// Check out hardware for the team of `user`.
pub async fn place_order(
    pool: &PgPool,
    settings: &EventSettings,
    now: DateTime<Utc>,
    user: &User,
    dto: PlaceOrder,
) -> Result<OrderResponse, ApplicationError<PlaceOrder>> {
    let profile = team_profile::<PlaceOrder>(pool, user).await?;

    if !settings.schedule.is_hardware_sign_out_open(now) {
        return Err(OperationError::new(
            OperationCode::HardwareSignOutClosed,
            "Hardware sign out is closed.",
        )
        .into());
    }

    let requested = match validation::hardware::order_items(&dto.items) {
        Ok(requested) => requested,
        Err(errors) => return Err(ValidationError::from_resource(dto, errors).into()),
    };
    let team_id = profile.team_id();

    let mut trx = pool.begin().await?;
    let members = repository::event::count_team_profiles(&mut trx, team_id).await?;
    validation::hardware::team_size(members, settings.min_members, settings.max_members)?;

    let ids: Vec<Uuid> = requested.iter().map(|(id, _)| *id).collect();
    let hardware = repository::hardware::lock_hardware(&mut trx, &ids).await?;
    let held: HashMap<Uuid, (u32, u32)> =
        repository::hardware::held_quantities(&mut trx, &ids, team_id)
            .await?
            .into_iter()
            .map(|(id, total, team)| (id, (total, team)))
            .collect();

    let stock: HashMap<Uuid, Stock> = hardware
        .iter()
        .map(|hardware| {
            let (total, team) = held.get(&hardware.ident()).copied().unwrap_or_default();
            let stock = Stock {
                name: hardware.name().clone(),
                quantity_remaining: hardware.quantity_available().saturating_sub(total),
                max_per_team: hardware.max_per_team(),
                team_holding: team,
            };
            (hardware.ident(), stock)
        })
        .collect();
    validation::hardware::availability(&requested, &stock)?;

    let order = Order::new(team_id);
    let items: Vec<OrderItem> = requested
        .iter()
        .flat_map(|(hardware_id, quantity)| {
            (0..*quantity).map(|_| OrderItem::new(order.ident(), *hardware_id))
        })
        .collect();

    repository::hardware::insert_order(&mut trx, &order).await?;
    repository::hardware::insert_order_items(&mut trx, &items).await?;
    let response = order_response(&mut trx, &order).await?;
    trx.commit().await?;

    tracing::info!(
        order_id = %order.ident(),
        %team_id,
        units = items.len(),
        "hardware order placed"
    );

    Ok(response)
}

pub async fn team_orders(
    pool: &PgPool,
    user: &User,
) -> Result<Vec<OrderResponse>, ApplicationError<()>> {
    let profile = team_profile::<()>(pool, user).await?;

    let orders = repository::hardware::list_team_orders(pool, profile.team_id()).await?;
    let mut conn = pool.acquire().await?;

    Ok(order_responses(&mut conn, &orders).await?)
}

/// A team withdraws one of its orders before it is prepared.
pub async fn cancel_order(
    pool: &PgPool,
    user: &User,
    order_id: Uuid,
) -> Result<OrderResponse, ApplicationError<()>> {
    let profile = team_profile::<()>(pool, user).await?;

    let mut trx = pool.begin().await?;
    let mut order = repository::hardware::lock_order(&mut trx, order_id)
        .await?
        .filter(|order| order.team_id() == profile.team_id())
        .ok_or_else(|| NotFoundError::of::<OrderResponse>(order_id))?;

    if order.status() != OrderStatus::Submitted {
        return Err(OperationError::new(
            OperationCode::OrderNotCancellable,
            format!(
                "Only submitted orders can be cancelled, this order is {}.",
                order.status()
            ),
        )
        .into());
    }

    order.set_status(OrderStatus::Cancelled);
    repository::hardware::update_order_status(&mut trx, &order).await?;
    let response = order_response(&mut trx, &order).await?;
    trx.commit().await?;

    tracing::info!(%order_id, "hardware order cancelled");

    Ok(response)
}

pub async fn update_order_status(
    pool: &PgPool,
    order_id: Uuid,
    dto: PutOrderStatus,
) -> Result<OrderResponse, ApplicationError<PutOrderStatus>> {
    let mut errors = FieldErrors::new();
    let status = match errors.choice::<OrderStatus>("/status", &dto.status) {
        Some(status) => status,
        None => return Err(ValidationError::from_resource(dto, errors.into_vec()).into()),
    };

    let mut trx = pool.begin().await?;
    let mut order = repository::hardware::lock_order(&mut trx, order_id)
        .await?
        .ok_or_else(|| NotFoundError::of::<OrderResponse>(order_id))?;

    order.set_status(status);
    repository::hardware::update_order_status(&mut trx, &order).await?;
    let response = order_response(&mut trx, &order).await?;
    trx.commit().await?;

    tracing::info!(%order_id, %status, "hardware order status changed");

    Ok(response)
}
