use url::Url;
use uuid::Uuid;

use crate::domain::datatype::choice::OrderStatus;

use super::{impl_entity, state_copy, state_ref, EntityData, EntityState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareState {
    pub(in crate::domain) name: String,
    pub(in crate::domain) model_number: String,
    pub(in crate::domain) manufacturer: String,
    pub(in crate::domain) datasheet: Option<Url>,
    pub(in crate::domain) quantity_available: u32,
    pub(in crate::domain) max_per_team: Option<u32>,
    pub(in crate::domain) notes: String,
}

/// Equipment lent to teams during the event.
#[derive(Debug, Clone)]
pub struct Hardware {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: HardwareState,
}

impl EntityState for Hardware {
    type State = HardwareState;
}

impl_entity!(Hardware);

impl Hardware {
    state_ref!(name, String);
    state_ref!(model_number, String);
    state_ref!(manufacturer, String);
    state_ref!(datasheet, Option<Url>);
    state_copy!(quantity_available, u32);
    state_copy!(max_per_team, Option<u32>);
    state_ref!(notes, String);

    pub fn new(
        name: String,
        model_number: String,
        manufacturer: String,
        datasheet: Option<Url>,
        quantity_available: u32,
        max_per_team: Option<u32>,
        notes: String,
    ) -> Self {
        Self::restore(
            EntityData::new(),
            HardwareState {
                name,
                model_number,
                manufacturer,
                datasheet,
                quantity_available,
                max_per_team,
                notes,
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderState {
    pub(in crate::domain) team_id: Uuid,
    pub(in crate::domain) status: OrderStatus,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: OrderState,
}

impl EntityState for Order {
    type State = OrderState;
}

impl_entity!(Order);

impl Order {
    state_copy!(team_id, Uuid);
    state_copy!(status, OrderStatus);

    pub fn new(team_id: Uuid) -> Self {
        Self::restore(
            EntityData::new(),
            OrderState {
                team_id,
                status: OrderStatus::Submitted,
            },
        )
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.state.status = status;
        self.data.touch();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemState {
    pub(in crate::domain) order_id: Uuid,
    pub(in crate::domain) hardware_id: Uuid,
}

/// A single unit of hardware inside an order.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: OrderItemState,
}

impl EntityState for OrderItem {
    type State = OrderItemState;
}

impl_entity!(OrderItem);

impl OrderItem {
    state_copy!(order_id, Uuid);
    state_copy!(hardware_id, Uuid);

    pub fn new(order_id: Uuid, hardware_id: Uuid) -> Self {
        Self::restore(
            EntityData::new(),
            OrderItemState {
                order_id,
                hardware_id,
            },
        )
    }
}
