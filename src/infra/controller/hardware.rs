use async_trait::async_trait;
use chrono::Utc;
use salvo::{http::StatusCode, writer::Json, Depot, FlowCtrl, Handler, Request, Response};

use super::{controller, extract_id, map_res_err};
use crate::{
    app::{
        resource::hardware::{CreateHardware, PlaceOrder, PutOrderStatus},
        use_case,
    },
    error::http::BadRequest,
};

controller!(
    ListHardwareController,
    CreateHardwareController,
    PlaceOrderController,
    TeamOrdersController,
    CancelOrderController,
    UpdateOrderStatusController,
);

#[async_trait]
impl Handler for ListHardwareController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        map_res_err!(self.ctx.user::<()>(req).await, res);

        let result = use_case::hardware::list_hardware(&self.ctx.pool).await;
        let hardware = map_res_err!(result, res);

        res.render(Json(hardware));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for CreateHardwareController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        map_res_err!(self.ctx.staff::<CreateHardware>(req).await, res);

        let result: Result<CreateHardware, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::hardware::create_hardware(&self.ctx.pool, dto).await;
        let hardware = map_res_err!(result, res);

        res.render(Json(hardware));
        res.set_status_code(StatusCode::CREATED);
    }
}

#[async_trait]
impl Handler for PlaceOrderController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<PlaceOrder>(req).await, res);

        let result: Result<PlaceOrder, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::hardware::place_order(
            &self.ctx.pool,
            self.ctx.settings,
            Utc::now(),
            &user,
            dto,
        )
        .await;
        let order = map_res_err!(result, res);

        res.render(Json(order));
        res.set_status_code(StatusCode::CREATED);
    }
}

#[async_trait]
impl Handler for TeamOrdersController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<()>(req).await, res);

        let result = use_case::hardware::team_orders(&self.ctx.pool, &user).await;
        let orders = map_res_err!(result, res);

        res.render(Json(orders));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for CancelOrderController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<()>(req).await, res);
        let id = map_res_err!(extract_id(req), res);

        let result = use_case::hardware::cancel_order(&self.ctx.pool, &user, id).await;
        let order = map_res_err!(result, res);

        res.render(Json(order));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for UpdateOrderStatusController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        map_res_err!(self.ctx.staff::<PutOrderStatus>(req).await, res);
        let id = map_res_err!(extract_id(req), res);

        let result: Result<PutOrderStatus, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::hardware::update_order_status(&self.ctx.pool, id, dto).await;
        let order = map_res_err!(result, res);

        res.render(Json(order));
        res.set_status_code(StatusCode::OK);
    }
}
