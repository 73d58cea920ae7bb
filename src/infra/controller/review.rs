use async_trait::async_trait;
use chrono::Utc;
use salvo::{http::StatusCode, writer::Json, Depot, FlowCtrl, Handler, Request, Response};

use super::{controller, extract_id, map_res_err};
use crate::{
    app::{
        resource::{page::PageQuery, review::PutReview},
        use_case,
    },
    error::http::BadRequest,
};

controller!(
    ListUsersReviewStatusController,
    ListApplicationsController,
    ReviewApplicationController,
    SendDecisionsController,
);

fn extract_page(req: &mut Request) -> Result<PageQuery, BadRequest> {
    req.parse_queries().map_err(|_| BadRequest::InvalidQuery)
}

#[async_trait]
impl Handler for ListUsersReviewStatusController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        map_res_err!(self.ctx.staff::<()>(req).await, res);
        let page = map_res_err!(extract_page(req), res);

        let result = use_case::review::list_users_review_status(&self.ctx.pool, page).await;
        let users = map_res_err!(result, res);

        res.render(Json(users));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for ListApplicationsController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        map_res_err!(self.ctx.staff::<()>(req).await, res);
        let page = map_res_err!(extract_page(req), res);

        let result = use_case::review::list_applications(&self.ctx.pool, page).await;
        let applications = map_res_err!(result, res);

        res.render(Json(applications));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for ReviewApplicationController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let reviewer = map_res_err!(self.ctx.staff::<PutReview>(req).await, res);
        let id = map_res_err!(extract_id(req), res);

        let result: Result<PutReview, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result =
            use_case::review::review_application(&self.ctx.pool, &reviewer, id, dto).await;
        let review = map_res_err!(result, res);

        res.render(Json(review));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for SendDecisionsController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        map_res_err!(self.ctx.staff::<()>(req).await, res);

        let result = use_case::review::send_decisions(&self.ctx.pool, Utc::now()).await;
        let sent = map_res_err!(result, res);

        res.render(Json(sent));
        res.set_status_code(StatusCode::OK);
    }
}
