use async_trait::async_trait;
use chrono::Utc;
use salvo::{http::StatusCode, writer::Json, Depot, FlowCtrl, Handler, Request, Response};

use super::{controller, extract_id, map_res_err};
use crate::{
    app::{
        resource::event::{CreateProfile, SignIn, UpdateCurrentProfile, UpdateProfile},
        use_case,
    },
    error::http::BadRequest,
};

controller!(
    EventInfoController,
    CreateProfileController,
    CurrentProfileController,
    UpdateCurrentProfileController,
    UpdateProfileController,
    DeleteProfileController,
    SignInController,
);

#[async_trait]
impl Handler for EventInfoController {
    async fn handle(&self, _: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let info = use_case::event::event_info(self.ctx.settings, Utc::now());

        res.render(Json(info));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for CreateProfileController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<CreateProfile>(req).await, res);

        let result: Result<CreateProfile, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::event::create_profile(
            &self.ctx.pool,
            self.ctx.settings,
            Utc::now(),
            &user,
            dto,
        )
        .await;
        let profile = map_res_err!(result, res);

        res.render(Json(profile));
        res.set_status_code(StatusCode::CREATED);
    }
}

#[async_trait]
impl Handler for CurrentProfileController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<()>(req).await, res);

        let result = use_case::event::current_profile(&self.ctx.pool, &user).await;
        let profile = map_res_err!(result, res);

        res.render(Json(profile));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for UpdateCurrentProfileController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<UpdateCurrentProfile>(req).await, res);

        let result: Result<UpdateCurrentProfile, _> =
            req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::event::update_current_profile(&self.ctx.pool, &user, dto).await;
        let profile = map_res_err!(result, res);

        res.render(Json(profile));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for UpdateProfileController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        map_res_err!(self.ctx.staff::<()>(req).await, res);
        let id = map_res_err!(extract_id(req), res);

        let result: Result<UpdateProfile, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::event::update_profile(&self.ctx.pool, id, dto).await;
        let profile = map_res_err!(result, res);

        res.render(Json(profile));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for DeleteProfileController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        map_res_err!(self.ctx.staff::<()>(req).await, res);
        let id = map_res_err!(extract_id(req), res);

        let result = use_case::event::delete_profile(&self.ctx.pool, id).await;
        map_res_err!(result, res);

        res.set_status_code(StatusCode::NO_CONTENT);
    }
}

#[async_trait]
impl Handler for SignInController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let staff = map_res_err!(self.ctx.staff::<SignIn>(req).await, res);

        let result: Result<SignIn, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::event::sign_in(
            &self.ctx.pool,
            self.ctx.settings,
            Utc::now(),
            &staff,
            dto,
        )
        .await;
        let activity = map_res_err!(result, res);

        res.render(Json(activity));
        res.set_status_code(StatusCode::CREATED);
    }
}
