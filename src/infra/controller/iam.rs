use async_trait::async_trait;
use salvo::{http::StatusCode, writer::Json, Depot, FlowCtrl, Handler, Request, Response};

use super::{controller, map_res_err};
use crate::{
    app::{
        resource::iam::{ChangePassword, CreateUser, UserCredential},
        use_case,
    },
    error::http::BadRequest,
};

controller!(
    SignUpController,
    AuthenticateUserController,
    CurrentUserController,
    ChangePasswordController,
);

#[async_trait]
impl Handler for SignUpController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result: Result<CreateUser, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result =
            use_case::iam::sign_up(&self.ctx.pool, self.ctx.hash_service.as_ref(), dto).await;
        let user = map_res_err!(result, res);

        res.render(Json(user));
        res.set_status_code(StatusCode::CREATED);
    }
}

#[async_trait]
impl Handler for AuthenticateUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result: Result<UserCredential, _> = req.parse_body().await.map_err(BadRequest::from);
        let credential = map_res_err!(result, res);

        let result = use_case::iam::authenticate(
            &self.ctx.pool,
            self.ctx.hash_service.as_ref(),
            self.ctx.token_service.as_ref(),
            credential,
        )
        .await;
        let auth_response = map_res_err!(result, res);

        res.render(Json(auth_response));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for CurrentUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<()>(req).await, res);

        let result = use_case::iam::current_user(&self.ctx.pool, &user).await;
        let resource = map_res_err!(result, res);

        res.render(Json(resource));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for ChangePasswordController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<ChangePassword>(req).await, res);

        let result: Result<ChangePassword, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::iam::change_password(
            &self.ctx.pool,
            self.ctx.hash_service.as_ref(),
            user,
            dto,
        )
        .await;
        let resource = map_res_err!(result, res);

        res.render(Json(resource));
        res.set_status_code(StatusCode::OK);
    }
}
