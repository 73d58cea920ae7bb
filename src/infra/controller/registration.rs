use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use salvo::{http::StatusCode, writer::Json, Depot, FlowCtrl, Handler, Request, Response};

use super::{controller, map_res_err};
use crate::{
    app::{
        resource::registration::{JoinTeam, PutRsvp, SubmitApplication},
        use_case::{self, registration::RESUME_MAX_SIZE},
    },
    error::{
        app::ApplicationError,
        http::{BadRequest, UploadError},
    },
};

controller!(
    DashboardController,
    UploadResumeController,
    SubmitApplicationController,
    GetApplicationController,
    RsvpController,
    GetTeamController,
    JoinTeamController,
    LeaveTeamController,
);

#[async_trait]
impl Handler for DashboardController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<()>(req).await, res);

        let result = use_case::registration::get_dashboard(
            &self.ctx.pool,
            self.ctx.settings,
            Utc::now(),
            &user,
        )
        .await;
        let dashboard = map_res_err!(result, res);

        res.render(Json(dashboard));
        res.set_status_code(StatusCode::OK);
    }
}

fn header(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

/// Read the request body, stopping as soon as it grows past `limit` bytes.
async fn read_body(req: &mut Request, limit: u64) -> Result<Vec<u8>, BadRequest> {
    let mut body = req.take_body().unwrap_or_default();
    let mut content = Vec::new();

    while let Some(chunk) = body
        .try_next()
        .await
        .map_err(|_| BadRequest::InvalidContent)?
    {
        content.extend_from_slice(&chunk);
        if content.len() as u64 > limit {
            break;
        }
    }

    Ok(content)
}

#[async_trait]
impl Handler for UploadResumeController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        map_res_err!(self.ctx.user::<()>(req).await, res);

        let content_length = header(req, "content-length").and_then(|value| value.parse().ok());
        if let Some(size) = content_length.filter(|size| *size > RESUME_MAX_SIZE) {
            let err = UploadError::TooLarge {
                size,
                limit: RESUME_MAX_SIZE,
            };
            res.render(ApplicationError::<()>::from(err));
            return;
        }

        let content_type = header(req, "content-type");
        let content = map_res_err!(read_body(req, RESUME_MAX_SIZE).await, res);

        let result = use_case::registration::upload_resume(
            self.ctx.storage.as_ref(),
            content_type.as_deref(),
            &content,
        )
        .await;
        let resume = map_res_err!(result, res);

        res.render(Json(resume));
        res.set_status_code(StatusCode::CREATED);
    }
}

#[async_trait]
impl Handler for SubmitApplicationController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<SubmitApplication>(req).await, res);

        let result: Result<SubmitApplication, _> =
            req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::registration::submit_application(
            &self.ctx.pool,
            self.ctx.settings,
            Utc::now(),
            &user,
            dto,
        )
        .await;
        let application = map_res_err!(result, res);

        res.render(Json(application));
        res.set_status_code(StatusCode::CREATED);
    }
}

#[async_trait]
impl Handler for GetApplicationController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<()>(req).await, res);

        let result = use_case::registration::get_application(&self.ctx.pool, &user).await;
        let application = map_res_err!(result, res);

        res.render(Json(application));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for RsvpController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<()>(req).await, res);

        let result: Result<PutRsvp, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::registration::rsvp(
            &self.ctx.pool,
            self.ctx.settings,
            Utc::now(),
            &user,
            dto,
        )
        .await;
        let application = map_res_err!(result, res);

        res.render(Json(application));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for GetTeamController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<()>(req).await, res);

        let result =
            use_case::registration::get_team(&self.ctx.pool, self.ctx.settings, &user).await;
        let team = map_res_err!(result, res);

        res.render(Json(team));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for JoinTeamController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<JoinTeam>(req).await, res);

        let result: Result<JoinTeam, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::registration::join_team(
            &self.ctx.pool,
            self.ctx.settings,
            Utc::now(),
            &user,
            dto,
        )
        .await;
        let team = map_res_err!(result, res);

        res.render(Json(team));
        res.set_status_code(StatusCode::OK);
    }
}

#[async_trait]
impl Handler for LeaveTeamController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let user = map_res_err!(self.ctx.user::<()>(req).await, res);

        let result = use_case::registration::leave_team(
            &self.ctx.pool,
            self.ctx.settings,
            Utc::now(),
            &user,
        )
        .await;
        let team = map_res_err!(result, res);

        res.render(Json(team));
        res.set_status_code(StatusCode::OK);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use salvo::hyper;

    use super::*;

    fn chunked_request(chunks: Vec<Vec<u8>>) -> Request {
        let stream = futures::stream::iter(chunks.into_iter().map(Ok::<_, std::io::Error>));
        hyper::Request::builder()
            .body(hyper::Body::wrap_stream(stream))
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn body_is_read_whole_within_the_limit() {
        let mut req = chunked_request(vec![vec![1; 4], vec![2; 4], vec![3; 4]]);

        let content = read_body(&mut req, 12).await.unwrap();
        assert_eq!(content.len(), 12);
        assert_eq!(&content[8..], &[3, 3, 3, 3]);
    }

    #[tokio::test]
    async fn body_reading_stops_past_the_limit() {
        let mut req = chunked_request(vec![vec![0; 4]; 1000]);

        let content = read_body(&mut req, 10).await.unwrap();
        assert_eq!(content.len(), 12);
    }

    #[tokio::test]
    async fn missing_body_is_empty() {
        let mut req = Request::default();
        req.take_body();

        assert!(read_body(&mut req, 10).await.unwrap().is_empty());
    }
}
