use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde::Deserialize;
use serial_test::serial;

use crate::setup::{setup_test, sign_up_and_login};

mod setup;

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardResponse {
    pub state: String,
    pub rsvp: Option<bool>,
    pub review_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventInfoResponse {
    pub hackathon_name: String,
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn event_info_is_public() {
    let (client, url, _pool) = setup_test().await;

    let res = client
        .get(url.join("/api/event").unwrap())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let info: EventInfoResponse = res.json().await.unwrap();
    assert!(!info.hackathon_name.is_empty());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn dashboard_without_application() {
    let (client, url, _pool) = setup_test().await;
    let token = sign_up_and_login(&client, &url, "linus@example.com").await;

    let res = client
        .get(url.join("/api/registration/dashboard").unwrap())
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let dashboard: DashboardResponse = res.json().await.unwrap();
    assert!(dashboard.state == "application_incomplete" || dashboard.state == "applications_closed");
    assert_eq!(dashboard.rsvp, None);
    assert_eq!(dashboard.review_status, None);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn application_not_found_before_submission() {
    let (client, url, _pool) = setup_test().await;
    let token = sign_up_and_login(&client, &url, "linus@example.com").await;

    let res = client
        .get(url.join("/api/registration/application").unwrap())
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn resume_must_be_pdf() {
    let (client, url, _pool) = setup_test().await;
    let token = sign_up_and_login(&client, &url, "linus@example.com").await;

    let res = client
        .put(url.join("/api/registration/resume").unwrap())
        .bearer_auth(&token)
        .header("content-type", "text/plain")
        .body("not a pdf")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn review_requires_staff() {
    let (client, url, _pool) = setup_test().await;
    let token = sign_up_and_login(&client, &url, "linus@example.com").await;

    let res = client
        .get(url.join("/api/review/applications").unwrap())
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
