use pretty_assertions::assert_eq;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serial_test::serial;
use url::Url;
use uuid::Uuid;

use crate::setup::{applicant, setup_test, staff, Identified, ReviewDto};

mod setup;

#[derive(Debug, Clone, Deserialize)]
pub struct SendDecisionsResponse {
    pub sent: u64,
}

async fn application_id(client: &Client, url: &Url, token: &str) -> Uuid {
    let res = client
        .get(url.join("/api/registration/application").unwrap())
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json::<Identified>().await.unwrap().id
}

async fn review(client: &Client, url: &Url, staff_token: &str, id: Uuid, status: &str) {
    let res = client
        .put(url.join(&format!("/api/review/applications/{id}")).unwrap())
        .bearer_auth(staff_token)
        .json(&ReviewDto { status })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

async fn send_decisions(client: &Client, url: &Url, staff_token: &str) -> u64 {
    let res = client
        .post(url.join("/api/review/decisions").unwrap())
        .bearer_auth(staff_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json::<SendDecisionsResponse>().await.unwrap().sent
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn decisions_skip_incomplete_and_resend_changed_status() {
    let (client, url, pool) = setup_test().await;
    let staff_token = staff(&client, &url, &pool, "grace@hopper.com").await;
    let incomplete = applicant(&client, &url, "ada@lovelace.com").await;
    let waitlisted = applicant(&client, &url, "charles@babbage.com").await;
    let incomplete = application_id(&client, &url, &incomplete).await;
    let waitlisted = application_id(&client, &url, &waitlisted).await;

    review(&client, &url, &staff_token, incomplete, "Incomplete").await;
    review(&client, &url, &staff_token, waitlisted, "Waitlisted").await;
    assert_eq!(send_decisions(&client, &url, &staff_token).await, 1);
    assert_eq!(send_decisions(&client, &url, &staff_token).await, 0);

    review(&client, &url, &staff_token, waitlisted, "Waitlisted").await;
    assert_eq!(send_decisions(&client, &url, &staff_token).await, 0);

    review(&client, &url, &staff_token, waitlisted, "Accepted").await;
    review(&client, &url, &staff_token, incomplete, "Rejected").await;
    assert_eq!(send_decisions(&client, &url, &staff_token).await, 2);

    let unsent: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM review.review WHERE decision_sent_date IS NULL",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(unsent, 0);
}
