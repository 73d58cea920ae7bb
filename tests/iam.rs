use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde::de::IgnoredAny;
use serial_test::serial;

use crate::setup::{
    setup_test, sign_up_and_login, AuthenticateUserResponse, CreateUserDto, CredentialDto,
    ErrorResponse, UserResponse, PASSWORD,
};

mod setup;

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn sign_up_user() {
    let (client, url, _pool) = setup_test().await;

    let dto = CreateUserDto {
        email: "ada@example.com",
        first_name: "Ada",
        last_name: "Lovelace",
        password1: PASSWORD,
        password2: PASSWORD,
    };
    let res = client
        .post(url.join("/api/auth/signup").unwrap())
        .json(&dto)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let user: UserResponse = res.json().await.unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.first_name, "Ada");
    assert_eq!(user.version, 1);
    assert!(!user.is_staff);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn sign_up_with_taken_email() {
    let (client, url, _pool) = setup_test().await;
    sign_up_and_login(&client, &url, "ada@example.com").await;

    let dto = CreateUserDto {
        email: "ADA@example.com",
        first_name: "Ada",
        last_name: "Byron",
        password1: PASSWORD,
        password2: PASSWORD,
    };
    let res = client
        .post(url.join("/api/auth/signup").unwrap())
        .json(&dto)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn login_and_fetch_current_user() {
    let (client, url, _pool) = setup_test().await;
    sign_up_and_login(&client, &url, "grace@example.com").await;

    let credential = CredentialDto {
        email: "grace@example.com",
        password: PASSWORD,
    };
    let res = client
        .post(url.join("/api/auth/login").unwrap())
        .json(&credential)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let auth: AuthenticateUserResponse = res.json().await.unwrap();

    let res = client
        .get(url.join("/api/user").unwrap())
        .bearer_auth(&auth.token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let user: UserResponse = res.json().await.unwrap();
    assert_eq!(user.id, auth.user.id);
    assert_eq!(user.email, "grace@example.com");
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn login_with_wrong_password() {
    let (client, url, _pool) = setup_test().await;
    sign_up_and_login(&client, &url, "grace@example.com").await;

    let credential = CredentialDto {
        email: "grace@example.com",
        password: "not-the-password",
    };
    let res = client
        .post(url.join("/api/auth/login").unwrap())
        .json(&credential)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn current_user_requires_token() {
    let (client, url, _pool) = setup_test().await;

    let res = client
        .get(url.join("/api/user").unwrap())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let err: ErrorResponse<IgnoredAny> = res.json().await.unwrap();
    assert!(!err.title.is_empty());
    assert!(!err.message.is_empty());
}
