use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, StatusCode,
};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Reset the database of a running service.
///
/// The service must be configured (through `.env`) with registration open,
/// the hackathon happening and the hardware sign-out window open at the same time.
pub async fn setup_test() -> (Client, Url, sqlx::PgPool) {
    dotenv::dotenv().ok();
    (create_client(), service_url(), setup_database().await)
}

fn service_url() -> Url {
    let port: u16 = std::env::var("PORT")
        .unwrap()
        .parse()
        .expect("Invalid PORT");
    Url::parse(format!("http://localhost:{port}").as_str()).unwrap()
}

async fn setup_database() -> sqlx::PgPool {
    let database_host = std::env::var("DATABASE_HOST").unwrap();
    let database_name = std::env::var("DATABASE_NAME").unwrap();
    let database_user = std::env::var("DATABASE_USER").unwrap();
    let database_password = std::env::var("DATABASE_PASSWORD").unwrap();
    let database_port: u16 = std::env::var("DATABASE_PORT")
        .unwrap()
        .parse()
        .expect("Invalid DATABASE_PORT");

    let database_url = format!("postgres://{database_user}:{database_password}@{database_host}:{database_port}/{database_name}");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .acquire_timeout(Duration::from_millis(1000))
        .idle_timeout(Duration::from_millis(1000 * 30))
        .max_lifetime(Duration::from_millis(1000 * 10))
        .connect(&database_url)
        .await
        .expect("Expect to create a database pool with a open connection");

    let drop_sttm =
        sqlx::query("DROP SCHEMA IF EXISTS iam, registration, review, event, hardware CASCADE");

    let mut trx = pool.begin().await.unwrap();
    drop_sttm.execute(&mut trx).await.unwrap();
    for sttm in include_str!("../../dbschema.sql").split(';') {
        if sttm.trim().is_empty() {
            continue;
        }
        sqlx::query(sttm).execute(&mut trx).await.unwrap();
    }
    trx.commit().await.unwrap();

    pool
}

fn create_client() -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.append("accept", HeaderValue::from_static("application/json"));

    let keep_alive = 1000 * 60 * 60; // 1 hours
    let connect_timeout = 1000 * 5; // 5 sec
    let timeout = 1000 * 10; // 10 sec

    reqwest::Client::builder()
        .tcp_keepalive(Duration::from_millis(keep_alive))
        .connect_timeout(Duration::from_millis(connect_timeout))
        .timeout(Duration::from_millis(timeout))
        .pool_max_idle_per_host(5)
        .default_headers(headers)
        .brotli(true)
        .gzip(true)
        .build()
        .expect("Expect to create a http client")
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserDto<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password1: &'a str,
    pub password2: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialDto<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub version: u32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateUserResponse {
    pub user: UserResponse,
    pub token: String,
}

pub const PASSWORD: &str = "analytical-engine";

/// Sign up a participant and return its bearer token.
pub async fn sign_up_and_login(client: &Client, url: &Url, email: &str) -> String {
    let signup = CreateUserDto {
        email,
        first_name: "Ada",
        last_name: "Lovelace",
        password1: PASSWORD,
        password2: PASSWORD,
    };
    let res = client
        .post(url.join("/api/auth/signup").unwrap())
        .json(&signup)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let credential = CredentialDto {
        email,
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
    auth.token
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse<T> {
    pub title: String,
    pub message: String,
    pub error: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationErrorBody {
    #[serde(rename = "Operation")]
    pub operation: OperationError,
}

/// Refused operation carried by a 422 response.
pub async fn operation_error(res: reqwest::Response) -> OperationError {
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse<OperationErrorBody> = res.json().await.unwrap();
    body.error.operation
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDto<'a> {
    pub age: u32,
    pub pronouns: &'a str,
    pub gender: &'a str,
    pub phone_number: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub tshirt_size: &'a str,
    pub dietary_restrictions: &'a str,
    pub under_represented_group: &'a str,
    pub sexual_identity: &'a str,
    pub highest_formal_education: &'a str,
    pub school: &'a str,
    pub study_level: &'a str,
    pub graduation_year: i32,
    pub program: &'a str,
    pub resume: &'a str,
    pub how_many_hackathons: &'a str,
    pub what_past_experience: &'a str,
    pub why_participate: &'a str,
    pub what_technical_experience: &'a str,
    pub what_role_in_team_setting: &'a str,
    pub discovery_method: &'a str,
    pub conduct_agree: bool,
    pub logistics_agree: bool,
    pub email_agree: bool,
    pub resume_sharing: bool,
}

impl Default for ApplicationDto<'static> {
    fn default() -> Self {
        Self {
            age: 20,
            pronouns: "she-her",
            gender: "woman",
            phone_number: "+1 (123) 456-7890",
            city: "Toronto",
            country: "Canada",
            tshirt_size: "M",
            dietary_restrictions: "none",
            under_represented_group: "no",
            sexual_identity: "prefer-to-not-answer",
            highest_formal_education: "secondary-or-high-school",
            school: "University of Toronto",
            study_level: "undergraduate-3-year",
            graduation_year: 2026,
            program: "Engineering",
            resume: "applications/resumes/resume.pdf",
            how_many_hackathons: "1",
            what_past_experience: "Built a robot",
            why_participate: "To learn",
            what_technical_experience: "Rust",
            what_role_in_team_setting: "Backend",
            discovery_method: "word-of-mouth",
            conduct_agree: true,
            logistics_agree: true,
            email_agree: false,
            resume_sharing: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Identified {
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamMemberResponse {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub team_code: String,
    pub members: Vec<TeamMemberResponse>,
    pub spots_remaining: u32,
}

/// Sign up a participant and submit its application, returning its bearer token.
pub async fn applicant(client: &Client, url: &Url, email: &str) -> String {
    let token = sign_up_and_login(client, url, email).await;

    let res = client
        .post(url.join("/api/registration/application").unwrap())
        .bearer_auth(&token)
        .json(&ApplicationDto::default())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    token
}

pub async fn team_of(client: &Client, url: &Url, token: &str) -> TeamResponse {
    let res = client
        .get(url.join("/api/registration/team").unwrap())
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinTeamDto<'a> {
    pub team_code: &'a str,
}

pub async fn join_team(client: &Client, url: &Url, token: &str, code: &str) -> reqwest::Response {
    client
        .post(url.join("/api/registration/team/join").unwrap())
        .bearer_auth(token)
        .json(&JoinTeamDto { team_code: code })
        .send()
        .await
        .unwrap()
}

pub async fn team_exists(pool: &sqlx::PgPool, code: &str) -> bool {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM registration.team WHERE team_code = $1)")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Sign up a staff member, returning its bearer token.
pub async fn staff(client: &Client, url: &Url, pool: &sqlx::PgPool, email: &str) -> String {
    let token = sign_up_and_login(client, url, email).await;
    sqlx::query("UPDATE iam.user SET is_staff = TRUE WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await
        .unwrap();
    token
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewDto<'a> {
    pub status: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RsvpDto {
    pub rsvp: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileDto<'a> {
    pub acknowledge_rules: bool,
    pub e_signature: &'a str,
}

/// Accept the applicant, send the decision and RSVP yes on its behalf.
pub async fn accept(client: &Client, url: &Url, staff_token: &str, token: &str) {
    let res = client
        .get(url.join("/api/registration/application").unwrap())
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let application: Identified = res.json().await.unwrap();

    let path = format!("/api/review/applications/{}", application.id);
    let res = client
        .put(url.join(&path).unwrap())
        .bearer_auth(staff_token)
        .json(&ReviewDto { status: "Accepted" })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(url.join("/api/review/decisions").unwrap())
        .bearer_auth(staff_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .put(url.join("/api/registration/application/rsvp").unwrap())
        .bearer_auth(token)
        .json(&RsvpDto { rsvp: true })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

/// Accepted participant holding an event profile.
pub async fn participant(
    client: &Client,
    url: &Url,
    staff_token: &str,
    email: &str,
    team_code: Option<&str>,
) -> String {
    let token = applicant(client, url, email).await;
    if let Some(code) = team_code {
        assert_eq!(join_team(client, url, &token, code).await.status(), StatusCode::OK);
    }
    accept(client, url, staff_token, &token).await;

    let res = client
        .post(url.join("/api/event/profile").unwrap())
        .bearer_auth(&token)
        .json(&ProfileDto {
            acknowledge_rules: true,
            e_signature: "Ada Lovelace",
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    token
}
