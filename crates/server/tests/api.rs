use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{Datelike, Utc};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, EngineError, Mailer, OutgoingMail};
use migration::MigratorTrait;

#[derive(Debug, Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<String, EngineError> {
        self.sent.lock().unwrap().push(mail);
        Ok("<summary@test>".to_string())
    }
}

#[derive(Debug)]
struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: OutgoingMail) -> Result<String, EngineError> {
        Err(EngineError::Mail("smtp unavailable".to_string()))
    }
}

async fn app_with_mailer(mailer: Arc<dyn Mailer>) -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .mailer(mailer)
        .build()
        .await
        .unwrap();
    server::router(engine)
}

async fn app() -> Router {
    app_with_mailer(Arc::new(RecordingMailer::default())).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, created) = send(app, Method::POST, "/api/expenses", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    created
}

fn message(body: &Value) -> &str {
    body["message"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn healthcheck_returns_plain_text() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("gastosmensais API online".to_string()));
}

#[tokio::test]
async fn lunch_is_split_between_its_participants() {
    let app = app().await;
    create(
        &app,
        json!({
            "descricao": "Lunch",
            "valor": 30,
            "categoria": "basico",
            "participantes": ["a@x.com", "b@x.com"]
        }),
    )
    .await;

    let now = Utc::now();
    let uri = format!("/api/report/dividir?mes={}&ano={}", now.month(), now.year());
    let (status, body) = send(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total"], json!(30));
    assert_eq!(body["valorPorPessoa"].as_f64(), Some(15.0));
    assert_eq!(body["porCategoria"], json!({ "basico": 30 }));
    assert_eq!(body["participantes"], json!(["a@x.com", "b@x.com"]));
    assert_eq!(body["quantidadeDespesas"], json!(1));
    assert_eq!(
        body["periodo"],
        json!({ "mes": now.month(), "ano": now.year() })
    );
}

#[tokio::test]
async fn explicit_participants_come_from_the_query() {
    let app = app().await;
    create(
        &app,
        json!({
            "descricao": "Rent",
            "valor": 100,
            "categoria": "basico",
            "data": "2025-08-05",
            "participantes": ["z@x.com"]
        }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/report/dividir?mes=8&ano=2025&participantes=a@x.com,%20b@y.com,a@x.com",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["participantes"], json!(["a@x.com", "b@y.com", "a@x.com"]));
    assert_eq!(body["valorPorPessoa"].as_f64(), Some(33.33));
}

#[tokio::test]
async fn split_requires_month_year_and_participants() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/report/dividir?mes=8", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message(&body).contains("mes and ano"));

    let (status, _) = send(&app, Method::GET, "/api/report/dividir?mes=13&ano=2025", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        send(&app, Method::GET, "/api/report/dividir?mes=8&ano=2025", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message(&body).contains("participants"));
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({ "descricao": "Lunch", "valor": -5, "categoria": "invalid" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = message(&body);
    assert!(message.contains("\"valor\""), "{message}");
    assert!(message.contains("\"categoria\""), "{message}");
    assert!(message.contains("; "), "{message}");
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({ "descricao": "Lunch", "valor": 3, "categoria": "basico", "extra": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message(&body).contains("extra"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({ "descricao": "Lunch", "valor": "lots", "categoria": "basico" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn crud_round_trip() {
    let app = app().await;
    let created = create(
        &app,
        json!({
            "descricao": "Cinema",
            "valor": 42.5,
            "categoria": "lazer",
            "data": "2025-08-10T20:00:00Z"
        }),
    )
    .await;
    assert_eq!(created["valor"].as_f64(), Some(42.5));
    assert_eq!(created["categoria"], json!("lazer"));
    assert_eq!(created["participantes"], json!([]));
    assert!(created["createdAt"].is_string());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, Method::GET, &format!("/api/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["descricao"], json!("Cinema"));

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/expenses/{id}"),
        Some(json!({ "valor": 50, "participantes": ["a@x.com"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["valor"], json!(50));
    assert_eq!(updated["descricao"], json!("Cinema"));
    assert_eq!(updated["participantes"], json!(["a@x.com"]));

    let (status, body) = send(&app, Method::PUT, &format!("/api/expenses/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message(&body).contains("at least one field"));

    let (status, body) = send(&app, Method::DELETE, &format!("/api/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message(&body), "expense deleted");

    let (status, _) = send(&app, Method::GET, &format!("/api/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let app = app().await;
    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&app, method, "/api/expenses/123", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message(&body), "invalid expense id");
    }
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/expenses/123",
        Some(json!({ "valor": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_by_month_only_when_both_given() {
    let app = app().await;
    for (name, date) in [
        ("july", "2025-07-15"),
        ("august", "2025-08-15"),
        ("august-late", "2025-08-31T23:00:00Z"),
    ] {
        create(
            &app,
            json!({ "descricao": name, "valor": 10, "categoria": "outros", "data": date }),
        )
        .await;
    }

    let (status, all) = send(&app, Method::GET, "/api/expenses", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["descricao"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["august-late", "august", "july"]);

    let (_, august) = send(&app, Method::GET, "/api/expenses?mes=8&ano=2025", None).await;
    assert_eq!(august.as_array().unwrap().len(), 2);

    let (_, only_month) = send(&app, Method::GET, "/api/expenses?mes=8", None).await;
    assert_eq!(only_month.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, Method::GET, "/api/expenses?mes=ago&ano=2025", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn email_summary_is_sent() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = app_with_mailer(mailer.clone()).await;
    create(
        &app,
        json!({ "descricao": "Market", "valor": 12.3, "categoria": "basico", "data": "2025-08-02" }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/report/email",
        Some(json!({ "mes": 8, "ano": 2025, "destinatarios": ["a@x.com", "b@y.com"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body, json!({ "message": "email sent", "id": "<summary@test>" }));

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["a@x.com", "b@y.com"]);
    assert_eq!(sent[0].from, engine::DEFAULT_MAIL_FROM);
    assert!(sent[0].html.contains("R$ 12.30"));
}

#[tokio::test]
async fn email_requires_recipients() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/report/email",
        Some(json!({ "mes": 8, "ano": 2025 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message(&body).contains("destinatarios"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/report/email",
        Some(json!({ "mes": 8, "ano": 2025, "destinatarios": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn email_failure_is_a_server_error() {
    let app = app_with_mailer(Arc::new(FailingMailer)).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/report/email",
        Some(json!({ "mes": 8, "ano": 2025, "destinatarios": ["a@x.com"] })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(message(&body).contains("smtp unavailable"));
}
