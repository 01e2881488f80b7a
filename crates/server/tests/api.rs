use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerConfig, ServerState, router};

const SECRET: &str = "test-secret";

struct TestApp {
    router: Router,
    state: ServerState,
}

async fn app() -> TestApp {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();

    let config = ServerConfig {
        secret_key: SECRET.to_string(),
        storage_dir: std::env::temp_dir().join(format!("agrimarket-api-{}", uuid::Uuid::new_v4())),
        ..ServerConfig::default()
    };
    let state = ServerState::new(engine, config);
    TestApp {
        router: router(state.clone()),
        state,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        self.call(builder.body(body).unwrap()).await
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), body).await
    }

    /// Register an account and return its token and id.
    async fn register(&self, name: &str, role: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": format!("{name}@example.com"),
                    "username": name,
                    "password": "password",
                    "full_name": format!("{name} test"),
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        (
            body["access_token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    async fn verified_farmer(&self, name: &str) -> String {
        let (token, id) = self.register(name, "farmer").await;
        self.state
            .engine
            .verify_user(id.parse().unwrap())
            .await
            .unwrap();
        token
    }

    /// Farm plus an active listing of 100 kg at 500 NGN/kg.
    async fn listing(&self, farmer: &str) -> String {
        let (status, farm) = self
            .post(
                "/api/v1/farms",
                farmer,
                Some(json!({
                    "name": "Green Acres",
                    "location": "Kaduna",
                    "size_hectares": 12.5,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{farm}");

        let (status, listing) = self
            .post(
                "/api/v1/listings",
                farmer,
                Some(json!({
                    "farm_id": farm["id"],
                    "title": "Yellow maize",
                    "produce_type": "grains",
                    "quantity_kg": 100.0,
                    "unit_price_ngn": 500.0,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{listing}");
        assert_eq!(listing["total_price_ngn"], 50000.0);
        listing["id"].as_str().unwrap().to_string()
    }

    async fn offer(&self, buyer: &str, listing_id: &str) -> (StatusCode, Value) {
        self.post(
            "/api/v1/offers",
            buyer,
            Some(json!({
                "listing_id": listing_id,
                "quantity_kg": 50.0,
                "unit_price_ngn": 450.0,
                "delivery_location": "Lagos depot",
            })),
        )
        .await
    }
}

#[tokio::test]
async fn root_routes_need_no_credentials() {
    let app = app().await;

    let (status, body) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("Welcome"));

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.send(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["database"], "healthy");
    assert_eq!(body["version"], "1.0.0");

    let (status, body) = app.send(Method::GET, "/api/v1/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);

    let (status, body) = app.send(Method::GET, "/api/v1/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alive"], true);
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer() {
    let app = app().await;

    let (status, body) = app.send(Method::GET, "/api/v1/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app.get("/api/v1/listings", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (token, id) = app.register("ada", "buyer").await;
    let (status, me) = app.get("/api/v1/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id.as_str());
    assert_eq!(me["kyc_status"], "pending");
    assert_eq!(me["is_verified"], false);
}

#[tokio::test]
async fn token_for_missing_user_is_not_found() {
    let app = app().await;
    let claims = json!({
        "sub": uuid::Uuid::new_v4().to_string(),
        "exp": chrono::Utc::now().timestamp() + 600,
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let (status, body) = app.get("/api/v1/auth/me", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn register_and_login_errors() {
    let app = app().await;
    app.register("ada", "buyer").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "ada@example.com",
                "username": "someone",
                "password": "password",
                "full_name": "Someone",
                "role": "buyer",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Incorrect email or password");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 7200);
}

#[tokio::test]
async fn marketplace_workflow_over_http() {
    let app = app().await;
    let farmer = app.verified_farmer("femi").await;
    let (buyer, _) = app.register("bola", "buyer").await;
    let listing_id = app.listing(&farmer).await;

    let (status, offer) = app.offer(&buyer, &listing_id).await;
    assert_eq!(status, StatusCode::OK, "{offer}");
    assert_eq!(offer["total_price_ngn"], 22500.0);
    assert_eq!(offer["status"], "pending");
    let offer_id = offer["id"].as_str().unwrap();

    let (status, offer) = app
        .post(&format!("/api/v1/offers/{offer_id}/accept"), &farmer, None)
        .await;
    assert_eq!(status, StatusCode::OK, "{offer}");
    assert_eq!(offer["status"], "accepted");

    let (status, contract) = app
        .post(&format!("/api/v1/contracts/{offer_id}/create"), &farmer, None)
        .await;
    assert_eq!(status, StatusCode::OK, "{contract}");
    assert_eq!(contract["total_amount_ngn"], 22500.0);
    assert!(contract["contract_number"].as_str().unwrap().starts_with("CTR-"));
    let contract_id = contract["id"].as_str().unwrap();

    let (_, listing) = app
        .get(&format!("/api/v1/listings/{listing_id}"), &buyer)
        .await;
    assert_eq!(listing["status"], "sold");

    let (status, escrow) = app
        .post(&format!("/api/v1/escrow/{contract_id}/create"), &buyer, None)
        .await;
    assert_eq!(status, StatusCode::OK, "{escrow}");
    assert_eq!(escrow["status"], "pending");
    let escrow_id = escrow["id"].as_str().unwrap();

    let (status, escrow) = app
        .post(&format!("/api/v1/escrow/{escrow_id}/fund"), &buyer, None)
        .await;
    assert_eq!(status, StatusCode::OK, "{escrow}");
    assert_eq!(escrow["status"], "funded");
    assert!(escrow["payment_reference"].is_string());

    let (status, order) = app
        .post(
            &format!("/api/v1/orders/{contract_id}/create"),
            &buyer,
            Some(json!({ "delivery_address": "12 Marina, Lagos" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["status"], "pending");
    let order_id = order["id"].as_str().unwrap();

    let (status, body) = app
        .post(&format!("/api/v1/orders/{order_id}/deliver"), &farmer, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Order must be confirmed before delivery");

    let (status, order) = app
        .post(&format!("/api/v1/orders/{order_id}/confirm"), &farmer, None)
        .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["status"], "confirmed");

    let (status, order) = app
        .post(&format!("/api/v1/orders/{order_id}/deliver"), &farmer, None)
        .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["status"], "delivered");

    let (_, escrow) = app.get(&format!("/api/v1/escrow/{escrow_id}"), &buyer).await;
    assert_eq!(escrow["status"], "released");

    let (_, orders) = app.get("/api/v1/orders", &farmer).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);
    let (_, contracts) = app.get("/api/v1/contracts", &buyer).await;
    assert_eq!(contracts.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn policy_failures_map_to_status_codes() {
    let app = app().await;
    let farmer = app.verified_farmer("femi").await;
    let rival = app.verified_farmer("tunde").await;
    let (unverified, _) = app.register("kemi", "farmer").await;
    let (buyer, _) = app.register("bola", "buyer").await;
    let listing_id = app.listing(&farmer).await;

    let (status, body) = app
        .post(
            "/api/v1/farms",
            &unverified,
            Some(json!({ "name": "Plot", "location": "Oyo", "size_hectares": 1.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "KYC verification required to create farms");

    let (status, body) = app.offer(&rival, &listing_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Farmers cannot make offers");

    let (_, offer) = app.offer(&buyer, &listing_id).await;
    let offer_id = offer["id"].as_str().unwrap();
    let (status, _) = app
        .post(&format!("/api/v1/offers/{offer_id}/accept"), &rival, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, offer) = app.get(&format!("/api/v1/offers/{offer_id}"), &buyer).await;
    assert_eq!(offer["status"], "pending");

    let (status, _) = app.get("/api/v1/users", &buyer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let missing = uuid::Uuid::new_v4();
    let (status, body) = app
        .get(&format!("/api/v1/listings/{missing}"), &buyer)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Listing not found");
}

#[tokio::test]
async fn users_edit_their_profile() {
    let app = app().await;
    let (ada, ada_id) = app.register("ada", "buyer").await;
    let (ben, _) = app.register("ben", "buyer").await;

    let (status, user) = app
        .send(
            Method::PUT,
            &format!("/api/v1/users/{ada_id}"),
            Some(&ada),
            Some(json!({ "business_name": "Ada Foods" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["business_name"], "Ada Foods");
    assert_eq!(user["role"], "buyer");

    let (status, _) = app.get(&format!("/api/v1/users/{ada_id}"), &ben).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn multipart_body(
    boundary: &str,
    fields: &[(&str, &str)],
    files: &[(&str, &str, &[u8])],
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

async fn upload_kyc(app: &TestApp, token: &str) -> (StatusCode, Value) {
    upload_kyc_numbered(app, token, "A1234567").await
}

async fn upload_kyc_numbered(
    app: &TestApp,
    token: &str,
    document_number: &str,
) -> (StatusCode, Value) {
    let boundary = "agrimarket-boundary";
    let body = multipart_body(
        boundary,
        &[
            ("document_type", "national_id"),
            ("document_number", document_number),
            ("business_address", "Ikeja, Lagos"),
        ],
        &[
            ("document_file", "id card.pdf", &b"%PDF-1.4"[..]),
            ("selfie_file", "me.jpg", &b"jpeg"[..]),
        ],
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/kyc/upload")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.call(request).await
}

#[tokio::test]
async fn kyc_upload_and_review_verifies_the_account() {
    let app = app().await;
    let (farmer, farmer_id) = app.register("femi", "farmer").await;
    let (admin, _) = app.register("root", "admin").await;

    let (status, body) = app.get("/api/v1/kyc/status", &farmer).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "KYC not found");

    let (status, kyc) = upload_kyc(&app, &farmer).await;
    assert_eq!(status, StatusCode::OK, "{kyc}");
    assert_eq!(kyc["status"], "pending");
    assert_eq!(
        kyc["document_file_path"],
        format!("/storage/kyc_{farmer_id}_national_id_id_card.pdf")
    );
    assert_eq!(
        kyc["selfie_file_path"],
        format!("/storage/kyc_{farmer_id}_selfie_me.jpg")
    );
    let stored = app
        .state
        .store
        .root()
        .join(format!("kyc_{farmer_id}_national_id_id_card.pdf"));
    assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"%PDF-1.4");

    let (status, body) = upload_kyc(&app, &farmer).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "KYC already submitted");

    let (status, _) = app.get("/api/v1/kyc/admin/queue", &farmer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, queue) = app.get("/api/v1/kyc/admin/queue", &admin).await;
    assert_eq!(queue.as_array().unwrap().len(), 1);

    let kyc_id = kyc["id"].as_str().unwrap();
    let (status, reviewed) = app
        .send(
            Method::PUT,
            &format!("/api/v1/kyc/admin/{kyc_id}/review"),
            Some(&admin),
            Some(json!({ "status": "approved", "admin_notes": "ok" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{reviewed}");
    assert_eq!(reviewed["status"], "approved");

    let (_, me) = app.get("/api/v1/auth/me", &farmer).await;
    assert_eq!(me["is_verified"], true);
    assert_eq!(me["kyc_status"], "approved");

    let _ = tokio::fs::remove_dir_all(app.state.store.root()).await;
}

#[tokio::test]
async fn kyc_upload_with_blank_document_number_stores_nothing() {
    let app = app().await;
    let (farmer, farmer_id) = app.register("femi", "farmer").await;

    let (status, body) = upload_kyc_numbered(&app, &farmer, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "document_number must not be empty");

    for name in [
        format!("kyc_{farmer_id}_national_id_id_card.pdf"),
        format!("kyc_{farmer_id}_selfie_me.jpg"),
    ] {
        let path = app.state.store.root().join(name);
        assert!(!tokio::fs::try_exists(&path).await.unwrap(), "{path:?}");
    }
    let (status, _) = app.get("/api/v1/kyc/status", &farmer).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A corrected resubmission goes through.
    let (status, kyc) = upload_kyc(&app, &farmer).await;
    assert_eq!(status, StatusCode::OK, "{kyc}");

    let _ = tokio::fs::remove_dir_all(app.state.store.root()).await;
}
