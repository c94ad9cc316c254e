#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::{Router, middleware, routing::get};
use columbus::columbus_config::IdentityConfig;
use columbus::columbus_core::ErrorResponse;
use columbus::columbus_models::{NewUser, UserId};
use columbus::middleware::identity::{IdentityGate, require_identity, user_id_from_extensions};
use columbus::modules::users::{UserError, UserRepository, UserService};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

pub const IDENTITY_HEADER: &str = "Columbus-User-ID";
pub const DUMMY_ROUTE: &str = "/v1beta1/dummy";

pub fn identity_config() -> IdentityConfig {
    IdentityConfig::new(IDENTITY_HEADER, "shield").unwrap()
}

/// Scripted result for one store operation.
#[derive(Clone, Copy, Debug)]
pub enum Outcome {
    Id(&'static str),
    NotFound,
    Fail(&'static str),
}

impl Outcome {
    fn into_result(self) -> Result<UserId, UserError> {
        match self {
            Outcome::Id(id) => Ok(UserId::from(id)),
            Outcome::NotFound => Err(UserError::NotFound),
            Outcome::Fail(message) => Err(anyhow::anyhow!(message).into()),
        }
    }
}

/// Store returning fixed outcomes and counting calls.
pub struct StubRepository {
    lookup: Outcome,
    create: Outcome,
    pub lookups: AtomicUsize,
    pub creates: AtomicUsize,
    pub last_created: std::sync::Mutex<Option<NewUser>>,
}

impl StubRepository {
    pub fn new(lookup: Outcome, create: Outcome) -> Arc<Self> {
        Arc::new(Self {
            lookup,
            create,
            lookups: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            last_created: std::sync::Mutex::new(None),
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for StubRepository {
    async fn get_id(&self, _email: &str, _provider: &str) -> Result<UserId, UserError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.lookup.into_result()
    }

    async fn create(&self, new_user: NewUser) -> Result<UserId, UserError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        *self.last_created.lock().unwrap() = Some(new_user);
        self.create.into_result()
    }
}

/// Router with a single route behind the identity middleware. The handler
/// echoes the resolved user ID and counts how often it was reached.
pub fn dummy_app(repository: Arc<dyn UserRepository>, hits: Arc<AtomicUsize>) -> Router {
    let config = identity_config();
    let users = UserService::new(repository, &config);
    let gate = IdentityGate::from_config(&config, users).unwrap();

    Router::new()
        .route(
            DUMMY_ROUTE,
            get(move |req: Request<Body>| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    user_id_from_extensions(req.extensions())
                        .map(|id| id.to_string())
                        .unwrap_or_default()
                }
            }),
        )
        .route_layer(middleware::from_fn_with_state(gate, require_identity))
}

pub fn request(uri: &str, identity: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(identity) = identity {
        builder = builder.header(IDENTITY_HEADER, identity);
    }
    builder.body(Body::empty()).unwrap()
}

/// Request whose identity header carries raw bytes.
pub fn request_with_bytes(uri: &str, identity: &[u8]) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(IDENTITY_HEADER, HeaderValue::from_bytes(identity).unwrap())
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

pub fn reason(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorResponse>(body).unwrap().reason
}
