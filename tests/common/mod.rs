#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request};
use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower_http::normalize_path::NormalizePath;

use quotes_api::api::middleware::{CorsPolicy, RateLimitGate, RequestMetrics};
use quotes_api::application::services::auth_service::authentication_token_ttl;
use quotes_api::application::services::{AuthService, QuoteService, UserService};
use quotes_api::domain::client_registry::{ClientRegistry, LimiterSettings};
use quotes_api::domain::entities::{
    NewQuote, NewToken, NewUser, Permissions, Quote, QuoteFilter, QuoteSort, TokenScope, User,
};
use quotes_api::domain::repositories::{
    PermissionRepository, QuoteRepository, TokenRepository, UserRepository,
};
use quotes_api::error::AppError;
use quotes_api::infrastructure::mailer::{Email, MailResult, Mailer};
use quotes_api::routes::app_router;
use quotes_api::state::AppState;
use quotes_api::utils::password::hash_password;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const TEST_PASSWORD: &str = "pa55word123";
pub const TRUSTED_ORIGIN: &str = "https://quotes.example.com";

/// In-memory Store implementing every repository trait.
///
/// Counts the two lookups the gatekeeper performs so tests can assert that a
/// request never reached the Store.
#[derive(Default)]
pub struct MemoryStore {
    quotes: Mutex<BTreeMap<i64, Quote>>,
    users: Mutex<BTreeMap<i64, User>>,
    tokens: Mutex<Vec<NewToken>>,
    permissions: Mutex<HashMap<i64, HashSet<String>>>,
    next_id: AtomicUsize,
    pub token_lookups: AtomicUsize,
    pub permission_lookups: AtomicUsize,
    pub fail_permission_lookups: AtomicBool,
    pub fail_quote_listing: AtomicBool,
    pub panic_on_quote_listing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1
    }

    pub fn token_lookups(&self) -> usize {
        self.token_lookups.load(Ordering::SeqCst)
    }

    pub fn permission_lookups(&self) -> usize {
        self.permission_lookups.load(Ordering::SeqCst)
    }

    pub fn user(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn tokens_for(&self, user_id: i64, scope: TokenScope) -> usize {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id && t.scope == scope)
            .count()
    }

    pub fn quote_count(&self) -> usize {
        self.quotes.lock().unwrap().len()
    }
}

#[async_trait]
impl QuoteRepository for MemoryStore {
    async fn insert(&self, new_quote: NewQuote) -> Result<Quote, AppError> {
        let quote = Quote {
            id: self.next_id(),
            content: new_quote.content,
            author: new_quote.author,
            created_at: Utc::now(),
            version: 1,
        };
        self.quotes.lock().unwrap().insert(quote.id, quote.clone());
        Ok(quote)
    }

    async fn get(&self, id: i64) -> Result<Option<Quote>, AppError> {
        Ok(self.quotes.lock().unwrap().get(&id).cloned())
    }

    async fn update(&self, quote: &Quote) -> Result<Option<Quote>, AppError> {
        let mut quotes = self.quotes.lock().unwrap();
        match quotes.get_mut(&quote.id) {
            Some(stored) if stored.version == quote.version => {
                stored.content = quote.content.clone();
                stored.author = quote.author.clone();
                stored.version += 1;
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.quotes.lock().unwrap().remove(&id).is_some())
    }

    async fn list(&self, filter: &QuoteFilter) -> Result<(Vec<Quote>, i64), AppError> {
        if self.fail_quote_listing.load(Ordering::SeqCst) {
            return Err(AppError::internal("connection refused", json!({})));
        }
        if self.panic_on_quote_listing.load(Ordering::SeqCst) {
            panic!("quote listing blew up");
        }

        let contains = |field: &str, needle: &Option<String>| {
            needle
                .as_ref()
                .is_none_or(|n| field.to_lowercase().contains(&n.to_lowercase()))
        };

        let mut matched: Vec<Quote> = self
            .quotes
            .lock()
            .unwrap()
            .values()
            .filter(|q| contains(&q.author, &filter.author) && contains(&q.content, &filter.content))
            .cloned()
            .collect();

        match filter.sort {
            QuoteSort::IdAsc => matched.sort_by_key(|q| q.id),
            QuoteSort::IdDesc => matched.sort_by_key(|q| std::cmp::Reverse(q.id)),
            QuoteSort::AuthorAsc => matched.sort_by(|a, b| a.author.cmp(&b.author).then(a.id.cmp(&b.id))),
            QuoteSort::AuthorDesc => matched.sort_by(|a, b| b.author.cmp(&a.author).then(a.id.cmp(&b.id))),
            QuoteSort::ContentAsc => matched.sort_by(|a, b| a.content.cmp(&b.content).then(a.id.cmp(&b.id))),
            QuoteSort::ContentDesc => matched.sort_by(|a, b| b.content.cmp(&a.content).then(a.id.cmp(&b.id))),
        }

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect();

        Ok((page, total))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_email_key" }),
            ));
        }

        let user = User {
            id: self.next_id(),
            created_at: Utc::now(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            activated: false,
            version: 1,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_for_token(
        &self,
        scope: TokenScope,
        token_hash: &str,
    ) -> Result<Option<User>, AppError> {
        self.token_lookups.fetch_add(1, Ordering::SeqCst);

        let now = Utc::now();
        let owner = self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.hash == token_hash && t.scope == scope && t.expiry > now)
            .map(|t| t.user_id);

        Ok(owner.and_then(|id| self.user(id)))
    }

    async fn update(&self, user: &User) -> Result<Option<User>, AppError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user.id) {
            Some(stored) if stored.version == user.version => {
                *stored = User {
                    version: user.version + 1,
                    ..user.clone()
                };
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn insert(&self, token: NewToken) -> Result<(), AppError> {
        self.tokens.lock().unwrap().push(token);
        Ok(())
    }

    async fn delete_all_for_user(&self, scope: TokenScope, user_id: i64) -> Result<(), AppError> {
        self.tokens
            .lock()
            .unwrap()
            .retain(|t| !(t.scope == scope && t.user_id == user_id));
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for MemoryStore {
    async fn get_all_for_user(&self, user_id: i64) -> Result<Permissions, AppError> {
        self.permission_lookups.fetch_add(1, Ordering::SeqCst);

        if self.fail_permission_lookups.load(Ordering::SeqCst) {
            return Err(AppError::internal("connection reset", json!({})));
        }

        Ok(self
            .permissions
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|codes| codes.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_for_user(&self, user_id: i64, code: &str) -> Result<(), AppError> {
        self.permissions
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .insert(code.to_string());
        Ok(())
    }

    async fn remove_for_user(&self, user_id: i64, code: &str) -> Result<bool, AppError> {
        Ok(self
            .permissions
            .lock()
            .unwrap()
            .get_mut(&user_id)
            .is_some_and(|codes| codes.remove(code)))
    }
}

/// Mailer that keeps every delivered email in memory.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Email>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> MailResult<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

impl RecordingMailer {
    /// Waits for the background delivery task to hand over an email.
    pub async fn wait_for_email(&self) -> Email {
        for _ in 0..100 {
            if let Some(email) = self.sent.lock().unwrap().last().cloned() {
                return email;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("no email was sent");
    }
}

pub fn create_test_state(store: Arc<MemoryStore>, mailer: Arc<RecordingMailer>) -> AppState {
    let users: Arc<dyn UserRepository> = store.clone();
    let permissions: Arc<dyn PermissionRepository> = store.clone();

    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        store.clone(),
        TEST_SECRET.to_string(),
    ));
    let user_service = Arc::new(UserService::new(
        users,
        permissions.clone(),
        auth_service.clone(),
        mailer,
    ));

    AppState {
        quote_service: Arc::new(QuoteService::new(store)),
        user_service,
        auth_service,
        permissions,
        metrics: Arc::new(RequestMetrics::new()),
        environment: "testing".to_string(),
    }
}

/// The full gatekeeper pipeline over an in-memory Store.
pub struct TestApp {
    pub router: NormalizePath<Router>,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub registry: Arc<ClientRegistry>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_limiter(
            LimiterSettings {
                requests_per_second: 2.0,
                burst: 5,
            },
            true,
        )
    }

    pub fn with_limiter(settings: LimiterSettings, enabled: bool) -> Self {
        let store = MemoryStore::new();
        let mailer = Arc::new(RecordingMailer::default());
        let state = create_test_state(store.clone(), mailer.clone());
        let registry = Arc::new(ClientRegistry::new(settings));

        let router = app_router(
            state.clone(),
            RateLimitGate::new(registry.clone(), enabled, false),
            CorsPolicy::new(vec![TRUSTED_ORIGIN.to_string()]),
        );

        Self {
            router,
            state,
            store,
            mailer,
            registry,
        }
    }

    /// Creates a user and returns an authentication token for it.
    pub async fn user_with_token(&self, email: &str, activated: bool, permissions: &[&str]) -> String {
        let user = self.create_user(email, activated, permissions).await;

        self.state
            .auth_service
            .new_token(user.id, authentication_token_ttl(), TokenScope::Authentication)
            .await
            .unwrap()
            .plaintext
    }

    pub async fn create_user(&self, email: &str, activated: bool, permissions: &[&str]) -> User {
        let users: &dyn UserRepository = self.store.as_ref();
        let mut user = users
            .insert(NewUser {
                username: email.split('@').next().unwrap_or("user").to_string(),
                email: email.to_string(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
            })
            .await
            .unwrap();

        if activated {
            user.activated = true;
            user = users.update(&user).await.unwrap().unwrap();
        }

        for code in permissions {
            self.store.add_for_user(user.id, code).await.unwrap();
        }

        user
    }
}

/// Attaches the connect info `axum::serve` would provide.
pub fn with_peer(mut req: Request<Body>, peer: &str) -> Request<Body> {
    let addr: SocketAddr = peer.parse().unwrap();
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}

pub fn get(uri: &str, peer: &str) -> Request<Body> {
    with_peer(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
        peer,
    )
}

pub fn get_with_token(uri: &str, peer: &str, token: &str) -> Request<Body> {
    with_peer(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
        peer,
    )
}

pub fn json_request(
    method: Method,
    uri: &str,
    peer: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    with_peer(builder.body(Body::from(body.to_string())).unwrap(), peer)
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
