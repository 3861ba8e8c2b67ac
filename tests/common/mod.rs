#![allow(dead_code)]

//! In-memory repositories and a fully wired test server.
//!
//! Handler tests run the real router, services and event pipeline; only
//! PostgreSQL is replaced by the fakes below.

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tower::Layer;

use clicklink::AppError;
use clicklink::application::services::auth_service::hash_token;
use clicklink::domain::entities::{
    ClickStat, GroupBy, Link, LinkPatch, NewClickStat, NewLink, PeriodStat,
};
use clicklink::domain::event_bus::EventBus;
use clicklink::domain::repositories::{
    ApiToken, LinkRepository, StatsRepository, TokenRepository,
};
use clicklink::domain::stat_aggregator::spawn_stat_aggregator;
use clicklink::routes::app_router;
use clicklink::state::AppState;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://s.test";
pub const VALID_TOKEN: &str = "valid-test-token";

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap()
}

fn unavailable() -> AppError {
    AppError::internal("Database unavailable", json!({}))
}

// ─── Links ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    down: AtomicBool,
}

impl InMemoryLinkRepository {
    /// Inserts a link directly, bypassing hash generation.
    pub fn insert(&self, hash: &str, url: &str) -> Link {
        let mut links = lock(&self.links);
        let now = Utc::now();
        let link = Link::new(
            links.len() as i64 + 1,
            url.to_string(),
            hash.to_string(),
            now,
            now,
            None,
        );
        links.push(link.clone());
        link
    }

    pub fn insert_deleted(&self, hash: &str, url: &str) -> Link {
        let link = self.insert(hash, url);
        let mut links = lock(&self.links);
        let stored = links.iter_mut().find(|l| l.id == link.id).unwrap();
        stored.deleted_at = Some(Utc::now());
        stored.clone()
    }

    pub fn get(&self, id: i64) -> Option<Link> {
        lock(&self.links).iter().find(|l| l.id == id).cloned()
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), AppError> {
        if self.down.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.check()?;
        if lock(&self.links).iter().any(|l| l.hash == new_link.hash) {
            return Err(AppError::conflict("Resource already exists", json!({})));
        }
        Ok(self.insert(&new_link.hash, &new_link.url))
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, AppError> {
        self.check()?;
        Ok(lock(&self.links).iter().find(|l| l.hash == hash).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Link>, AppError> {
        self.check()?;
        Ok(lock(&self.links)
            .iter()
            .rev()
            .filter(|l| !l.is_deleted())
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.check()?;
        Ok(lock(&self.links).iter().filter(|l| !l.is_deleted()).count() as i64)
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Option<Link>, AppError> {
        self.check()?;
        let mut links = lock(&self.links);
        let Some(link) = links.iter_mut().find(|l| l.id == id && !l.is_deleted()) else {
            return Ok(None);
        };
        if let Some(url) = patch.url {
            link.url = url;
        }
        if let Some(hash) = patch.hash {
            link.hash = hash;
        }
        link.updated_at = Utc::now();
        Ok(Some(link.clone()))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        self.check()?;
        let mut links = lock(&self.links);
        match links.iter_mut().find(|l| l.id == id && !l.is_deleted()) {
            Some(link) => {
                link.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ─── Click stats ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryStatsRepository {
    rows: Mutex<Vec<ClickStat>>,
    down: AtomicBool,
}

impl InMemoryStatsRepository {
    pub fn seed(&self, link_id: i64, date: NaiveDate, clicks: i64) {
        let mut rows = lock(&self.rows);
        let id = rows.len() as i64 + 1;
        rows.push(ClickStat::new(id, link_id, date, clicks));
    }

    pub fn clicks(&self, link_id: i64, date: NaiveDate) -> Option<i64> {
        lock(&self.rows)
            .iter()
            .find(|r| r.link_id == link_id && r.date == date)
            .map(|r| r.clicks)
    }

    pub fn row_count(&self) -> usize {
        lock(&self.rows).len()
    }

    pub fn total_clicks(&self) -> i64 {
        lock(&self.rows).iter().map(|r| r.clicks).sum()
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), AppError> {
        if self.down.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn find(&self, link_id: i64, date: NaiveDate) -> Result<Option<ClickStat>, AppError> {
        self.check()?;
        Ok(lock(&self.rows)
            .iter()
            .find(|r| r.link_id == link_id && r.date == date)
            .cloned())
    }

    async fn create(&self, new_stat: NewClickStat) -> Result<ClickStat, AppError> {
        self.check()?;
        let mut rows = lock(&self.rows);
        if rows
            .iter()
            .any(|r| r.link_id == new_stat.link_id && r.date == new_stat.date)
        {
            return Err(AppError::conflict("Resource already exists", json!({})));
        }
        let stat = ClickStat::new(
            rows.len() as i64 + 1,
            new_stat.link_id,
            new_stat.date,
            new_stat.clicks,
        );
        rows.push(stat.clone());
        Ok(stat)
    }

    async fn save(&self, stat: &ClickStat) -> Result<(), AppError> {
        self.check()?;
        let mut rows = lock(&self.rows);
        if let Some(row) = rows.iter_mut().find(|r| r.id == stat.id) {
            row.clicks = stat.clicks;
        }
        Ok(())
    }

    async fn aggregate(
        &self,
        group_by: GroupBy,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PeriodStat>, AppError> {
        self.check()?;
        let mut periods: BTreeMap<String, i64> = BTreeMap::new();
        for row in lock(&self.rows)
            .iter()
            .filter(|r| r.date >= from && r.date <= to)
        {
            *periods.entry(group_by.period_of(row.date)).or_default() += row.clicks;
        }
        Ok(periods
            .into_iter()
            .map(|(period, sum)| PeriodStat::new(period, sum))
            .collect())
    }
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: Mutex<Vec<ApiToken>>,
}

impl InMemoryTokenRepository {
    /// Stores `raw_token` the way the admin CLI does.
    pub fn issue(&self, name: &str, raw_token: &str) -> ApiToken {
        let mut tokens = lock(&self.tokens);
        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            token_hash: hash_token(SIGNING_SECRET, raw_token).unwrap(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        token
    }

    pub fn revoke_now(&self, id: i64) {
        let mut tokens = lock(&self.tokens);
        if let Some(t) = tokens.iter_mut().find(|t| t.id == id) {
            t.revoked_at = Some(Utc::now());
        }
    }

    pub fn by_id(&self, id: i64) -> Option<ApiToken> {
        lock(&self.tokens).iter().find(|t| t.id == id).cloned()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn is_active(&self, token_hash: &str) -> Result<bool, AppError> {
        Ok(lock(&self.tokens)
            .iter()
            .any(|t| t.token_hash == token_hash && !t.is_revoked()))
    }

    async fn mark_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut tokens = lock(&self.tokens);
        if let Some(t) = tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
        {
            t.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError> {
        let mut tokens = lock(&self.tokens);
        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn list(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(lock(&self.tokens).iter().rev().cloned().collect())
    }

    async fn find(&self, name_or_id: &str) -> Result<Option<ApiToken>, AppError> {
        let tokens = lock(&self.tokens);
        let by_id = name_or_id
            .parse::<i64>()
            .ok()
            .and_then(|id| tokens.iter().find(|t| t.id == id));
        Ok(by_id
            .or_else(|| tokens.iter().find(|t| t.name == name_or_id))
            .cloned())
    }

    async fn revoke(&self, id: i64) -> Result<bool, AppError> {
        let mut tokens = lock(&self.tokens);
        match tokens.iter_mut().find(|t| t.id == id && !t.is_revoked()) {
            Some(t) => {
                t.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ─── Connect info ────────────────────────────────────────────────────────────

/// Inserts a fixed peer address so the rate limiter can key requests.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

// ─── Test application ────────────────────────────────────────────────────────

pub struct TestApp {
    pub server: TestServer,
    pub links: Arc<InMemoryLinkRepository>,
    pub stats: Arc<InMemoryStatsRepository>,
    pub tokens: Arc<InMemoryTokenRepository>,
    pub bus: EventBus,
    pub aggregator: Option<JoinHandle<()>>,
}

impl TestApp {
    /// Full app with one stat aggregator subscribed, as in production.
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Full app with nobody listening on the event bus.
    pub fn without_aggregator() -> Self {
        Self::build(false)
    }

    fn build(with_aggregator: bool) -> Self {
        let links = Arc::new(InMemoryLinkRepository::default());
        let stats = Arc::new(InMemoryStatsRepository::default());
        let tokens = Arc::new(InMemoryTokenRepository::default());
        tokens.issue("test", VALID_TOKEN);

        let bus = EventBus::new(16);
        let aggregator = with_aggregator.then(|| spawn_stat_aggregator(&bus, stats.clone()));

        let state = AppState::new(
            links.clone(),
            stats.clone(),
            tokens.clone(),
            bus.clone(),
            BASE_URL,
            SIGNING_SECRET,
        );

        let app = Router::new()
            .fallback_service(app_router(state))
            .layer(MockConnectInfoLayer);

        Self {
            server: TestServer::new(app).unwrap(),
            links,
            stats,
            tokens,
            bus,
            aggregator,
        }
    }

    pub fn auth_header() -> String {
        format!("Bearer {VALID_TOKEN}")
    }

    /// Polls until the stored total reaches `expected` or a second passes.
    pub async fn wait_for_total_clicks(&self, expected: i64) -> i64 {
        for _ in 0..100 {
            let total = self.stats.total_clicks();
            if total >= expected {
                return total;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.stats.total_clicks()
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
