//! Amperhof basket integration
//!
//! Amperhof exposes no schedule feed and no pause API, only the ordered
//! basket with a delivery date per line. The provider therefore implements
//! [`DeliveryProvider`] directly instead of going through the schedule
//! pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use harvest_core::{Clock, DeliveryProvider, PauseOutcome};
use harvest_domain::constants::{DEFAULT_ITEM_QUANTITY, DEFAULT_SESSION_TTL_SECS};
use harvest_domain::{BasketItem, Delivery, HarvestError, ProviderConfig, Result};
use reqwest::header::COOKIE;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::dates::parse_date;
use crate::http::{find_cookie, HttpClient};

pub const DEFAULT_AMPERHOF_BASE_URL: &str = "https://www.amperhof.de";

const JWT_COOKIE: &str = "JWT";

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Deserialize)]
struct BasketResponse {
    data: BasketData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BasketData {
    #[serde(default)]
    ordered_basket: Vec<BasketLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BasketLine {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    unit: Option<UnitInfo>,
    information: ProductInfo,
    #[serde(default)]
    delivery_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnitInfo {
    #[serde(default)]
    unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductInfo {
    name: String,
}

impl BasketLine {
    fn product_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    fn into_item(self) -> BasketItem {
        let product_id = self.product_id();
        BasketItem {
            name: self.information.name,
            quantity: self.amount.unwrap_or(DEFAULT_ITEM_QUANTITY),
            unit: self.unit.and_then(|unit| unit.unit),
            product_id,
        }
    }
}

/// Group basket lines by delivery date and keep the earliest date not
/// before `today`. Lines without a parseable date are dropped.
fn next_basket(lines: Vec<BasketLine>, today: NaiveDate) -> Option<(NaiveDate, Vec<BasketItem>)> {
    let mut by_date: BTreeMap<NaiveDate, Vec<BasketItem>> = BTreeMap::new();
    for line in lines {
        let Some(date) = line.delivery_date.as_deref().and_then(parse_date) else {
            debug!(item = %line.information.name, "Ignoring basket line without delivery date");
            continue;
        };
        by_date.entry(date).or_default().push(line.into_item());
    }
    by_date.into_iter().find(|(date, _)| *date >= today)
}

/// Basket-only provider; pausing is not supported.
pub struct AmperhofProvider {
    http: HttpClient,
    base_url: String,
    username: String,
    password: String,
    clock: Arc<dyn Clock>,
    token: Mutex<Option<CachedToken>>,
}

impl AmperhofProvider {
    pub fn new(
        http: HttpClient,
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            clock,
            token: Mutex::new(None),
        }
    }

    pub fn from_config(config: &ProviderConfig, http: HttpClient, clock: Arc<dyn Clock>) -> Self {
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_AMPERHOF_BASE_URL);
        Self::new(http, base_url, config.username.clone(), config.password.clone(), clock)
    }

    async fn login(&self) -> Result<CachedToken> {
        let form = [("username", self.username.as_str()), ("password", self.password.as_str())];
        let request = self
            .http
            .request(Method::POST, format!("{}/proxy/user/login", self.base_url))
            .form(&form);
        let response = self.http.send_checked(request).await?;
        let status = response.status();

        let Some(cookie) = find_cookie(response.headers(), JWT_COOKIE) else {
            return Err(HarvestError::Auth(format!(
                "login failed: no JWT cookie in response (HTTP {status})"
            )));
        };
        let expires_at = cookie
            .expires
            .unwrap_or_else(|| Utc::now() + Duration::seconds(DEFAULT_SESSION_TTL_SECS));
        info!(%expires_at, "Authenticated with Amperhof");
        Ok(CachedToken { value: cookie.value, expires_at })
    }

    /// Cached token while it is valid, a fresh login otherwise.
    async fn token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.is_valid(Utc::now())) {
            return Ok(token.value.clone());
        }
        let fresh = self.login().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn load_basket(&self) -> Result<Vec<BasketLine>> {
        let token = self.token().await?;
        let request = self
            .http
            .request(Method::GET, format!("{}/api/basket/load", self.base_url))
            .header(COOKIE, format!("{JWT_COOKIE}={token}"));
        let response: BasketResponse = self.http.send_json(request).await?;
        Ok(response.data.ordered_basket)
    }
}

#[async_trait]
impl DeliveryProvider for AmperhofProvider {
    fn name(&self) -> &str {
        "Amperhof"
    }

    fn supports_pause(&self) -> bool {
        false
    }

    async fn authenticate(&self) -> Result<()> {
        let fresh = self.login().await?;
        *self.token.lock().await = Some(fresh);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn resolve_next(&self) -> Result<Delivery> {
        let lines = match self.load_basket().await {
            Err(err) if err.is_auth() => {
                warn!(error = %err, "Amperhof token rejected; logging in again");
                *self.token.lock().await = None;
                self.load_basket().await?
            }
            other => other?,
        };

        let today = self.clock.today();
        let Some((date, items)) = next_basket(lines, today) else {
            debug!(%today, "No upcoming Amperhof basket");
            return Ok(Delivery::empty(false));
        };

        info!(%date, items = items.len(), "Resolved next Amperhof basket");
        Ok(Delivery {
            delivery_date: Some(date),
            items,
            is_paused: false,
            supports_pause: false,
            last_order_change: None,
        })
    }

    async fn pause_next(&self) -> PauseOutcome {
        PauseOutcome::Unsupported
    }

    async fn unpause_next(&self) -> PauseOutcome {
        PauseOutcome::Unsupported
    }

    async fn close(&self) -> Result<()> {
        *self.token.lock().await = None;
        Ok(())
    }
}
