use async_trait::async_trait;
use chrono::NaiveDateTime;
use harvest_core::DeliverySource;
use harvest_domain::{FeedRecord, HarvestError, OrderRecord, ProviderConfig, Result};
use reqwest::header::COOKIE;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::wire::{parse_feed, parse_order_items, LogonResponse, PauseRequest};
use crate::http::{find_cookie, HttpClient};

/// Public endpoint shared by all OekoBox shops; the shop id is appended.
pub const DEFAULT_OEKOBOX_BASE_URL: &str = "https://oekobox-online.eu/v3/shop";

const SESSION_COOKIE: &str = "JSESSIONID";
const SOURCE_NAME: &str = "OekoBox Online";

/// HTTP adapter for an OekoBox shop account.
///
/// Holds the session cookie obtained at logon. Re-authentication on expiry
/// is handled by the core session decorator, not here.
pub struct OekoboxSource {
    http: HttpClient,
    shop_url: String,
    username: String,
    password: String,
    session: RwLock<Option<String>>,
}

impl OekoboxSource {
    /// Create a source for `shop_id` under `base_url`.
    pub fn new(
        http: HttpClient,
        base_url: &str,
        shop_id: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let shop_url = format!("{}/{}", base_url.trim_end_matches('/'), shop_id.trim_matches('/'));
        Self {
            http,
            shop_url,
            username: username.into(),
            password: password.into(),
            session: RwLock::new(None),
        }
    }

    /// Build a source from validated provider configuration.
    ///
    /// # Errors
    /// Returns `HarvestError::Config` when no shop id is configured, or an
    /// error from constructing the HTTP client.
    pub fn from_config(config: &ProviderConfig, http: HttpClient) -> Result<Self> {
        let shop_id = config
            .shop_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| HarvestError::Config("OekoBox requires a shop_id".into()))?;
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_OEKOBOX_BASE_URL);
        Ok(Self::new(http, base_url, shop_id, config.username.clone(), config.password.clone()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.shop_url, path)
    }

    async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let session = self.session.read().await;
        let token = session
            .as_deref()
            .ok_or_else(|| HarvestError::Auth("no OekoBox session; log on first".into()))?;
        Ok(self
            .http
            .request(method, self.url(path))
            .header(COOKIE, format!("{SESSION_COOKIE}={token}")))
    }
}

#[async_trait]
impl DeliverySource for OekoboxSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn supports_pause(&self) -> bool {
        true
    }

    #[instrument(skip(self), fields(shop = %self.shop_url))]
    async fn authenticate(&self) -> Result<()> {
        let form = [
            ("login", self.username.as_str()),
            ("password", self.password.as_str()),
            ("guest", "false"),
        ];
        let request = self.http.request(Method::POST, self.url("/api/logon")).form(&form);
        let response = self.http.send_checked(request).await?;

        let cookie = find_cookie(response.headers(), SESSION_COOKIE);
        let body: LogonResponse = response.json().await.map_err(|err| {
            HarvestError::Auth(format!("unreadable logon response: {err}"))
        })?;

        if !body.is_ok() {
            let reason = body.message.unwrap_or_else(|| "logon rejected".to_string());
            *self.session.write().await = None;
            return Err(HarvestError::Auth(reason));
        }
        let Some(cookie) = cookie else {
            *self.session.write().await = None;
            return Err(HarvestError::Auth("logon response carried no session cookie".into()));
        };

        *self.session.write().await = Some(cookie.value);
        info!("Authenticated with OekoBox Online");
        Ok(())
    }

    async fn list_schedule(&self) -> Result<Vec<FeedRecord>> {
        let request = self.authorized(Method::GET, "/api/client/dates").await?;
        let values: Vec<Value> = self.http.send_json(request).await?;
        let records = parse_feed(values);
        debug!(records = records.len(), "Fetched OekoBox dates feed");
        Ok(records)
    }

    async fn list_order_items(&self, order_id: i64) -> Result<Vec<OrderRecord>> {
        let path = format!("/api/client/order/{order_id}/items");
        let request = self.authorized(Method::GET, &path).await?;
        let values: Vec<Value> = self.http.send_json(request).await?;
        let records = parse_order_items(values);
        debug!(order_id, records = records.len(), "Fetched OekoBox order items");
        Ok(records)
    }

    async fn create_pause(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        auto_cancel: bool,
    ) -> Result<()> {
        let request = self
            .authorized(Method::POST, "/api/client/pause")
            .await?
            .json(&PauseRequest::new(from, to, auto_cancel));
        self.http.send_checked(request).await?;
        debug!(%from, %to, auto_cancel, "OekoBox accepted pause window");
        Ok(())
    }

    async fn remove_pause(&self, pause_id: &str) -> Result<()> {
        let path = format!("/api/client/pause/{pause_id}");
        let request = self.authorized(Method::DELETE, &path).await?;
        self.http.send_checked(request).await?;
        debug!(pause_id, "OekoBox dropped pause");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let had_session = self.session.read().await.is_some();
        if had_session {
            let request = self.authorized(Method::POST, "/api/logout").await?;
            if let Err(err) = self.http.send_checked(request).await {
                warn!(error = %err, "OekoBox logout failed; dropping session anyway");
            }
        }
        *self.session.write().await = None;
        Ok(())
    }
}
