//! HTTP implementation of the remote store adapter.
//!
//! Talks to the remote store's REST surface:
//! - `GET <base>/sellers/<id>` - raw seller profile; 404 means the store
//!   does not exist
//! - `GET <base>/sellers/<id>/products` - raw products collection, a JSON
//!   object keyed by opaque product identifiers; 404 or an empty body is an
//!   empty collection
//!
//! Seller profiles are cached for 5 minutes via `moka`; product collections
//! are always fetched fresh, since the subscription loop depends on seeing
//! remote mutations.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::CatalogConfig;
use crate::error::RemoteError;

use super::{RawStoreSnapshot, RemoteStore};

const PROFILE_CACHE_CAPACITY: u64 = 1000;
const PROFILE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Remote store client over HTTP.
#[derive(Clone)]
pub struct HttpRemoteStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    profile_cache: Cache<String, Value>,
}

impl HttpRemoteStore {
    /// Create a new client from engine configuration.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let profile_cache = Cache::builder()
            .max_capacity(PROFILE_CACHE_CAPACITY)
            .time_to_live(PROFILE_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(Inner {
                client: reqwest::Client::new(),
                base_url: config.remote_base_url.clone(),
                api_key: config.remote_api_key.expose_secret().to_owned(),
                profile_cache,
            }),
        }
    }

    /// Fetch the raw seller profile, through the 5-minute cache.
    async fn fetch_seller(&self, seller_id: &str) -> Result<Value, RemoteError> {
        if let Some(cached) = self.inner.profile_cache.get(seller_id).await {
            debug!(seller_id, "Seller profile cache hit");
            return Ok(cached);
        }

        let value = self.get_json(&format!("sellers/{seller_id}"), seller_id).await?;
        self.inner
            .profile_cache
            .insert(seller_id.to_owned(), value.clone())
            .await;
        Ok(value)
    }

    /// Fetch the raw products collection, always fresh.
    async fn fetch_products(&self, seller_id: &str) -> Result<Vec<(String, Value)>, RemoteError> {
        let value = match self
            .get_json(&format!("sellers/{seller_id}/products"), seller_id)
            .await
        {
            Ok(value) => value,
            // A missing products sub-resource is an empty catalog; only
            // the profile fetch decides whether the store exists.
            Err(RemoteError::StoreNotFound(_)) => Value::Null,
            Err(e) => return Err(e),
        };

        // The collection is an object keyed by product id; sort keys so
        // snapshot comparison in the subscription loop is stable.
        let mut products: Vec<(String, Value)> = match value {
            Value::Object(map) => map.into_iter().collect(),
            // An empty or missing collection renders an empty catalog, not
            // an error.
            Value::Null => Vec::new(),
            other => {
                debug!(seller_id, "Unexpected products collection shape: {other}");
                Vec::new()
            }
        };
        products.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(products)
    }

    async fn get_json(&self, path: &str, seller_id: &str) -> Result<Value, RemoteError> {
        // Url::join would drop the base path without a trailing slash, so
        // build the endpoint by hand.
        let url = format!(
            "{}/{path}",
            self.inner.base_url.as_str().trim_end_matches('/')
        );

        let response = self
            .inner
            .client
            .get(url)
            .header("X-Api-Key", &self.inner.api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::StoreNotFound(seller_id.to_owned()));
        }
        let response = response.error_for_status()?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl RemoteStore for HttpRemoteStore {
    async fn fetch_snapshot(&self, seller_id: &str) -> Result<RawStoreSnapshot, RemoteError> {
        let seller = self.fetch_seller(seller_id).await?;
        let products = self.fetch_products(seller_id).await?;
        Ok(RawStoreSnapshot { seller, products })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base: &str) -> CatalogConfig {
        CatalogConfig {
            remote_base_url: Url::parse(base).unwrap(),
            remote_api_key: SecretString::from("test-key".to_owned()),
            fetch_timeout: Duration::from_secs(2),
            fetch_retries: 0,
            poll_interval: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn products_404_is_an_empty_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sellers/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "s1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sellers/s1/products"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = HttpRemoteStore::new(&config(&server.uri()));
        let snapshot = store.fetch_snapshot("s1").await.unwrap();

        assert_eq!(snapshot.seller["id"], "s1");
        assert!(snapshot.products.is_empty());
    }

    #[tokio::test]
    async fn missing_profile_is_store_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sellers/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = HttpRemoteStore::new(&config(&server.uri()));
        let err = store.fetch_snapshot("ghost").await.unwrap_err();

        assert!(matches!(err, RemoteError::StoreNotFound(ref id) if id == "ghost"));
    }
}
