//! Ordered ways of learning where the shopper is.
//!
//! Each source either resolves, reports that it has nothing to offer (the
//! next source is tried), or fails (resolution stops and the page stays
//! masked).

use std::sync::Arc;

use async_trait::async_trait;
use postloc_core::is_valid_postcode;

use crate::error::ResolutionError;
use crate::geocode::{Geolocator, ReverseGeocoder};
use crate::page::Page;
use crate::proxy::ProxyClient;
use crate::store::{read_cached_location, KeyValueStore};
use crate::types::{PostcodeLookupResult, Resolution};

#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Resolved(Resolution),
    NotAvailable,
}

#[async_trait]
pub trait ResolutionSource: Send + Sync {
    /// Short label used in logs and in [`crate::Reveal::source`].
    fn name(&self) -> &'static str;

    async fn attempt_resolve(&self, page: &Page) -> Result<SourceOutcome, ResolutionError>;
}

/// A location persisted by an earlier session.
pub struct CachedLocationSource {
    store: Arc<dyn KeyValueStore>,
}

impl CachedLocationSource {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResolutionSource for CachedLocationSource {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn attempt_resolve(&self, _page: &Page) -> Result<SourceOutcome, ResolutionError> {
        Ok(read_cached_location(self.store.as_ref())
            .map_or(SourceOutcome::NotAvailable, |cached| {
                SourceOutcome::Resolved(Resolution::Cached(cached))
            }))
    }
}

/// A four-digit `postcode` query parameter on the page URL.
pub struct QueryParamSource {
    proxy: Arc<ProxyClient>,
}

impl QueryParamSource {
    #[must_use]
    pub fn new(proxy: Arc<ProxyClient>) -> Self {
        Self { proxy }
    }
}

#[async_trait]
impl ResolutionSource for QueryParamSource {
    fn name(&self) -> &'static str {
        "query"
    }

    async fn attempt_resolve(&self, page: &Page) -> Result<SourceOutcome, ResolutionError> {
        let Some(postcode) = page.query_param("postcode").filter(|p| is_valid_postcode(p)) else {
            return Ok(SourceOutcome::NotAvailable);
        };
        let found = self.proxy.lookup(&postcode).await?;
        Ok(SourceOutcome::Resolved(Resolution::Located(found)))
    }
}

/// The device position, reverse-geocoded to a postcode.
pub struct GeolocationSource {
    geolocator: Arc<dyn Geolocator>,
    geocoder: ReverseGeocoder,
}

impl GeolocationSource {
    #[must_use]
    pub fn new(geolocator: Arc<dyn Geolocator>, geocoder: ReverseGeocoder) -> Self {
        Self {
            geolocator,
            geocoder,
        }
    }
}

#[async_trait]
impl ResolutionSource for GeolocationSource {
    fn name(&self) -> &'static str {
        "geolocation"
    }

    async fn attempt_resolve(&self, _page: &Page) -> Result<SourceOutcome, ResolutionError> {
        if !self.geolocator.is_available() {
            return Ok(SourceOutcome::NotAvailable);
        }
        let coordinates = self.geolocator.current_position().await?;
        let postcode = self.geocoder.postcode_for(coordinates).await?;
        Ok(SourceOutcome::Resolved(Resolution::Located(
            PostcodeLookupResult {
                postcode,
                coordinates,
            },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::NoGeolocation;
    use crate::page::PageLayout;
    use crate::store::{MemoryStore, DISTANCE_KEY, POSTCODE_KEY};
    use crate::types::CachedLocation;

    fn page(url: &str) -> Page {
        Page::load(PageLayout {
            url: url.into(),
            ..PageLayout::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn cache_source_resolves_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(POSTCODE_KEY, "3000").unwrap();
        store.set(DISTANCE_KEY, "10.50").unwrap();

        let source = CachedLocationSource::new(store);
        let outcome = source
            .attempt_resolve(&page("https://shop.example/"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SourceOutcome::Resolved(Resolution::Cached(CachedLocation {
                postcode: "3000".into(),
                nearest_distance_km: 10.5,
            }))
        );
    }

    #[tokio::test]
    async fn cache_source_is_unavailable_when_empty() {
        let source = CachedLocationSource::new(Arc::new(MemoryStore::new()));
        let outcome = source
            .attempt_resolve(&page("https://shop.example/"))
            .await
            .unwrap();
        assert_eq!(outcome, SourceOutcome::NotAvailable);
    }

    #[tokio::test]
    async fn query_source_ignores_malformed_postcodes() {
        // Port 1 is never listening; reaching the proxy would fail the test.
        let proxy = Arc::new(ProxyClient::new("http://127.0.0.1:1").unwrap());
        let source = QueryParamSource::new(proxy);
        for url in [
            "https://shop.example/",
            "https://shop.example/?postcode=300",
            "https://shop.example/?postcode=30000",
            "https://shop.example/?postcode=30a0",
        ] {
            let outcome = source.attempt_resolve(&page(url)).await.unwrap();
            assert_eq!(outcome, SourceOutcome::NotAvailable, "{url}");
        }
    }

    #[tokio::test]
    async fn geolocation_source_is_unavailable_without_provider() {
        let source = GeolocationSource::new(
            Arc::new(NoGeolocation),
            ReverseGeocoder::new("http://127.0.0.1:1/reverse").unwrap(),
        );
        let outcome = source
            .attempt_resolve(&page("https://shop.example/"))
            .await
            .unwrap();
        assert_eq!(outcome, SourceOutcome::NotAvailable);
    }
}
