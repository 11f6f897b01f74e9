//! The resolution driver.
//!
//! Owns the page for one session. `&mut self` on every transition means a
//! localizer resolves one location at a time.

use std::sync::Arc;

use postloc_core::{is_valid_postcode, nearest_fulfillment_point, round_distance_km};
use reqwest::Url;

use crate::error::ResolutionError;
use crate::geocode::{Geolocator, ReverseGeocoder};
use crate::page::Page;
use crate::proxy::ProxyClient;
use crate::sources::{
    CachedLocationSource, GeolocationSource, QueryParamSource, ResolutionSource, SourceOutcome,
};
use crate::store::{write_cached_location, KeyValueStore};
use crate::types::{CachedLocation, Resolution};

/// What a successful resolution showed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    pub postcode: String,
    pub distance_km: f64,
    /// Name of the source that resolved, or `"manual"` for form submission.
    pub source: &'static str,
}

#[derive(Debug)]
pub enum Outcome {
    Revealed(Reveal),
    /// No source had anything to offer, or the manual input was not a
    /// complete postcode. The page is unchanged.
    Unavailable,
    /// A source failed. The page keeps its previous state.
    Failed(ResolutionError),
}

pub struct Localizer {
    page: Page,
    store: Arc<dyn KeyValueStore>,
    proxy: Arc<ProxyClient>,
    cart_url: Url,
    sources: Vec<Box<dyn ResolutionSource>>,
}

impl Localizer {
    /// A localizer with no automatic sources; only manual submission
    /// resolves until [`Localizer::push_source`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::InvalidUrl`] if `cart_url` does not parse.
    pub fn new(
        page: Page,
        store: Arc<dyn KeyValueStore>,
        proxy: Arc<ProxyClient>,
        cart_url: &str,
    ) -> Result<Self, ResolutionError> {
        let cart_url = Url::parse(cart_url).map_err(|e| ResolutionError::InvalidUrl {
            url: cart_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            page,
            store,
            proxy,
            cart_url,
            sources: Vec::new(),
        })
    }

    /// Cache, then the `postcode` query parameter, then device geolocation.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::InvalidUrl`] if `cart_url` does not parse.
    pub fn with_default_sources(
        page: Page,
        store: Arc<dyn KeyValueStore>,
        proxy: Arc<ProxyClient>,
        cart_url: &str,
        geolocator: Arc<dyn Geolocator>,
        geocoder: ReverseGeocoder,
    ) -> Result<Self, ResolutionError> {
        let mut localizer = Self::new(page, Arc::clone(&store), Arc::clone(&proxy), cart_url)?;
        localizer.push_source(Box::new(CachedLocationSource::new(store)));
        localizer.push_source(Box::new(QueryParamSource::new(proxy)));
        localizer.push_source(Box::new(GeolocationSource::new(geolocator, geocoder)));
        Ok(localizer)
    }

    /// Appends a source; sources are tried in insertion order.
    pub fn push_source(&mut self, source: Box<dyn ResolutionSource>) {
        self.sources.push(source);
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Tries each source in order until one resolves or fails.
    pub async fn resolve_on_load(&mut self) -> Outcome {
        let mut found = None;
        for source in &self.sources {
            match source.attempt_resolve(&self.page).await {
                Ok(SourceOutcome::Resolved(resolution)) => {
                    found = Some((resolution, source.name()));
                    break;
                }
                Ok(SourceOutcome::NotAvailable) => {
                    tracing::debug!(source = source.name(), "location source not available");
                }
                Err(e) => {
                    tracing::warn!(
                        source = source.name(),
                        error = %e,
                        "location resolution failed"
                    );
                    return Outcome::Failed(e);
                }
            }
        }

        match found {
            Some((resolution, source)) => Outcome::Revealed(self.apply(resolution, source)),
            None => {
                tracing::debug!("no location source resolved; waiting for manual entry");
                Outcome::Unavailable
            }
        }
    }

    /// Keystroke handler for the postcode input. Returns the sanitized value.
    pub fn on_input(&mut self, raw: &str) -> &str {
        self.page.set_postcode_input(raw)
    }

    /// `Enter` submits; every other key is ignored.
    pub async fn on_keydown(&mut self, key: &str) -> Option<Outcome> {
        if key == "Enter" {
            Some(self.submit().await)
        } else {
            None
        }
    }

    /// Submits the postcode input. Anything but exactly four digits is
    /// ignored without a request.
    pub async fn submit(&mut self) -> Outcome {
        let postcode = self.page.postcode_input().trim().to_owned();
        if !is_valid_postcode(&postcode) {
            return Outcome::Unavailable;
        }

        match self.proxy.lookup(&postcode).await {
            Ok(found) => Outcome::Revealed(self.apply(Resolution::Located(found), "manual")),
            Err(e) => {
                tracing::warn!(postcode = %postcode, error = %e, "manual postcode lookup failed");
                Outcome::Failed(e)
            }
        }
    }

    fn apply(&mut self, resolution: Resolution, source: &'static str) -> Reveal {
        let (postcode, distance_km, persist) = match resolution {
            Resolution::Cached(cached) => (cached.postcode, cached.nearest_distance_km, false),
            Resolution::Located(found) => {
                let nearest = nearest_fulfillment_point(found.coordinates);
                let distance_km = round_distance_km(nearest.distance_km);
                tracing::info!(
                    postcode = %found.postcode,
                    nearest = nearest.point.name,
                    distance_km,
                    "resolved nearest fulfillment point"
                );
                (found.postcode, distance_km, true)
            }
        };

        self.page.reveal(&postcode, distance_km, &self.cart_url);

        if persist {
            let location = CachedLocation {
                postcode: postcode.clone(),
                nearest_distance_km: distance_km,
            };
            if let Err(e) = write_cached_location(self.store.as_ref(), &location) {
                tracing::warn!(error = %e, "failed to persist resolved location");
            }
        }

        Reveal {
            postcode,
            distance_km,
            source,
        }
    }
}
