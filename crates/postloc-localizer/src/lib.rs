//! Distance-based price localization for a product page.
//!
//! A [`Localizer`] owns a [`Page`] model, masks its prices on load, then
//! tries an ordered list of [`ResolutionSource`]s (cached location, URL
//! query parameter, device geolocation) to learn the shopper's postcode.
//! Once a location is known the distance to the nearest fulfillment point
//! sets a surcharge, prices are revealed, purchase links are rewritten and
//! the result is cached in a [`KeyValueStore`] for the next visit.

pub mod error;
pub mod geocode;
pub mod localizer;
pub mod page;
pub mod proxy;
pub mod sources;
pub mod store;
pub mod types;

pub use error::{ResolutionError, StoreError};
pub use geocode::{FixedGeolocator, Geolocator, NoGeolocation, ReverseGeocoder};
pub use localizer::{Localizer, Outcome, Reveal};
pub use page::{BuyNowLink, Page, PageLayout};
pub use proxy::ProxyClient;
pub use sources::{
    CachedLocationSource, GeolocationSource, QueryParamSource, ResolutionSource, SourceOutcome,
};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use types::{CachedLocation, PostcodeLookupResult, Resolution};
