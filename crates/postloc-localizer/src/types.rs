use postloc_core::Coordinates;

/// A postcode together with the position it was resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeLookupResult {
    pub postcode: String,
    pub coordinates: Coordinates,
}

/// What a previous session persisted. Trusted until overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedLocation {
    pub postcode: String,
    pub nearest_distance_km: f64,
}

/// A successful answer from one resolution source.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Distance is already known; skip straight to reveal.
    Cached(CachedLocation),
    /// Coordinates are known; distance still has to be computed.
    Located(PostcodeLookupResult),
}
