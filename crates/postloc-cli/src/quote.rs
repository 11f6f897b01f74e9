//! `quote`: run the localizer headlessly against a synthetic product page.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use postloc_core::{is_valid_postcode, Coordinates, LocalizerConfig};
use postloc_localizer::{
    FixedGeolocator, Geolocator, JsonFileStore, KeyValueStore, Localizer, MemoryStore,
    NoGeolocation, Outcome, Page, PageLayout, ProxyClient, ReverseGeocoder,
};

/// The page the CLI pretends to be; only its query string matters.
const PAGE_URL: &str = "http://localhost/product";

#[derive(Debug)]
pub(crate) struct QuoteRequest {
    pub prices: Vec<String>,
    pub postcode: Option<String>,
    pub position: Option<(f64, f64)>,
    /// `None` keeps the location in memory for this run only.
    pub cache: Option<PathBuf>,
}

/// One price, one locale and one buy-now link per page, like the storefront
/// template. A postcode rides on the page URL the way a shared link would.
pub(crate) fn page_layout(prices: &[String], postcode: Option<&str>) -> PageLayout {
    let url = postcode.map_or_else(
        || PAGE_URL.to_owned(),
        |p| format!("{PAGE_URL}?postcode={p}"),
    );
    PageLayout {
        url,
        price_texts: prices.to_vec(),
        locale_elements: vec![String::new()],
        warning_elements: 1,
        modal_elements: 1,
        buy_now_links: vec!["#".to_owned()],
    }
}

/// Resolves a location and prints the localized prices.
///
/// # Errors
///
/// Returns an error if the postcode is malformed, a client or the cache
/// cannot be set up, or resolution fails.
pub(crate) async fn run_quote(config: &LocalizerConfig, request: QuoteRequest) -> anyhow::Result<()> {
    if let Some(postcode) = request.postcode.as_deref() {
        anyhow::ensure!(
            is_valid_postcode(postcode),
            "postcode must be exactly four digits, got {postcode:?}"
        );
    }

    let store: Arc<dyn KeyValueStore> = match &request.cache {
        Some(path) => Arc::new(
            JsonFileStore::open(path)
                .with_context(|| format!("opening location cache {}", path.display()))?,
        ),
        None => Arc::new(MemoryStore::new()),
    };

    let geolocator: Arc<dyn Geolocator> = match request.position {
        Some((lat, lon)) => Arc::new(FixedGeolocator(Coordinates::new(lat, lon))),
        None => Arc::new(NoGeolocation),
    };

    let page = Page::load(page_layout(&request.prices, request.postcode.as_deref()))?;
    let mut localizer = Localizer::with_default_sources(
        page,
        store,
        Arc::new(ProxyClient::new(&config.proxy_url)?),
        &config.cart_url,
        geolocator,
        ReverseGeocoder::new(&config.geocode_url)?,
    )?;

    let reveal = match localizer.resolve_on_load().await {
        Outcome::Revealed(reveal) => reveal,
        Outcome::Unavailable => {
            tracing::info!("no location source resolved");
            println!("no location available; pass --postcode or --lat/--lon");
            return Ok(());
        }
        Outcome::Failed(e) => {
            tracing::warn!(error = %e, "quote could not resolve a location");
            return Err(e).context("resolving shopper location");
        }
    };
    tracing::info!(
        source = reveal.source,
        postcode = %reveal.postcode,
        distance_km = reveal.distance_km,
        "location resolved"
    );

    if let Some(notice) = cached_override_notice(reveal.source, &request) {
        println!("{notice}");
    }

    let page = localizer.page();
    println!("{:<12}{}", "SOURCE", reveal.source);
    println!("{:<12}{}", "POSTCODE", reveal.postcode);
    println!("{:<12}{:.2} km", "DISTANCE", reveal.distance_km);
    for (base, shown) in request.prices.iter().zip(page.price_texts()) {
        println!("{:<12}{shown}  (base {})", "PRICE", base.trim());
    }
    if let Some(link) = page.buy_now_links().first() {
        println!("{:<12}{}", "BUY NOW", link.href);
    }

    Ok(())
}

/// When the cache answered, an explicit `--postcode` or `--lat/--lon` was not
/// consulted. Returns the line telling the user so.
pub(crate) fn cached_override_notice(source: &str, request: &QuoteRequest) -> Option<String> {
    if source != "cache" || (request.postcode.is_none() && request.position.is_none()) {
        return None;
    }
    let cache = request
        .cache
        .as_ref()
        .map_or_else(|| "the location cache".to_owned(), |p| p.display().to_string());
    Some(format!(
        "note: using the cached location from {cache}; pass --no-cache to look up the given location"
    ))
}
