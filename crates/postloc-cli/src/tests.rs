use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["postloc"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_quote_with_repeated_prices() {
    let cli = Cli::try_parse_from([
        "postloc", "quote", "--price", "4999.00", "--price", "250", "--postcode", "3000",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Quote {
            ref prices,
            postcode: Some(ref p),
            lat: None,
            lon: None,
            cache: None,
            no_cache: false,
        }) if prices.len() == 2 && p == "3000"
    ));
}

#[test]
fn quote_requires_a_price() {
    assert!(Cli::try_parse_from(["postloc", "quote", "--postcode", "3000"]).is_err());
}

#[test]
fn quote_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "postloc", "quote", "--price", "10", "--lat", "-37.81", "--lon", "144.96",
    ])
    .unwrap();
    let Some(Commands::Quote { lat, lon, .. }) = cli.command else {
        panic!("expected quote");
    };
    assert_eq!(lat, Some(-37.81));
    assert_eq!(lon, Some(144.96));
}

#[test]
fn quote_latitude_requires_longitude() {
    assert!(Cli::try_parse_from(["postloc", "quote", "--price", "10", "--lat", "-37.81"]).is_err());
}

#[test]
fn quote_cache_conflicts_with_no_cache() {
    let result = Cli::try_parse_from([
        "postloc",
        "quote",
        "--price",
        "10",
        "--cache",
        "loc.json",
        "--no-cache",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_nearest() {
    let cli = Cli::try_parse_from(["postloc", "nearest", "--lat", "-27.5", "--lon", "153.0"])
        .unwrap();
    assert!(matches!(cli.command, Some(Commands::Nearest { .. })));
}

#[test]
fn page_layout_carries_postcode_in_url() {
    let layout = quote::page_layout(&["10".to_owned()], Some("3000"));
    assert_eq!(layout.url, "http://localhost/product?postcode=3000");
    assert_eq!(layout.price_texts, vec!["10".to_owned()]);
    assert_eq!(layout.buy_now_links.len(), 1);

    let bare = quote::page_layout(&[], None);
    assert_eq!(bare.url, "http://localhost/product");
}

#[tokio::test]
async fn quote_rejects_malformed_postcode_before_any_request() {
    let config = postloc_core::LocalizerConfig {
        proxy_url: "http://127.0.0.1:1".into(),
        geocode_url: "http://127.0.0.1:1/reverse".into(),
        cart_url: "https://cart.example/cart?name=spapool".into(),
        cache_path: "unused.json".into(),
        log_level: "info".into(),
    };
    let err = quote::run_quote(
        &config,
        quote::QuoteRequest {
            prices: vec!["10".into()],
            postcode: Some("30a0".into()),
            position: None,
            cache: None,
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("four digits"), "{err}");
}

#[tokio::test]
async fn quote_uses_cached_location_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loc.json");
    std::fs::write(
        &path,
        r#"{"userPostcode":"3000","nearestCollectionDistance":"10.50"}"#,
    )
    .unwrap();

    let config = postloc_core::LocalizerConfig {
        proxy_url: "http://127.0.0.1:1".into(),
        geocode_url: "http://127.0.0.1:1/reverse".into(),
        cart_url: "https://cart.example/cart?name=spapool".into(),
        cache_path: path.clone(),
        log_level: "info".into(),
    };
    quote::run_quote(
        &config,
        quote::QuoteRequest {
            prices: vec!["4999.00".into()],
            postcode: None,
            position: None,
            cache: Some(path),
        },
    )
    .await
    .expect("cached quote should not touch the network");
}

fn request(postcode: Option<&str>, position: Option<(f64, f64)>) -> quote::QuoteRequest {
    quote::QuoteRequest {
        prices: vec!["10".into()],
        postcode: postcode.map(str::to_owned),
        position,
        cache: Some("loc.json".into()),
    }
}

#[test]
fn cache_hit_with_explicit_postcode_prints_notice() {
    let notice = quote::cached_override_notice("cache", &request(Some("2000"), None))
        .expect("notice when an explicit postcode was skipped");
    assert!(notice.contains("loc.json"), "{notice}");
    assert!(notice.contains("--no-cache"), "{notice}");

    assert!(
        quote::cached_override_notice("cache", &request(None, Some((-37.8, 144.9)))).is_some()
    );
}

#[test]
fn no_notice_without_explicit_location_or_cache_hit() {
    assert!(quote::cached_override_notice("cache", &request(None, None)).is_none());
    assert!(quote::cached_override_notice("query", &request(Some("2000"), None)).is_none());
    assert!(quote::cached_override_notice("geolocation", &request(None, Some((1.0, 2.0)))).is_none());
}
