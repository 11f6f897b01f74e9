//! In-memory model of the product page the localizer drives.
//!
//! Element groups mirror the page's `data-localization` hooks: price,
//! locale, warning and modal elements, the postcode input, and the buy-now
//! links. Only the localizer mutates a [`Page`].

use postloc_core::{
    adjusted_price, format_price, parse_base_price, sanitize_postcode_input, PRICE_MASK,
};
use reqwest::Url;
use rust_decimal::Decimal;

use crate::error::ResolutionError;

/// Markup the page is loaded from.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    /// Address the page was served from; its query string may carry a
    /// `postcode` parameter.
    pub url: String,
    /// Text content of each price element, in document order.
    pub price_texts: Vec<String>,
    /// Initial text of each locale element.
    pub locale_elements: Vec<String>,
    pub warning_elements: usize,
    pub modal_elements: usize,
    /// Initial `href` of each buy-now link.
    pub buy_now_links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyNowLink {
    pub href: String,
    pub disabled: bool,
}

#[derive(Debug, Clone)]
struct PriceElement {
    base: Decimal,
    text: String,
}

#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    prices: Vec<PriceElement>,
    locale_texts: Vec<String>,
    warnings_visible: Vec<bool>,
    modals_visible: Vec<bool>,
    buy_now_links: Vec<BuyNowLink>,
    postcode_input: String,
    revealed: bool,
}

impl Page {
    /// Captures each base price, then masks every price, shows every warning
    /// and modal, and disables every buy-now link.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::InvalidUrl`] if `layout.url` is not an
    /// absolute URL.
    pub fn load(layout: PageLayout) -> Result<Self, ResolutionError> {
        let url = Url::parse(&layout.url).map_err(|e| ResolutionError::InvalidUrl {
            url: layout.url.clone(),
            reason: e.to_string(),
        })?;

        let prices = layout
            .price_texts
            .iter()
            .map(|text| PriceElement {
                base: parse_base_price(text),
                text: PRICE_MASK.to_owned(),
            })
            .collect();

        let buy_now_links = layout
            .buy_now_links
            .into_iter()
            .map(|href| BuyNowLink {
                href,
                disabled: true,
            })
            .collect();

        Ok(Self {
            url,
            prices,
            locale_texts: layout.locale_elements,
            warnings_visible: vec![true; layout.warning_elements],
            modals_visible: vec![true; layout.modal_elements],
            buy_now_links,
            postcode_input: String::new(),
            revealed: false,
        })
    }

    /// Value of a query parameter on the page URL.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Writes adjusted prices, hides warnings and modals, shows `postcode`
    /// in every locale element, and points the buy-now links at the cart.
    pub fn reveal(&mut self, postcode: &str, distance_km: f64, cart_url: &Url) {
        for price in &mut self.prices {
            price.text = format_price(adjusted_price(price.base, distance_km));
        }
        self.warnings_visible.fill(false);
        self.modals_visible.fill(false);
        for text in &mut self.locale_texts {
            postcode.clone_into(text);
        }
        self.revealed = true;
        self.update_buy_now_links(postcode.trim(), cart_url);
    }

    /// Links carry the first displayed price (`"0"` without price elements)
    /// and the postcode. They stay disabled while either is unset.
    fn update_buy_now_links(&mut self, postcode: &str, cart_url: &Url) {
        let price = self
            .prices
            .first()
            .map_or_else(|| "0".to_owned(), |p| p.text.trim().to_owned());

        if postcode.is_empty() || price == PRICE_MASK {
            for link in &mut self.buy_now_links {
                link.disabled = true;
            }
            return;
        }

        let href = cart_link(cart_url, &price, postcode);
        for link in &mut self.buy_now_links {
            link.href.clone_from(&href);
            link.disabled = false;
        }
    }

    /// Sanitizes a keystroke-level input value to at most four digits and
    /// stores it. Returns the sanitized value.
    pub fn set_postcode_input(&mut self, raw: &str) -> &str {
        self.postcode_input = sanitize_postcode_input(raw);
        &self.postcode_input
    }

    #[must_use]
    pub fn postcode_input(&self) -> &str {
        &self.postcode_input
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn price_texts(&self) -> Vec<&str> {
        self.prices.iter().map(|p| p.text.as_str()).collect()
    }

    #[must_use]
    pub fn base_prices(&self) -> Vec<Decimal> {
        self.prices.iter().map(|p| p.base).collect()
    }

    #[must_use]
    pub fn locale_texts(&self) -> &[String] {
        &self.locale_texts
    }

    #[must_use]
    pub fn warnings_visible(&self) -> &[bool] {
        &self.warnings_visible
    }

    #[must_use]
    pub fn modals_visible(&self) -> &[bool] {
        &self.modals_visible
    }

    #[must_use]
    pub fn buy_now_links(&self) -> &[BuyNowLink] {
        &self.buy_now_links
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

/// The cart URL with `price` and `zip` replaced; other parameters are kept
/// in their original order.
fn cart_link(cart_url: &Url, price: &str, postcode: &str) -> String {
    let kept: Vec<(String, String)> = cart_url
        .query_pairs()
        .filter(|(key, _)| key != "price" && key != "zip")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = cart_url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("price", price)
        .append_pair("zip", postcode);
    url.into()
}
