//! Postcode search response types.
//!
//! The upstream API converts XML to JSON, which gives it a few quirks:
//! `localities.locality` is a bare object when there is one match and an
//! array when there are several, `localities` is the empty string when there
//! are none, and numeric fields can arrive as numbers or strings.

use serde::{Deserialize, Deserializer};

/// Top-level body of `GET /postcode/search.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostcodeSearchResponse {
    #[serde(default)]
    pub localities: Option<LocalitiesField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocalitiesField {
    Found { locality: LocalityList },
    /// `""` when the postcode matched nothing.
    Empty(String),
}

/// One or many localities, normalised by [`LocalityList::as_slice`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocalityList {
    Many(Vec<Locality>),
    One(Locality),
}

impl LocalityList {
    #[must_use]
    pub fn as_slice(&self) -> &[Locality] {
        match self {
            Self::Many(items) => items,
            Self::One(item) => std::slice::from_ref(item),
        }
    }
}

/// A named place within a postcode.
#[derive(Debug, Clone, Deserialize)]
pub struct Locality {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub postcode: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub longitude: Option<f64>,
}

impl Locality {
    /// `(latitude, longitude)` when both are present.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

impl PostcodeSearchResponse {
    /// Parses an already-decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body does not have the expected
    /// shape.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// All localities in upstream order; empty when nothing matched.
    #[must_use]
    pub fn localities(&self) -> &[Locality] {
        match &self.localities {
            Some(LocalitiesField::Found { locality }) => locality.as_slice(),
            Some(LocalitiesField::Empty(_)) | None => &[],
        }
    }

    /// The first locality that carries coordinates. Post-office-box style
    /// entries without a position are skipped.
    #[must_use]
    pub fn first_locality(&self) -> Option<&Locality> {
        self.localities()
            .iter()
            .find(|l| l.coordinates().is_some())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|v| match v {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}

fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.and_then(|v| match v {
            StringOrNumber::String(s) => s.trim().parse::<f64>().ok(),
            StringOrNumber::Number(n) => n.as_f64(),
        }),
    )
}
