// src/search/mod.rs
pub mod http;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FetchError;
use crate::geo::Point;

/// Identifier value the API uses (and we treat) as "no id".
pub const SENTINEL_ID: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub time: Option<String>,
    pub kind: Option<String>,
}

/// One appointment location from the search feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Site {
    /// `None` when the feed had no usable id; such sites always count as new.
    pub id: Option<i64>,
    pub point: Option<Point>,
    pub appointments_available: bool,
    pub second_dose_only: bool,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub appointments: Vec<Appointment>,
}

/// Every site returned by one search, in feed order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResult {
    pub sites: Vec<Site>,
}

impl SearchResult {
    pub fn new(sites: Vec<Site>) -> Self {
        Self { sites }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Anything that can produce one search result per cycle.
#[async_trait::async_trait]
pub trait SiteSource: Send + Sync {
    async fn fetch(&self) -> Result<SearchResult, FetchError>;
    fn name(&self) -> &'static str;
}

// --- GeoJSON wire shapes. Properties stay loose so one odd field can't sink a cycle. ---

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Option<Vec<RawFeature>>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

/// Decode a GeoJSON feature collection body into a [`SearchResult`].
pub fn decode_feature_collection(body: &str) -> Result<SearchResult, FetchError> {
    let raw: RawCollection = serde_json::from_str(body)?;
    if raw.kind != "FeatureCollection" {
        return Err(FetchError::Decode(format!(
            "not a feature collection: type={}",
            raw.kind
        )));
    }

    let sites = raw
        .features
        .unwrap_or_default()
        .into_iter()
        .map(site_from_feature)
        .collect();
    Ok(SearchResult { sites })
}

fn site_from_feature(f: RawFeature) -> Site {
    let props = f.properties.unwrap_or_default();

    Site {
        id: prop_int(&props, "id").filter(|id| *id != SENTINEL_ID),
        point: f.geometry.as_ref().and_then(point_from_geometry),
        appointments_available: prop_bool(&props, "appointments_available"),
        second_dose_only: prop_bool(&props, "appointments_available_2nd_dose_only"),
        name: prop_string(&props, "provider_brand_name"),
        address: prop_string(&props, "address"),
        city: prop_string(&props, "city"),
        state: prop_string(&props, "state"),
        appointments: appointments_from(&props),
    }
}

fn point_from_geometry(g: &Value) -> Option<Point> {
    if g.get("type")?.as_str()? != "Point" {
        return None;
    }
    let coords = g.get("coordinates")?.as_array()?;
    match coords.as_slice() {
        [lon, lat, ..] => Some(Point::new(lon.as_f64()?, lat.as_f64()?)),
        _ => None,
    }
}

fn prop_bool(props: &Map<String, Value>, key: &str) -> bool {
    props.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn prop_string(props: &Map<String, Value>, key: &str) -> Option<String> {
    props.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Integer property; whole floats (`12.0`) are accepted since JSON doesn't distinguish.
fn prop_int(props: &Map<String, Value>, key: &str) -> Option<i64> {
    let v = props.get(key)?;
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

fn appointments_from(props: &Map<String, Value>) -> Vec<Appointment> {
    let Some(list) = props.get("appointments").and_then(Value::as_array) else {
        return Vec::new();
    };

    list.iter()
        .filter_map(Value::as_object)
        .map(|fields| Appointment {
            time: fields.get("time").map(display_value),
            kind: fields.get("type").map(display_value),
        })
        .collect()
}

fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
