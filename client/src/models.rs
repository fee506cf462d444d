//! # Payloads
//!
//! Request and response shapes of the verification backend.
//!
//! The backend is loose with types: quantities arrive as numbers or strings,
//! result codes as `"200"` or `200`, and the bottle label moves between several
//! fields. Everything is normalized here, once, so the rest of the crate only
//! sees one canonical shape.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const CONTROLLER: &str = "VerifikasiLabISLController";

pub const RESOLVE_FUNCTION: &str = "checkBottle2";
pub const SUBMIT_FUNCTION: &str = "storeBottle";
pub const INDEX_FUNCTION: &str = "index";
pub const STORE_FUNCTION: &str = "store";
pub const DASHBOARD_FUNCTION: &str = "dashboard";

/// Label of a bottle whose record names no type.
pub const MISSING_LABEL: &str = "-";

/// Result code carried in the body, separate from the HTTP status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCode(pub u16);

impl ResultCode {
    pub const OK: Self = Self(200);
    pub const CREATED: Self = Self(201);
}

impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        Ok(Self(code.unwrap_or_default()))
    }
}

/// Integer field that may arrive as a number, a numeric string or null.
///
/// Anything unparsable or negative reads as zero.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => leading_digits(&s),
        _ => None,
    };

    Ok(value.map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX)))
}

fn leading_digits(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());

    s[..end].parse().ok()
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Text(String),
    Detail { parameter: Option<String> },
    Other(Value),
}

/// Bottle record as the backend sends it, before normalization.
#[derive(Deserialize)]
struct RawBottle {
    #[serde(default, deserialize_with = "lenient_string")]
    koding: String,
    #[serde(default)]
    jenis_botol: Option<RawLabel>,
    #[serde(default)]
    type_botol: Option<String>,
    #[serde(default)]
    parameter: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    disiapkan: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    jumlah: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    add: u32,
    #[serde(default)]
    kategori: Option<String>,
}

impl RawBottle {
    fn label(&self) -> String {
        let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());

        let label = match &self.jenis_botol {
            Some(RawLabel::Detail { parameter }) => non_empty(parameter),
            Some(RawLabel::Text(text)) if !text.is_empty() => Some(text.clone()),
            Some(RawLabel::Other(Value::Number(n))) => Some(n.to_string()),
            _ => non_empty(&self.type_botol).or_else(|| non_empty(&self.parameter)),
        };

        label.unwrap_or_else(|| MISSING_LABEL.to_string())
    }
}

/// Bottle category. Air and emission samples are not counted per bottle.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    pub fn tracks_quantity(&self) -> bool {
        !matches!(self.0.as_str(), "4-Udara" | "5-Emisi")
    }
}

/// One bottle type of a sample's checklist.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "RawBottle")]
pub struct BottleEntry {
    pub koding: String,
    #[serde(rename = "jenis_botol")]
    pub label: String,
    pub disiapkan: u32,
    pub jumlah: u32,
    #[serde(rename = "kategori")]
    pub category: Category,
}

impl From<RawBottle> for BottleEntry {
    fn from(raw: RawBottle) -> Self {
        Self {
            label: raw.label(),
            koding: raw.koding,
            disiapkan: raw.disiapkan,
            jumlah: raw.jumlah,
            category: Category(raw.kategori.unwrap_or_default()),
        }
    }
}

/// Increment reported by one scan for one bottle type.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "RawBottle")]
pub struct BottleDelta {
    pub koding: String,
    pub label: String,
    pub disiapkan: u32,
    pub add: u32,
    pub category: Category,
}

impl From<RawBottle> for BottleDelta {
    fn from(raw: RawBottle) -> Self {
        Self {
            label: raw.label(),
            koding: raw.koding,
            disiapkan: raw.disiapkan,
            add: raw.add,
            category: Category(raw.kategori.unwrap_or_default()),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ResolveResponse {
    #[serde(default)]
    pub status: ResultCode,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub no_sampel: String,
    #[serde(default, deserialize_with = "null_default")]
    pub data_scan: Vec<BottleEntry>,
    #[serde(default, deserialize_with = "null_default")]
    pub data_botol: Vec<BottleDelta>,
}

#[derive(Serialize, Debug)]
pub struct SubmitRequest<'a> {
    pub no_sampel: &'a str,
    pub data_botol: &'a [BottleEntry],
    pub scanned_data: &'a str,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: ResultCode,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct LoginRequest<'a> {
    pub identity: &'a str,
    pub password: &'a str,
    pub mode: LoginMode,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoginMode {
    Login,
    /// Ends the user's other sessions first.
    DestroySession,
}

#[derive(Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pos: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dept: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub today: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub this_month: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SampleSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub no_sample: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nama_lengkap: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ftc_laboratory: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct SamplePage {
    #[serde(default)]
    pub data: Option<Vec<SampleSummary>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
