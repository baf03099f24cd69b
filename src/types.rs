use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Configuration stored in ~/.report-console/config.json
///
/// Every field has a default so a missing or partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Quiet period before a settings edit is written to the store.
    #[serde(default = "default_sync_debounce_ms")]
    pub sync_debounce_ms: u64,
    /// How long the send-now banner stays up before it dismisses itself.
    #[serde(default = "default_banner_seconds")]
    pub banner_seconds: u64,
    #[serde(default)]
    pub default_domain: Domain,
}

pub fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_sync_debounce_ms() -> u64 {
    400
}

fn default_banner_seconds() -> u64 {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            sync_debounce_ms: default_sync_debounce_ms(),
            banner_seconds: default_banner_seconds(),
            default_domain: Domain::default(),
        }
    }
}

// ============================================================================
// Metric catalogue
// ============================================================================

/// One of the nine catalogue metrics, `kpi001` through `kpi009`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricId(u8);

impl MetricId {
    pub const CATALOGUE: [MetricId; 9] = [
        MetricId(1),
        MetricId(2),
        MetricId(3),
        MetricId(4),
        MetricId(5),
        MetricId(6),
        MetricId(7),
        MetricId(8),
        MetricId(9),
    ];

    pub fn new(index: u8) -> Option<Self> {
        (1..=9).contains(&index).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kpi{:03}", self.0)
    }
}

impl FromStr for MetricId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("kpi")
            .filter(|digits| digits.len() == 3 && digits.starts_with("00"))
            .and_then(|digits| digits.parse::<u8>().ok())
            .and_then(MetricId::new)
            .ok_or_else(|| format!("unknown metric '{}'", s))
    }
}

impl Serialize for MetricId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MetricId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Settings wire shape
// ============================================================================

/// Send cadence of the scheduled report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Weekly and monthly schedules need a day token.
    pub fn needs_day(self) -> bool {
        !matches!(self, Frequency::Daily)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| format!("unknown frequency '{}'", wanted))
    }
}

/// A chart definition: an explicit metric list or an equation over metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ChartSpec {
    List(Vec<MetricId>),
    Equation(String),
}

/// Recipient addresses; travels as a single `;`-joined string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailingList(pub Vec<String>);

pub const MAILING_LIST_DELIMITER: char = ';';

impl Serialize for MailingList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.join(&MAILING_LIST_DELIMITER.to_string()))
    }
}

impl<'de> Deserialize<'de> for MailingList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(MailingList::default());
        }
        Ok(MailingList(
            raw.split(MAILING_LIST_DELIMITER).map(str::to_string).collect(),
        ))
    }
}

/// Report settings as persisted by the remote store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_back: Option<u32>,
    #[serde(default, with = "frequency_or_empty")]
    pub frequency: Option<Frequency>,
    #[serde(default, deserialize_with = "day_tokens")]
    pub days: Vec<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub time: String,
    #[serde(default)]
    pub mailing_list: MailingList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_chart: Option<ChartSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_chart: Option<ChartSpec>,
}

/// Unset frequency is written as `""`, and `""` or null reads back as unset.
mod frequency_or_empty {
    use super::Frequency;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Frequency>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.map(Frequency::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Frequency>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

/// The store accepts day tokens as text or numbers (day of month).
fn day_tokens<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "unsupported day token {}",
                other
            ))),
        })
        .collect()
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Recipients
// ============================================================================

/// Mail domains a recipient can be added under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    #[default]
    #[serde(rename = "@nokia.com")]
    Nokia,
    #[serde(rename = "@gmail.com")]
    Gmail,
    #[serde(rename = "@hotmail.com")]
    Hotmail,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Nokia, Domain::Gmail, Domain::Hotmail];

    pub fn suffix(self) -> &'static str {
        match self {
            Domain::Nokia => "@nokia.com",
            Domain::Gmail => "@gmail.com",
            Domain::Hotmail => "@hotmail.com",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for Domain {
    type Err = String;

    /// Accepts the suffix with or without the leading `@`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('@').to_ascii_lowercase();
        Domain::ALL
            .into_iter()
            .find(|d| &d.suffix()[1..] == wanted.as_str())
            .ok_or_else(|| format!("unknown domain '{}'", s))
    }
}

// ============================================================================
// Remote payloads
// ============================================================================

/// The signed-in account as reported by the session-check endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// `{ "message": ... }` responses from send and schedule endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReceipt {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportReceipt {
    #[serde(default)]
    pub ppt_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_id_round_trips_through_text() {
        let id: MetricId = "kpi007".parse().unwrap();
        assert_eq!(id.index(), 7);
        assert_eq!(id.to_string(), "kpi007");
        assert!("kpi010".parse::<MetricId>().is_err());
        assert!("kpi1".parse::<MetricId>().is_err());
        assert!("kpi000".parse::<MetricId>().is_err());
    }

    #[test]
    fn test_settings_serialize_unset_fields() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "frequency": "",
                "days": [],
                "time": "",
                "mailing_list": "",
            })
        );
    }

    #[test]
    fn test_settings_deserialize_store_defaults() {
        let raw = r#"{
            "days_back": 7,
            "frequency": "monthly",
            "time": null,
            "days": [15],
            "mailing_list": "a@nokia.com;b@gmail.com",
            "line_chart": {"type": "list", "value": ["kpi001", "kpi002"]},
            "bar_chart": {"type": "equation", "value": "kpi003 * 2"}
        }"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.days_back, Some(7));
        assert_eq!(settings.frequency, Some(Frequency::Monthly));
        assert_eq!(settings.days, vec!["15".to_string()]);
        assert_eq!(settings.time, "");
        assert_eq!(settings.mailing_list.0.len(), 2);
        assert_eq!(
            settings.line_chart,
            Some(ChartSpec::List(vec![
                MetricId::new(1).unwrap(),
                MetricId::new(2).unwrap()
            ]))
        );
        assert_eq!(
            settings.bar_chart,
            Some(ChartSpec::Equation("kpi003 * 2".to_string()))
        );
    }

    #[test]
    fn test_empty_frequency_reads_as_unset() {
        let settings: Settings = serde_json::from_str(r#"{"frequency": ""}"#).unwrap();
        assert_eq!(settings.frequency, None);
    }

    #[test]
    fn test_mailing_list_keeps_duplicates() {
        let list: MailingList = serde_json::from_str(r#""a@nokia.com;a@nokia.com""#).unwrap();
        assert_eq!(list.0, vec!["a@nokia.com", "a@nokia.com"]);
    }

    #[test]
    fn test_domain_parses_with_or_without_at() {
        assert_eq!("gmail.com".parse::<Domain>().unwrap(), Domain::Gmail);
        assert_eq!("@Hotmail.com".parse::<Domain>().unwrap(), Domain::Hotmail);
        assert!("example.com".parse::<Domain>().is_err());
    }

    #[test]
    fn test_config_defaults_from_partial_file() {
        let config: Config = serde_json::from_str(r#"{"apiUrl": "https://reports.example"}"#).unwrap();
        assert_eq!(config.api_url, "https://reports.example");
        assert_eq!(config.sync_debounce_ms, 400);
        assert_eq!(config.banner_seconds, 4);
        assert_eq!(config.default_domain, Domain::Nokia);
    }
}
