//! Identifiers, directory entries and wire helpers shared across modules

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Report identifier assigned by the backend
    ReportId
);
id_type!(
    /// Checklist category identifier assigned by the backend
    CategoryId
);
id_type!(
    /// Checklist item identifier assigned by the backend
    ItemId
);
id_type!(
    /// Client establishment identifier
    ClientId
);
id_type!(
    /// Inspector (user) identifier
    InspectorId
);

/// Client establishment as listed by the client registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    #[serde(rename = "nome_fantasia")]
    pub display_name: String,
}

/// Inspector role in the user directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "chefe")]
    Chief,
    #[serde(rename = "operador")]
    Operator,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Admin => "admin",
            Role::Chief => "chief",
            Role::Operator => "operator",
        };
        f.write_str(label)
    }
}

/// Inspector that can be made responsible for a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspector {
    pub id: InspectorId,
    #[serde(rename = "nome")]
    pub name: String,
    pub role: Role,
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse a server-generated timestamp.
///
/// Accepts RFC 3339 and offset-less forms (the server clock is UTC). Returns
/// `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_naive(raw).map(|naive| naive.and_utc())
}

/// When an inspection is scheduled.
///
/// The scheduling form submits a wall-clock value with no offset and the
/// backend hands it back unchanged, so such values belong to whatever time
/// zone the reader is in. Values carrying an offset are fixed instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schedule {
    /// Wall-clock time without an offset
    Local(NaiveDateTime),
    /// Instant with an explicit offset
    Instant(DateTime<Utc>),
}

impl Schedule {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Schedule::Instant(dt.with_timezone(&Utc)));
        }
        parse_naive(raw).map(Schedule::Local)
    }

    /// Wall-clock time as seen in `tz`
    pub fn in_timezone<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDateTime {
        match self {
            Schedule::Local(naive) => *naive,
            Schedule::Instant(at) => at.with_timezone(tz).naive_local(),
        }
    }

    /// Calendar day as seen in `tz`
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.in_timezone(tz).date()
    }

    /// Position as the backend stores and filters it: wall-clock values as
    /// written, instants in UTC
    pub fn stored(&self) -> NaiveDateTime {
        match self {
            Schedule::Local(naive) => *naive,
            Schedule::Instant(at) => at.naive_utc(),
        }
    }
}

impl From<NaiveDateTime> for Schedule {
    fn from(naive: NaiveDateTime) -> Self {
        Schedule::Local(naive)
    }
}

impl From<DateTime<Utc>> for Schedule {
    fn from(at: DateTime<Utc>) -> Self {
        Schedule::Instant(at)
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Schedule::Local(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S")),
            Schedule::Instant(at) => f.write_str(&at.to_rfc3339()),
        }
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Schedule::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid schedule: {raw}")))
    }
}

/// Serde helpers for backend timestamps
pub(crate) mod timestamp {
    use super::*;
    use serde::de::Error;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }

    /// Lenient variant: anything unparseable becomes `None`
    pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient(deserializer, parse_timestamp)
    }

    /// Lenient schedule: anything unparseable reads as unscheduled
    pub fn deserialize_schedule<'de, D>(deserializer: D) -> Result<Option<Schedule>, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient(deserializer, Schedule::parse)
    }

    fn lenient<'de, D, T>(deserializer: D, parse: fn(&str) -> Option<T>) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(raw)) => {
                let parsed = parse(&raw);
                if parsed.is_none() && !raw.trim().is_empty() {
                    tracing::warn!(value = %raw, "Unparseable timestamp, treating as unset");
                }
                parsed
            }
            Some(other) => {
                tracing::warn!(value = %other, "Non-string timestamp, treating as unset");
                None
            }
        })
    }
}

/// `null` and missing strings read as empty
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2025-03-15T10:00:00-03:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 15, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_offsetless_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-03-15T10:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-15T10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-15 10:00:00.000"), Some(expected));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp("2025-13-40T99:00"), None);
    }

    #[test]
    fn test_schedule_keeps_wall_clock() {
        let schedule = Schedule::parse("2025-03-15T01:00:00").unwrap();
        let west = chrono::FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(schedule.date_in(&west), NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
        assert_eq!(schedule.date_in(&Utc), NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
        assert_eq!(schedule.to_string(), "2025-03-15T01:00:00");
    }

    #[test]
    fn test_schedule_with_offset_is_an_instant() {
        let schedule = Schedule::parse("2025-03-15T01:00:00Z").unwrap();
        let west = chrono::FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(schedule.date_in(&west), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(schedule.stored(), Utc.with_ymd_and_hms(2025, 3, 15, 1, 0, 0).unwrap().naive_utc());
        assert_eq!(Schedule::parse("tomorrow"), None);
    }

    #[test]
    fn test_inspector_wire_format() {
        let inspector: Inspector =
            serde_json::from_str(r#"{"id": 4, "nome": "Ana", "email": "ana@example.com", "role": "chefe"}"#)
                .unwrap();
        assert_eq!(inspector.id, InspectorId(4));
        assert_eq!(inspector.role, Role::Chief);
    }
}
