use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Current time truncated to millisecond precision, the resolution stored
/// documents are serialized with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// Fixed-width RFC 3339 (`2024-05-01T09:30:00.000Z`) so that string order in
/// the store matches chronological order.
pub mod millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_rfc3339(*dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::from_rfc3339(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn formatted_timestamps_sort_chronologically() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 5).unwrap();
        let later = base + Duration::milliseconds(500);
        let a = to_rfc3339(base);
        let b = to_rfc3339(later);
        assert_eq!(a, "2024-03-01T12:00:05.000Z");
        assert!(a < b);
        assert_eq!(from_rfc3339(&b).unwrap(), later);
    }
}
