use time::{
    format_description::FormatItem, macros::format_description, Date, OffsetDateTime, UtcOffset,
};

pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Serde helpers for `YYYY-MM-DD` dates in JSON bodies and query strings.
pub mod iso_date {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_iso(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_iso(&raw).map_err(D::Error::custom)
    }

    pub mod option {
        use serde::{de::Error, Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => s.serialize_some(&super::super::format_iso(*d)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) if !raw.trim().is_empty() => super::super::parse_iso(raw.trim())
                    .map(Some)
                    .map_err(D::Error::custom),
                _ => Ok(None),
            }
        }
    }
}

/// Years a journal date may carry; anything else is rejected at the edge.
pub const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

pub fn parse_iso(raw: &str) -> anyhow::Result<Date> {
    let date = Date::parse(raw, ISO_DATE)?;
    anyhow::ensure!(YEARS.contains(&date.year()), "date {raw} is out of range");
    Ok(date)
}

pub fn format_iso(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}

/// Calendar day of "now" in the given offset.
pub fn today(offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(offset).date()
}

/// Three-letter English weekday, e.g. `Mon`.
pub fn short_weekday(date: Date) -> String {
    let name = date.weekday().to_string();
    name.chars().take(3).collect()
}
