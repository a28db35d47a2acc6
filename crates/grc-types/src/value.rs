use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// GRC-20 value types a triple can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    Text,
    Number,
    Checkbox,
    Url,
    Time,
    Point,
}

impl ValueType {
    pub const ALL: [ValueType; 6] = [
        Self::Text,
        Self::Number,
        Self::Checkbox,
        Self::Url,
        Self::Time,
        Self::Point,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::Checkbox => "CHECKBOX",
            Self::Url => "URL",
            Self::Time => "TIME",
            Self::Point => "POINT",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| TypeError::UnknownValueType(s.to_string()))
    }
}

/// A typed triple value. The raw value is kept as the string the user
/// entered; GRC-20 encodes every value type as text on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub value_type: ValueType,
    pub raw_value: String,
}

impl Value {
    pub fn new(value_type: ValueType, raw_value: impl Into<String>) -> Self {
        Self {
            value_type,
            raw_value: raw_value.into(),
        }
    }

    pub fn text(raw_value: impl Into<String>) -> Self {
        Self::new(ValueType::Text, raw_value)
    }

    /// Check that the raw value parses for its declared type.
    pub fn validate(&self) -> Result<(), TypeError> {
        let raw = self.raw_value.trim();
        let fail = |reason: &str| TypeError::InvalidValue {
            value_type: self.value_type.to_string(),
            raw: self.raw_value.clone(),
            reason: reason.to_string(),
        };

        match self.value_type {
            ValueType::Text => Ok(()),
            ValueType::Number => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(()),
                _ => Err(fail("not a finite number")),
            },
            ValueType::Checkbox => match raw {
                "true" | "false" | "1" | "0" => Ok(()),
                _ => Err(fail("expected true, false, 1, or 0")),
            },
            ValueType::Url => {
                let (scheme, rest) = raw.split_once("://").ok_or_else(|| fail("missing scheme"))?;
                let scheme_ok = !scheme.is_empty()
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
                if scheme_ok && !rest.is_empty() {
                    Ok(())
                } else {
                    Err(fail("malformed url"))
                }
            }
            ValueType::Time => {
                if DateTime::parse_from_rfc3339(raw).is_ok()
                    || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
                {
                    Ok(())
                } else {
                    Err(fail("expected an RFC 3339 timestamp or YYYY-MM-DD date"))
                }
            }
            ValueType::Point => {
                let (lat, lon) = raw.split_once(',').ok_or_else(|| fail("expected lat,lon"))?;
                let lat: f64 = lat.trim().parse().map_err(|_| fail("latitude is not a number"))?;
                let lon: f64 = lon.trim().parse().map_err(|_| fail("longitude is not a number"))?;
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(fail("latitude out of range"));
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(fail("longitude out of range"));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_parse_and_display() {
        for t in ValueType::ALL {
            assert_eq!(t.to_string().parse::<ValueType>().unwrap(), t);
        }
        assert_eq!("text".parse::<ValueType>().unwrap(), ValueType::Text);
        assert!("BLOB".parse::<ValueType>().is_err());
    }

    #[test]
    fn value_serializes_camel_case() {
        let json = serde_json::to_value(Value::text("Alice")).unwrap();
        assert_eq!(json["valueType"], "TEXT");
        assert_eq!(json["rawValue"], "Alice");
    }

    #[test]
    fn text_accepts_anything() {
        assert!(Value::text("").validate().is_ok());
        assert!(Value::text("anything at all").validate().is_ok());
    }

    #[test]
    fn number_validation() {
        assert!(Value::new(ValueType::Number, "42").validate().is_ok());
        assert!(Value::new(ValueType::Number, "-3.5e2").validate().is_ok());
        assert!(Value::new(ValueType::Number, "forty").validate().is_err());
        assert!(Value::new(ValueType::Number, "NaN").validate().is_err());
    }

    #[test]
    fn checkbox_validation() {
        assert!(Value::new(ValueType::Checkbox, "true").validate().is_ok());
        assert!(Value::new(ValueType::Checkbox, "0").validate().is_ok());
        assert!(Value::new(ValueType::Checkbox, "yes").validate().is_err());
    }

    #[test]
    fn url_validation() {
        assert!(Value::new(ValueType::Url, "https://thegraph.com").validate().is_ok());
        assert!(Value::new(ValueType::Url, "ipfs://bafy").validate().is_ok());
        assert!(Value::new(ValueType::Url, "thegraph.com").validate().is_err());
        assert!(Value::new(ValueType::Url, "https://").validate().is_err());
    }

    #[test]
    fn time_validation() {
        assert!(Value::new(ValueType::Time, "2024-05-01T12:00:00Z").validate().is_ok());
        assert!(Value::new(ValueType::Time, "2024-05-01").validate().is_ok());
        assert!(Value::new(ValueType::Time, "yesterday").validate().is_err());
    }

    #[test]
    fn point_validation() {
        assert!(Value::new(ValueType::Point, "52.52, 13.40").validate().is_ok());
        assert!(Value::new(ValueType::Point, "91,0").validate().is_err());
        assert!(Value::new(ValueType::Point, "0,181").validate().is_err());
        assert!(Value::new(ValueType::Point, "52.52").validate().is_err());
    }

    #[test]
    fn invalid_value_error_mentions_type() {
        let err = Value::new(ValueType::Number, "x").validate().unwrap_err();
        assert!(err.to_string().contains("NUMBER"));
    }
}
