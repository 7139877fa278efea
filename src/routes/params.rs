use serde::{Deserialize, Deserializer, de::IgnoredAny};

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Accepts a JSON number or a numeric string, truncating fractions.
/// Anything unparsable reads as absent so defaults and clamps apply.
pub fn loose_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(match value {
        Some(LooseNumber::Int(n)) => Some(n),
        Some(LooseNumber::Float(f)) => truncate(f),
        Some(LooseNumber::Text(text)) => text.trim().parse::<f64>().ok().and_then(truncate),
        Some(LooseNumber::Other(_)) | None => None,
    })
}

fn truncate(value: f64) -> Option<i64> {
    // `as` saturates at the i64 bounds, which every clamp absorbs.
    value.is_finite().then(|| value.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::loose_i64;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "loose_i64")]
        n: Option<i64>,
    }

    fn parse(raw: &str) -> Option<i64> {
        serde_json::from_str::<Body>(raw).expect("body should parse").n
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(parse(r#"{"n": 5}"#), Some(5));
        assert_eq!(parse(r#"{"n": 5.9}"#), Some(5));
        assert_eq!(parse(r#"{"n": " 42 "}"#), Some(42));
        assert_eq!(parse(r#"{"n": -3}"#), Some(-3));
    }

    #[test]
    fn unparsable_or_missing_values_are_absent() {
        assert_eq!(parse(r#"{}"#), None);
        assert_eq!(parse(r#"{"n": null}"#), None);
        assert_eq!(parse(r#"{"n": "lots"}"#), None);
        assert_eq!(parse(r#"{"n": [1]}"#), None);
    }

    #[test]
    fn query_strings_parse_through_text() {
        let body: Body = from_query("n=17");
        assert_eq!(body.n, Some(17));
    }

    fn from_query(raw: &str) -> Body {
        let uri: axum::http::Uri = format!("/x?{raw}").parse().expect("uri");
        axum::extract::Query::<Body>::try_from_uri(&uri)
            .expect("query should parse")
            .0
    }
}
