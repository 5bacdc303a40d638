use serde::de::IntoDeserializer as _;
use serde::{Deserialize, Deserializer};

pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    if let Some(str) = Option::<String>::deserialize(deserializer)? {
        let str = str.trim();
        if str.is_empty() {
            Ok(None)
        } else {
            T::deserialize(str.into_deserializer()).map(Some)
        }
    } else {
        Ok(None)
    }
}

/// Checkbox and select values: `1`, `true` and `on` are `true`
pub(crate) fn form_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(s) = Option::<String>::deserialize(deserializer)? else {
        return Ok(false);
    };
    Ok(matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on"
    ))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Input {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        pid: Option<u64>,
        #[serde(default, deserialize_with = "form_bool")]
        published: bool,
    }

    fn parse(query: &str) -> Input {
        let uri = format!("/admin?{query}").parse().expect("valid uri");
        axum::extract::Query::<Input>::try_from_uri(&uri)
            .expect("valid query")
            .0
    }

    #[test]
    fn empty_values_are_none() {
        assert_eq!(parse("pid=").pid, None);
        assert_eq!(parse("pid=%20").pid, None);
        assert_eq!(parse("").pid, None);
        assert_eq!(parse("pid=7").pid, Some(7));
    }

    #[test]
    fn form_bools() {
        assert!(parse("published=1").published);
        assert!(parse("published=on").published);
        assert!(!parse("published=0").published);
        assert!(!parse("").published);
    }
}
