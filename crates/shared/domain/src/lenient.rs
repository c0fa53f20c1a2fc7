//! Lenient deserializers for inputs that may arrive as form fields.
//!
//! Multipart bodies carry every value as text, so numeric and boolean input
//! fields accept either their native JSON type or a string that parses to it.
//! List fields accept a single value or an array.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrText {
    Bool(bool),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn parse_number<E: de::Error>(value: NumberOrText) -> Result<f64, E> {
    match value {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("expected a number, got '{}'", s))),
    }
}

fn parse_bool<E: de::Error>(value: BoolOrText) -> Result<bool, E> {
    match value {
        BoolOrText::Bool(b) => Ok(b),
        BoolOrText::Text(s) => match s.trim() {
            "true" | "1" | "on" => Ok(true),
            "false" | "0" | "off" | "" => Ok(false),
            other => Err(E::custom(format!("expected a boolean, got '{}'", other))),
        },
    }
}

fn split_many(value: OneOrMany) -> Vec<String> {
    match value {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    }
}

pub fn f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    parse_number(NumberOrText::deserialize(deserializer)?)
}

pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<NumberOrText>::deserialize(deserializer)?
        .map(parse_number)
        .transpose()
}

pub fn opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    match opt_f64(deserializer)? {
        None => Ok(None),
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(Some(n as u32)),
        Some(n) => Err(de::Error::custom(format!(
            "expected a non-negative integer, got {}",
            n
        ))),
    }
}

pub fn opt_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Option::<BoolOrText>::deserialize(deserializer)?
        .map(parse_bool)
        .transpose()
}

pub fn strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<OneOrMany>::deserialize(deserializer)?
        .map(split_many)
        .unwrap_or_default())
}

pub fn opt_strings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(split_many))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Form {
        #[serde(deserialize_with = "super::f64")]
        price: f64,
        #[serde(default, deserialize_with = "super::opt_bool")]
        available: Option<bool>,
        #[serde(default, deserialize_with = "super::opt_u32")]
        stock: Option<u32>,
        #[serde(default, deserialize_with = "super::strings")]
        images: Vec<String>,
    }

    #[test]
    fn test_accepts_native_types() {
        let form: Form = serde_json::from_str(
            r#"{"price": 2.5, "available": true, "stock": 3, "images": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(form.price, 2.5);
        assert_eq!(form.available, Some(true));
        assert_eq!(form.stock, Some(3));
        assert_eq!(form.images, vec!["a", "b"]);
    }

    #[test]
    fn test_accepts_text_values() {
        let form: Form = serde_json::from_str(
            r#"{"price": "2.5", "available": "false", "stock": "7", "images": "a"}"#,
        )
        .unwrap();
        assert_eq!(form.price, 2.5);
        assert_eq!(form.available, Some(false));
        assert_eq!(form.stock, Some(7));
        assert_eq!(form.images, vec!["a"]);
    }

    #[test]
    fn test_missing_optionals_default() {
        let form: Form = serde_json::from_str(r#"{"price": 1}"#).unwrap();
        assert_eq!(form.available, None);
        assert_eq!(form.stock, None);
        assert!(form.images.is_empty());
    }

    #[test]
    fn test_rejects_garbage_number() {
        assert!(serde_json::from_str::<Form>(r#"{"price": "cheap"}"#).is_err());
        assert!(serde_json::from_str::<Form>(r#"{"price": 1, "stock": "-2"}"#).is_err());
    }
}
