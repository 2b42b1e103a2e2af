use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier '{0}'")]
pub struct ParseIdError(pub String);

/// Identifiers arrive as JSON numbers from well-behaved servers and as numeric
/// strings from form fields and sloppier ones; both collapse to the same value.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseId {
    fn resolve(self) -> Result<i64, ParseIdError> {
        match self {
            LooseId::Int(value) => Ok(value),
            // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
            LooseId::Float(value)
                if value.fract() == 0.0
                    && value >= i64::MIN as f64
                    && value < i64::MAX as f64 =>
            {
                Ok(value as i64)
            }
            LooseId::Float(value) => Err(ParseIdError(value.to_string())),
            LooseId::Text(text) => parse_loose_id(&text),
        }
    }
}

fn parse_loose_id(raw: &str) -> Result<i64, ParseIdError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ParseIdError(raw.to_string()))
}

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(pub i64);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                LooseId::deserialize(deserializer)?
                    .resolve()
                    .map($name)
                    .map_err(serde::de::Error::custom)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                parse_loose_id(raw).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProductId);
id_newtype!(CategoryId);

impl ProductId {
    /// Compares against user-supplied text the way a form field would: `"3"` and
    /// `" 3 "` both match `ProductId(3)`.
    pub fn matches_raw(&self, raw: &str) -> bool {
        parse_loose_id(raw).is_ok_and(|value| value == self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CategoryRepr", into = "CategoryRepr")]
pub enum Category {
    Named { id: CategoryId, name: String },
    IdOnly(CategoryId),
}

impl Category {
    pub fn id(&self) -> CategoryId {
        match self {
            Category::Named { id, .. } | Category::IdOnly(id) => *id,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Category::Named { name, .. } if !name.is_empty() => name.clone(),
            Category::Named { id, .. } | Category::IdOnly(id) => id.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CategoryRepr {
    Object {
        id: CategoryId,
        #[serde(default)]
        name: String,
    },
    Id(CategoryId),
}

impl From<CategoryRepr> for Category {
    fn from(value: CategoryRepr) -> Self {
        match value {
            CategoryRepr::Object { id, name } => Category::Named { id, name },
            CategoryRepr::Id(id) => Category::IdOnly(id),
        }
    }
}

impl From<Category> for CategoryRepr {
    fn from(value: Category) -> Self {
        match value {
            Category::Named { id, name } => CategoryRepr::Object { id, name },
            Category::IdOnly(id) => CategoryRepr::Id(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    /// Fields the table does not consume (slug, timestamps, ...), kept so a
    /// product survives a round-trip untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn category_label(&self) -> String {
        self.category
            .as_ref()
            .map(Category::label)
            .unwrap_or_default()
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn product_id_accepts_numbers_and_numeric_strings() {
        let from_number: ProductId = serde_json::from_value(json!(3)).expect("number");
        let from_text: ProductId = serde_json::from_value(json!("3")).expect("text");
        assert_eq!(from_number, from_text);
        assert!(serde_json::from_value::<ProductId>(json!("three")).is_err());
    }

    #[test]
    fn integral_floats_are_ids_only_within_i64_range() {
        let whole: ProductId = serde_json::from_value(json!(3.0)).expect("whole float");
        assert_eq!(whole, ProductId(3));
        for raw in [json!(4.5), json!(1e20), json!(-1e19)] {
            assert!(
                serde_json::from_value::<ProductId>(raw.clone()).is_err(),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn product_id_matches_raw_text_loosely() {
        assert!(ProductId(3).matches_raw("3"));
        assert!(ProductId(3).matches_raw(" 3 "));
        assert!(!ProductId(3).matches_raw("4"));
        assert!(!ProductId(3).matches_raw(""));
    }

    #[test]
    fn category_resolves_both_shapes() {
        let named: Category =
            serde_json::from_value(json!({"id": 2, "name": "Shoes", "slug": "shoes"}))
                .expect("object");
        assert_eq!(
            named,
            Category::Named {
                id: CategoryId(2),
                name: "Shoes".into()
            }
        );
        assert_eq!(named.label(), "Shoes");

        let raw: Category = serde_json::from_value(json!(5)).expect("raw id");
        assert_eq!(raw, Category::IdOnly(CategoryId(5)));
        assert_eq!(raw.label(), "5");
        assert_eq!(raw.id(), CategoryId(5));
    }

    #[test]
    fn product_keeps_unknown_fields_and_tolerates_missing_optionals() {
        let product: Product = serde_json::from_value(json!({
            "id": 7,
            "title": "Lamp",
            "price": 12.5,
            "images": null,
            "slug": "lamp"
        }))
        .expect("decode");

        assert!(product.images.is_empty());
        assert!(product.category.is_none());
        assert_eq!(product.category_label(), "");
        assert_eq!(product.extra.get("slug"), Some(&json!("lamp")));

        let encoded = serde_json::to_value(&product).expect("encode");
        assert_eq!(encoded["slug"], json!("lamp"));
    }
}
