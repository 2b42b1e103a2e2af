use serde::{Deserialize, Serialize};

use crate::{domain::CategoryId, error::CatalogError};

const DEFAULT_CATEGORY_ID: CategoryId = CategoryId(1);

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category_id: CategoryId,
    pub images: Vec<String>,
}

/// Unvalidated form input, one string per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm {
    pub title: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub images: String,
}

impl DraftForm {
    pub fn into_draft(self) -> Result<ProductDraft, CatalogError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CatalogError::InvalidDraft("title must not be empty".into()));
        }

        let price = parse_price(&self.price);
        if price < 0.0 {
            return Err(CatalogError::InvalidDraft(format!(
                "price must not be negative, got {price}"
            )));
        }

        Ok(ProductDraft {
            title: title.to_string(),
            price,
            description: self.description,
            category_id: parse_category(&self.category),
            images: split_images(&self.images),
        })
    }
}

/// Leading number of the field, so `"12.5kg"` is 12.5. No leading number, or
/// a non-finite one, gives 0.
fn parse_price(raw: &str) -> f64 {
    float_prefix(raw.trim_start())
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .unwrap_or(0.0)
}

/// Leading integer of the field, so `"4.5"` is 4. No leading integer, or 0,
/// gives the default category.
fn parse_category(raw: &str) -> CategoryId {
    match integer_prefix(raw.trim_start()).parse::<i64>() {
        Ok(0) | Err(_) => DEFAULT_CATEGORY_ID,
        Ok(id) => CategoryId(id),
    }
}

fn digits_end(bytes: &[u8], start: usize) -> usize {
    start
        + bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
}

fn sign_end(bytes: &[u8], start: usize) -> usize {
    match bytes.get(start) {
        Some(b'+' | b'-') => start + 1,
        _ => start,
    }
}

fn integer_prefix(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let start = sign_end(bytes, 0);
    let end = digits_end(bytes, start);
    if end == start {
        ""
    } else {
        &raw[..end]
    }
}

fn float_prefix(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let int_start = sign_end(bytes, 0);
    let int_end = digits_end(bytes, int_start);
    let mut end = int_end;
    let mut has_digits = int_end > int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_end(bytes, end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = sign_end(bytes, end + 1);
        let exp_end = digits_end(bytes, exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    &raw[..end]
}

pub fn split_images(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
