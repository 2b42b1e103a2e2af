use super::*;
use serde_json::json;
use view::{derive_view, QueryState};

fn dataset() -> Vec<Product> {
    serde_json::from_value(json!([
        {
            "id": 1,
            "title": "Shoe",
            "price": 10,
            "category": {"id": 4, "name": "Shoes"},
            "images": ["a", "b", "c"]
        },
        {"id": 2, "title": "Hat", "price": 5.5}
    ]))
    .expect("dataset")
}

fn rendered(dataset: &[Product], query: &QueryState) -> String {
    let view = derive_view(dataset, query).expect("view");
    let mut out = Vec::new();
    render_page(&view, &mut out).expect("render");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn renders_rows_pagination_and_summary() {
    let dataset = dataset();
    let output = rendered(&dataset, &QueryState::default());
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], "id | title | price | category | images");
    assert!(lines[1].chars().all(|c| c == '-' || c == '+'));
    assert_eq!(lines[2], "1  | Shoe  | 10    | Shoes    | a b");
    assert_eq!(lines[3], "2  | Hat   | 5.5   |          |");
    assert_eq!(lines[4], "");
    assert_eq!(lines[5], "[1]");
    assert_eq!(lines[6], "1-2 of 2");
}

#[test]
fn pagination_brackets_current_page() {
    let dataset = dataset();
    let mut query = QueryState::with_page_size(1).expect("query");
    query.set_page(2).expect("page");
    let view = derive_view(&dataset, &query).expect("view");

    assert_eq!(pagination_line(&view), "1 [2]");
}

#[test]
fn long_titles_are_truncated_and_flattened() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("two\nlines", 20), "two lines");

    let long = "x".repeat(45);
    let cut = truncate(&long, TITLE_WIDTH);
    assert_eq!(cut.chars().count(), TITLE_WIDTH);
    assert!(cut.ends_with('…'));
}

#[test]
fn update_report_prints_server_echo_or_notes_missing_body() {
    let echoed: Product = serde_json::from_value(json!({
        "id": 99,
        "title": "Renamed lamp",
        "price": 12.5
    }))
    .expect("product");

    let report = update_report(ProductId(99), Some(&echoed)).expect("report");
    let parsed: serde_json::Value = serde_json::from_str(&report).expect("json");
    assert_eq!(parsed["id"], json!(99));
    assert_eq!(parsed["title"], json!("Renamed lamp"));

    assert_eq!(
        update_report(ProductId(99), None).expect("report"),
        "update of 99 accepted; server returned no product body"
    );
}
