use sacco_admin::core::response::{
    page_offset, total_pages, ApiResponse, PaginatedResponse,
};

#[test]
fn test_total_pages_rounds_up() {
    assert_eq!(total_pages(0, 10), 0);
    assert_eq!(total_pages(1, 10), 1);
    assert_eq!(total_pages(10, 10), 1);
    assert_eq!(total_pages(11, 10), 2);
    assert_eq!(total_pages(95, 10), 10);
}

#[test]
fn test_page_offset_is_zero_based() {
    assert_eq!(page_offset(1, 10), 0);
    assert_eq!(page_offset(2, 10), 10);
    assert_eq!(page_offset(5, 25), 100);
    // A page below 1 clamps to the first page
    assert_eq!(page_offset(0, 10), 0);
    assert_eq!(page_offset(-3, 10), 0);
}

#[test]
fn test_paginated_envelope_shape() {
    let response = PaginatedResponse::new(vec!["a", "b"], 2, 10, 35);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["data"], serde_json::json!(["a", "b"]));
    assert_eq!(json["pagination"]["page"], 2);
    assert_eq!(json["pagination"]["limit"], 10);
    assert_eq!(json["pagination"]["total"], 35);
    assert_eq!(json["pagination"]["totalPages"], 4);
}

#[test]
fn test_api_envelope_shape() {
    let json = serde_json::to_value(ApiResponse::ok(serde_json::json!({"id": 1}))).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["id"], 1);
    assert!(json.get("message").is_none());

    let json =
        serde_json::to_value(ApiResponse::with_message(serde_json::json!(null), "Done")).unwrap();
    assert_eq!(json["message"], "Done");
}
