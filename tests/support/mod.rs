//! Mock lending service shared by the integration tests.
//!
//! Mounts the login, loan, metadata and page endpoints a borrow walks
//! through on a `wiremock` server. Individual tests mount extra mocks with a
//! higher priority to inject failures.

#![allow(dead_code)]

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BOOK_ID: &str = "someBook00";
pub const LOAN_TOKEN: &str = "tok-1234";
pub const PAGE_IMAGES_PATH: &str = "/BookReader/BookReaderImages.php";

/// Image bytes served for page `index`.
pub fn page_bytes(index: u32) -> Vec<u8> {
    format!("jpeg-bytes-for-page-{index}").into_bytes()
}

/// Mounts every endpoint for a book with `page_count` pages.
pub async fn mount_lending_service(server: &MockServer, page_count: u32) {
    mount_login(server).await;
    mount_loan(server).await;
    mount_metadata(server, page_count).await;
    mount_pages(server, page_count).await;
}

pub async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/account/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "test-cookie=1; Path=/")
                .set_body_string("<html><form id=\"login\"></form></html>"),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/account/login"))
        .and(body_string_contains("password=wrong"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "bad_login"})),
        )
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/account/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "logged-in-user=reader; Path=/")
                .set_body_json(json!({"status": "ok"})),
        )
        .mount(server)
        .await;
}

pub async fn mount_loan(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/services/loans/loan/searchInside.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/services/loans/loan/"))
        .and(body_string_contains("action=browse_book"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/services/loans/loan/"))
        .and(body_string_contains("action=create_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "token": LOAN_TOKEN})),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/services/loans/loan/"))
        .and(body_string_contains("action=return_loan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(server)
        .await;
}

pub async fn mount_metadata(server: &MockServer, page_count: u32) {
    let details = format!(
        r#"<html><script>BookReaderJSIAinit({{"url":"\/BookReader\/BookReaderJSIA.php?id={BOOK_ID}&itemPath=\/27\/items\/{BOOK_ID}"}});</script></html>"#
    );
    Mock::given(method("GET"))
        .and(path(format!("/details/{BOOK_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(details))
        .mount(server)
        .await;

    let spreads: Vec<serde_json::Value> = (0..page_count)
        .map(|index| {
            json!([{
                "uri": format!("{}{PAGE_IMAGES_PATH}?id={BOOK_ID}&page={index}", server.uri())
            }])
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/BookReader/BookReaderJSIA.php"))
        .and(query_param("id", BOOK_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "brOptions": { "data": spreads },
                "metadata": { "identifier": BOOK_ID }
            }
        })))
        .mount(server)
        .await;
}

pub async fn mount_pages(server: &MockServer, page_count: u32) {
    for index in 0..page_count {
        Mock::given(method("GET"))
            .and(path(PAGE_IMAGES_PATH))
            .and(query_param("page", index.to_string()))
            .and(query_param("rotate", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "image/jpeg")
                    .set_body_bytes(page_bytes(index)),
            )
            .mount(server)
            .await;
    }
}

/// Makes page `index` answer 500 for its next `times` requests.
pub async fn fail_page(server: &MockServer, index: u32, times: u64) {
    Mock::given(method("GET"))
        .and(path(PAGE_IMAGES_PATH))
        .and(query_param("page", index.to_string()))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(times)
        .with_priority(1)
        .mount(server)
        .await;
}

/// Counts received requests whose body contains `needle`.
pub async fn count_requests_with_body(server: &MockServer, needle: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| String::from_utf8_lossy(&request.body).contains(needle))
        .count()
}

/// Counts image requests received for page `index`.
pub async fn count_page_requests(server: &MockServer, index: u32) -> usize {
    let wanted = index.to_string();
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == PAGE_IMAGES_PATH)
        .filter(|request| {
            request
                .url
                .query_pairs()
                .any(|(key, value)| key == "page" && value == wanted.as_str())
        })
        .count()
}
