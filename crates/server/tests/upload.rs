use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use recon_core::MatchCountMode;
use recon_server::config::ServerConfig;
use recon_server::startup::build_router;
use serde_json::Value;
use tower::util::ServiceExt;

const BOUNDARY: &str = "recon-test-boundary";

const HEADER: &str = "TransactionID,TransactionType,TransactionDescription,TransactionNarrative,TransactionAmount,TransactionDate,ProfileName,WalletReference\n";

fn csv(rows: &[&str]) -> String {
    let mut out = HEADER.to_string();
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// `(field, file name, content)` triples encoded as multipart/form-data.
fn multipart_body(parts: &[(&str, &str, &str)]) -> String {
    let mut body = String::new();
    for (field, file_name, content) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        ));
        body.push_str("Content-Type: text/csv\r\n\r\n");
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn upload_request(parts: &[(&str, &str, &str)]) -> Request<Body> {
    let body = multipart_body(parts);
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

fn app() -> Router {
    build_router(&ServerConfig::default())
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_batches() -> (String, String) {
    let first = csv(&[
        "T1,DEBIT,X,N,100,2024-01-01 10:00:00,P,W",
        "T2,DEBIT,X,N,50,2024-01-01 11:00:00,P,W",
        "T3,DEBIT,X,N,70,2024-01-02 09:00:00,P,W",
        "T3,DEBIT,X,N,80,2024-01-02 09:00:00,P,W",
    ]);
    let second = csv(&[
        "T3,DEBIT,X,N,90,2024-01-02 09:00:00,P,W",
        "T1,DEBIT,X,N,100,2024-01-01 10:00:00,P,W",
        "T3,DEBIT,X,N,70,2024-01-02 09:00:00,P,W",
        "T5,DEBIT,X,N,10,2024-01-03 09:00:00,P,W",
    ]);
    (first, second)
}

#[tokio::test]
async fn health_returns_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn upload_returns_report() {
    let (first, second) = sample_batches();
    let response = app()
        .oneshot(upload_request(&[
            ("file1", "bank.csv", &first),
            ("file2", "ledger.csv", &second),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report = json_body(response).await;
    assert_eq!(report["firstFileName"], "bank.csv");
    assert_eq!(report["secondFileName"], "ledger.csv");
    assert_eq!(report["firstFileTotalRecordCount"], 4);
    assert_eq!(report["secondFileTotalRecordCount"], 4);
    assert_eq!(report["matchedRecordCount"], 2);
    assert_eq!(report["firstFileUnmatchedRecordCount"], 2);
    assert_eq!(report["secondFileUnmatchedRecordCount"], 2);

    let first_unmatched = report["firstFileUnmatchedRecordList"].as_array().unwrap();
    assert_eq!(first_unmatched[0]["transactionId"], "T2");
    assert_eq!(first_unmatched[1]["transactionId"], "T3");
    assert_eq!(first_unmatched[1]["amount"], 80);
    assert_eq!(first_unmatched[1]["sourceLabel"], "bank.csv");

    let second_unmatched = report["secondFileUnmatchedRecordList"].as_array().unwrap();
    assert_eq!(second_unmatched[0]["amount"], 90);
    assert_eq!(second_unmatched[1]["transactionId"], "T5");
    assert!(report.get("firstFileMatchedRecordCount").is_none());
}

#[tokio::test]
async fn per_batch_mode_adds_counts() {
    let config = ServerConfig {
        count_mode: MatchCountMode::PerBatch,
        ..ServerConfig::default()
    };
    let (first, second) = sample_batches();
    let response = build_router(&config)
        .oneshot(upload_request(&[
            ("file1", "bank.csv", &first),
            ("file2", "ledger.csv", &second),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report = json_body(response).await;
    assert_eq!(report["matchedRecordCount"], 2);
    assert_eq!(report["firstFileMatchedRecordCount"], 2);
    assert_eq!(report["secondFileMatchedRecordCount"], 2);
}

#[tokio::test]
async fn invalid_suffix_is_bad_request() {
    let (first, second) = sample_batches();
    let response = app()
        .oneshot(upload_request(&[
            ("file1", "bank.txt", &first),
            ("file2", "ledger.csv", &second),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["status"], 400);
    assert_eq!(
        body["message"],
        "Invalid file format. Please provide two CSV files."
    );
}

#[tokio::test]
async fn empty_file_is_bad_request() {
    let (first, _) = sample_batches();
    let response = app()
        .oneshot(upload_request(&[
            ("file1", "bank.csv", &first),
            ("file2", "ledger.csv", ""),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"],
        "Please provide two file content"
    );
}

#[tokio::test]
async fn malformed_row_is_bad_request() {
    let first = csv(&[
        "T1,DEBIT,X,N,100,2024-01-01 10:00:00,P,W",
        "T2,DEBIT,X,N,-20000;*MOLEPS,2024-01-01 10:00:00,P,W",
    ]);
    let (_, second) = sample_batches();
    let response = app()
        .oneshot(upload_request(&[
            ("file1", "bank.csv", &first),
            ("file2", "ledger.csv", &second),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let message = json_body(response).await["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(
        message.starts_with("Parsing file exception. File name: bank.csv, record number: 2."),
        "message was {message}"
    );
}

#[tokio::test]
async fn missing_part_is_bad_request() {
    let (first, _) = sample_batches();
    let response = app()
        .oneshot(upload_request(&[("file1", "bank.csv", &first)]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"],
        "Missing multipart field: file2"
    );
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let config = ServerConfig {
        max_upload_bytes: 64,
        ..ServerConfig::default()
    };
    let (first, second) = sample_batches();
    let response = build_router(&config)
        .oneshot(upload_request(&[
            ("file1", "bank.csv", &first),
            ("file2", "ledger.csv", &second),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn oversized_upload_without_length_header_is_rejected() {
    let config = ServerConfig {
        max_upload_bytes: 64,
        ..ServerConfig::default()
    };
    let (first, second) = sample_batches();
    let mut request = upload_request(&[
        ("file1", "bank.csv", &first),
        ("file2", "ledger.csv", &second),
    ]);
    request.headers_mut().remove(header::CONTENT_LENGTH);

    let response = build_router(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_preflight_mirrors_origin() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/v1/upload")
                .header(header::ORIGIN, "http://reconcile.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://reconcile.example"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");
}
