mod common;

use backend::blob_store::MemoryBlobStore;
use common::*;

use http::StatusCode;
use regex::Regex;

// Happy path tests

#[tokio::test]
async fn test_upload_skips_non_image_files() {
    let setup = TestSetup::new();
    let png = TestFile::new("sunset.png", "image/png", 512 * 1024);
    let expected_body = png.body.clone();
    let text = TestFile::new("notes.txt", "text/plain", 64);

    let response = setup
        .send_upload_request(&[png, text])
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["skipped"], 1);

    let uploaded = body["uploaded"].as_array().unwrap();
    assert_eq!(uploaded.len(), 1);

    let pathname = uploaded[0]["pathname"].as_str().unwrap();
    let pattern = Regex::new(r"^photo_\d+_[0-9a-z]{6}\.png$").unwrap();
    assert!(pattern.is_match(pathname), "unexpected pathname {pathname}");

    let url = uploaded[0]["url"].as_str().unwrap();
    assert!(url.ends_with(pathname));

    let (content_type, stored) = setup.store.object(url).await.unwrap();
    assert_eq!(content_type, "image/png");
    assert_eq!(stored.as_ref(), expected_body.as_slice());
    assert_eq!(setup.store.len().await, 1);
}

#[tokio::test]
async fn test_upload_multiple_images_get_distinct_names() {
    let setup = TestSetup::new();
    let files = [
        TestFile::new("a.jpg", "image/jpeg", 10),
        TestFile::new("b.jpg", "image/jpeg", 10),
        TestFile::new("c.webp", "image/webp", 10),
    ];

    let response = setup.send_upload_request(&files).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["count"], 3);

    let mut pathnames: Vec<_> = body["uploaded"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["pathname"].as_str().unwrap().to_string())
        .collect();
    assert!(pathnames[2].ends_with(".webp"));

    pathnames.sort();
    pathnames.dedup();
    assert_eq!(pathnames.len(), 3);
}

#[tokio::test]
async fn test_upload_defaults_extension_to_jpg() {
    let setup = TestSetup::new();

    let response = setup
        .send_upload_request(&[TestFile::new("camera-roll", "image/heic", 10)])
        .await
        .unwrap();
    let body = parse_response_body(response).await;

    let pathname = body["uploaded"][0]["pathname"].as_str().unwrap();
    assert!(pathname.ends_with(".jpg"), "unexpected pathname {pathname}");
}

#[tokio::test]
async fn test_uploaded_images_appear_in_list() {
    let setup = TestSetup::new();

    let response = setup
        .send_upload_request(&[TestFile::new("a.png", "image/png", 10)])
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    let url = body["uploaded"][0]["url"].as_str().unwrap().to_string();

    let response = setup.send_get_request("/api/list").await.unwrap();
    let body = parse_response_body(response).await;
    let images = body["images"].as_array().unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["url"], url.as_str());
    assert_eq!(images[0]["size"], 10);
}

#[tokio::test]
async fn test_upload_only_non_images_succeeds_with_zero_count() {
    let setup = TestSetup::new();

    let response = setup
        .send_upload_request(&[TestFile::new("doc.pdf", "application/pdf", 10)])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["uploaded"].as_array().unwrap().len(), 0);
    assert!(setup.store.is_empty().await);
}

// Validation error tests

#[tokio::test]
async fn test_upload_without_files_is_rejected() {
    let setup = TestSetup::new();
    let mut note = TestFile::new("note.txt", "text/plain", 4);
    note.field = "note";

    let response = setup.send_upload_request(&[note]).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No files selected");
}

#[tokio::test]
async fn test_upload_rejects_non_multipart_body() {
    let setup = TestSetup::new();
    let request = axum::http::Request::builder()
        .uri("/api/upload")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{}"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(setup.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid multipart payload");
}

// Store failure tests

#[tokio::test]
async fn test_upload_store_failure_is_generic() {
    let setup = TestSetup::with_store(MemoryBlobStore::failing());

    let response = setup
        .send_upload_request(&[TestFile::new("a.png", "image/png", 10)])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Upload failed");
}

#[tokio::test]
async fn test_upload_without_credential_fails_generically() {
    let setup = TestSetup::with_store(MemoryBlobStore::unconfigured());

    let response = setup
        .send_upload_request(&[TestFile::new("a.png", "image/png", 10)])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "Upload failed");
}
