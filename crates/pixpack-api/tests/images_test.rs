//! Image API integration tests.
//!
//! Run with: `cargo test -p pixpack-api --test images_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use helpers::archive::{entry_names, read_entries};
use helpers::fixtures::{
    create_corrupt_png, create_test_gif, create_test_jpeg, create_test_png, dimensions, file_part,
};
use helpers::{setup_test_app, setup_test_app_with, test_config};
use pixpack_core::constants::MAX_DIMENSION;
use pixpack_core::Config;
use serde_json::Value;

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "alive");
}

#[tokio::test]
async fn test_convert_single_png() {
    let app = setup_test_app();
    let form = MultipartForm::new().add_part("files[]", file_part("cat.png", create_test_png(16, 12)));

    let response = app.client().post("/png-to-jpeg").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.header("content-type"), "application/zip");

    let entries = read_entries(response.as_bytes());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "cat.jpeg");
    assert_eq!(
        image::guess_format(&entries[0].1).unwrap(),
        image::ImageFormat::Jpeg
    );
    assert_eq!(dimensions(&entries[0].1), (16, 12));
}

#[tokio::test]
async fn test_convert_empty_files() {
    let app = setup_test_app();
    let form = MultipartForm::new().add_text("note", "no files here");

    let response = app.client().post("/png-to-jpeg").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "files[] cannot be empty");
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_convert_rejects_jpeg_named_png() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("files[]", file_part("a.png", create_test_png(4, 4)))
        .add_part("files[]", file_part("sneaky.png", create_test_jpeg(4, 4)));

    let response = app.client().post("/png-to-jpeg").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "UNSUPPORTED_CONTENT_TYPE");
    assert_eq!(
        body["error"],
        "file type image/jpeg not allowed, only allow [image/png]"
    );
    assert_eq!(app.codec_calls(), 0);
}

#[tokio::test]
async fn test_resize_length_mismatch() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("files[]", file_part("a.png", create_test_png(8, 8)))
        .add_part("files[]", file_part("b.png", create_test_png(8, 8)))
        .add_text("height[]", 4)
        .add_text("width[]", 4)
        .add_text("width[]", 4);

    let response = app.client().post("/resize").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(
        body["error"],
        "height[] must have 2 values (one per file), got 1"
    );
    assert_eq!(app.codec_calls(), 0);
}

#[tokio::test]
async fn test_resize_batch_per_item_dimensions() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("files[]", file_part("a.png", create_test_png(40, 40)))
        .add_part("files[]", file_part("b.jpg", create_test_jpeg(40, 40)))
        .add_text("height[]", 10)
        .add_text("height[]", 20)
        .add_text("width[]", 30)
        .add_text("width[]", 5);

    let response = app.client().post("/resize").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let entries = read_entries(response.as_bytes());
    assert_eq!(entries[0].0, "a.png");
    assert_eq!(entries[1].0, "b.jpg");
    assert_eq!(
        image::guess_format(&entries[0].1).unwrap(),
        image::ImageFormat::Png
    );
    assert_eq!(dimensions(&entries[0].1), (30, 10));
    assert_eq!(dimensions(&entries[1].1), (5, 20));
}

#[tokio::test]
async fn test_resize_batch_rejects_zero_dimension() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("files[]", file_part("a.png", create_test_png(8, 8)))
        .add_text("height[]", 0)
        .add_text("width[]", 4);

    let response = app.client().post("/resize").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.codec_calls(), 0);
}

#[tokio::test]
async fn test_resize_batch_rejects_oversized_dimension() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("files[]", file_part("a.png", create_test_png(1, 1)))
        .add_text("height[]", 4_000_000_000u64)
        .add_text("width[]", 4_000_000_000u64);

    let response = app.client().post("/resize").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"],
        format!("height[] value 4000000000 exceeds the maximum of {}", MAX_DIMENSION)
    );
    assert_eq!(app.codec_calls(), 0);
}

#[tokio::test]
async fn test_process_rejects_jpeg() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("files[]", file_part("a.png", create_test_jpeg(8, 8)))
        .add_text("height[]", 4)
        .add_text("width[]", 4);

    let response = app.client().post("/process").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "UNSUPPORTED_CONTENT_TYPE");
    assert_eq!(app.codec_calls(), 0);
}

#[tokio::test]
async fn test_compress_rejects_gif() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("files[]", file_part("a.png", create_test_png(4, 4)))
        .add_part("files[]", file_part("anim.gif", create_test_gif()));

    let response = app.client().post("/compress").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "UNSUPPORTED_CONTENT_TYPE");
    assert_eq!(
        body["error"],
        "file type image/gif not allowed, only allow [image/png, image/jpeg]"
    );
    assert_eq!(app.codec_calls(), 0);
}

#[tokio::test]
async fn test_process_resizes_and_converts() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("files[]", file_part("a.png", create_test_png(20, 20)))
        .add_text("height[]", 6)
        .add_text("width[]", 9);

    let response = app.client().post("/process").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let entries = read_entries(response.as_bytes());
    assert_eq!(entries[0].0, "a.png");
    assert_eq!(
        image::guess_format(&entries[0].1).unwrap(),
        image::ImageFormat::Jpeg
    );
    assert_eq!(dimensions(&entries[0].1), (9, 6));
}

#[tokio::test]
async fn test_compress_twice() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("files[]", file_part("a.png", create_test_png(24, 24)))
        .add_part("files[]", file_part("b.jpg", create_test_jpeg(24, 24)));

    let first = app.client().post("/compress").multipart(form).await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let mut form = MultipartForm::new();
    for (name, data) in read_entries(first.as_bytes()) {
        form = form.add_part("files[]", file_part(&name, data));
    }
    let second = app.client().post("/compress").multipart(form).await;

    assert_eq!(second.status_code(), StatusCode::CREATED);
    assert_eq!(entry_names(second.as_bytes()), ["a.png", "b.jpg"]);
}

#[tokio::test]
async fn test_archive_disambiguates_names() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("files[]", file_part("../x.png", create_test_png(4, 4)))
        .add_part("files[]", file_part("x.png", create_test_png(4, 4)));

    let response = app.client().post("/compress").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(entry_names(response.as_bytes()), ["x.png", "x (1).png"]);
}

#[tokio::test]
async fn test_corrupt_image_is_client_error() {
    let app = setup_test_app();
    let form = MultipartForm::new().add_part("files[]", file_part("bad.png", create_corrupt_png()));

    let response = app.client().post("/png-to-jpeg").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "IMAGE_PROCESSING_ERROR");
}

#[tokio::test]
async fn test_single_resize() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", file_part("photo.png", create_test_png(40, 30)))
        .add_text("resizeHeight", 10)
        .add_text("resizeWidth", 20);

    let response = app.client().post("/").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.header("content-type"), "image/jpeg");
    assert_eq!(dimensions(response.as_bytes()), (20, 10));
}

#[tokio::test]
async fn test_single_passthrough_keeps_dimensions() {
    let app = setup_test_app();
    let png = create_test_png(33, 17);
    let form = MultipartForm::new()
        .add_part("file", file_part("photo.png", png.clone()))
        .add_text("resizeHeight", 0)
        .add_text("resizeWidth", 0);

    let response = app.client().post("/").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(dimensions(response.as_bytes()), (33, 17));
    assert_eq!(response.as_bytes().as_ref(), png.as_slice());
    assert_eq!(app.codec_calls(), 0);
}

#[tokio::test]
async fn test_single_one_sided_resize() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", file_part("photo.png", create_test_png(8, 8)))
        .add_text("resizeHeight", 0)
        .add_text("resizeWidth", 10);

    let response = app.client().post("/").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.codec_calls(), 0);
}

#[tokio::test]
async fn test_single_rejects_oversized_dimension() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", file_part("photo.png", create_test_png(1, 1)))
        .add_text("resizeHeight", MAX_DIMENSION + 1)
        .add_text("resizeWidth", 10);

    let response = app.client().post("/").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
    assert_eq!(app.codec_calls(), 0);
}

#[tokio::test]
async fn test_single_requires_file() {
    let app = setup_test_app();
    let form = MultipartForm::new().add_text("resizeHeight", 10);

    let response = app.client().post("/").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "file is required");
}

#[tokio::test]
async fn test_single_rejects_non_integer_dimension() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", file_part("photo.png", create_test_png(8, 8)))
        .add_text("resizeHeight", "ten");

    let response = app.client().post("/").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_single_rejects_jpeg() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", file_part("photo.png", create_test_jpeg(8, 8)))
        .add_text("resizeHeight", 4)
        .add_text("resizeWidth", 4);

    let response = app.client().post("/").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "UNSUPPORTED_CONTENT_TYPE");
}

#[tokio::test]
async fn test_body_over_limit() {
    let app = setup_test_app_with(Config {
        max_body_size_bytes: 1024,
        ..test_config()
    });
    let mut payload = create_test_png(4, 4);
    payload.resize(8 * 1024, 0);
    let form = MultipartForm::new().add_part("files[]", file_part("big.png", payload));

    let response = app.client().post("/compress").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.codec_calls(), 0);
}

#[tokio::test]
async fn test_non_multipart_body() {
    let app = setup_test_app();

    let response = app.client().post("/compress").text("hello").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "BAD_REQUEST");
}
