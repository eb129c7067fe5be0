//! End-to-end behaviour of the assembled application.
//!
//! Drives `build_app` through `actix_web::test` with fixture ports so no
//! external service is needed.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::body::to_bytes;
use actix_web::{App, HttpResponse, test, web};
use minimus::domain::AppError;
use minimus::domain::ports::FixtureCacheHealth;
use minimus::inbound::http::ApiResult;
use minimus::inbound::http::state::HttpState;
use minimus::server::build_app;
use rstest::rstest;
use serde_json::{Value, json};

async fn raise_bad_request() -> ApiResult<HttpResponse> {
    Err(AppError::bad_request("x").into())
}

async fn divide(path: web::Path<i32>) -> HttpResponse {
    let divisor = std::hint::black_box(path.into_inner());
    HttpResponse::Ok().body((10 / divisor).to_string())
}

async fn echo(body: web::Json<Value>) -> HttpResponse {
    HttpResponse::Ok().json(body.into_inner())
}

fn app_with_fixtures(
    alive: bool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = web::Data::new(HttpState::new(Arc::new(FixtureCacheHealth::new(alive))));
    build_app(state)
        .route("/raise", web::get().to(raise_bad_request))
        .route("/divide/{by}", web::get().to(divide))
        .route("/echo", web::post().to(echo))
}

async fn call(alive: bool, req: test::TestRequest) -> ServiceResponse<impl actix_web::body::MessageBody> {
    let app = test::init_service(app_with_fixtures(alive)).await;
    test::call_service(&app, req.to_request()).await
}

async fn expect_envelope(res: ServiceResponse<impl actix_web::body::MessageBody>, status: StatusCode) -> Value {
    assert_eq!(res.status(), status);
    assert!(res.headers().contains_key("trace-id"), "trace-id header missing");
    test::read_body_json(res).await
}

#[rstest]
#[case(true, StatusCode::OK, json!({ "code": 200, "message": "success", "data": { "status": "ok" } }))]
#[case(false, StatusCode::INTERNAL_SERVER_ERROR, json!({ "code": 500, "message": "Redis is not alive", "data": {} }))]
#[actix_web::test]
async fn healthz_follows_the_cache(
    #[case] alive: bool,
    #[case] status: StatusCode,
    #[case] expected: Value,
) {
    let res = call(alive, test::TestRequest::get().uri("/api/status/healthz")).await;

    assert_eq!(expect_envelope(res, status).await, expected);
}

#[rstest]
#[actix_web::test]
async fn root_greets() {
    let res = call(true, test::TestRequest::get().uri("/")).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "message": "Hello, World!" }));
}

#[rstest]
#[actix_web::test]
async fn typed_errors_keep_their_message() {
    let res = call(true, test::TestRequest::get().uri("/raise")).await;

    let body = expect_envelope(res, StatusCode::BAD_REQUEST).await;
    assert_eq!(body, json!({ "code": 400, "message": "x", "data": {} }));
}

#[rstest]
#[actix_web::test]
async fn panics_become_generic_500s() {
    let app = test::init_service(app_with_fixtures(true)).await;

    let err = test::try_call_service(
        &app,
        test::TestRequest::get().uri("/divide/0").to_request(),
    )
    .await
    .map(|_| ())
    .expect_err("panic is surfaced to actix as an error");

    let response = err.error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body()).await.expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("envelope JSON");
    assert_eq!(
        body,
        json!({ "code": 500, "message": "Internal Server Error", "data": {} })
    );
    assert!(!body.to_string().contains("divide"));
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_validation_error() {
    let req = test::TestRequest::post()
        .uri("/echo")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\":");

    let body = expect_envelope(call(true, req).await, StatusCode::BAD_REQUEST).await;

    assert_eq!(body["code"], 400);
    assert_eq!(body["data"], json!({}));
    let message = body["message"].as_str().expect("message is a string");
    let fields: Value = serde_json::from_str(message).expect("message holds the field list");
    assert_eq!(fields[0]["loc"], json!(["body"]));
    assert_eq!(fields[0]["type"], "json_invalid");
}

#[rstest]
#[actix_web::test]
async fn bad_path_segment_is_a_validation_error() {
    let res = call(true, test::TestRequest::get().uri("/divide/abc")).await;

    let body = expect_envelope(res, StatusCode::BAD_REQUEST).await;
    let fields: Value =
        serde_json::from_str(body["message"].as_str().expect("string")).expect("field list");
    assert_eq!(fields[0]["type"], "path_invalid");
}

#[rstest]
#[case("/nowhere")]
#[case("/api/status/missing")]
#[actix_web::test]
async fn unknown_routes_are_404_envelopes(#[case] uri: &str) {
    let res = call(true, test::TestRequest::get().uri(uri)).await;

    let body = expect_envelope(res, StatusCode::NOT_FOUND).await;
    assert_eq!(body, json!({ "code": 404, "message": "Not Found", "data": {} }));
}

#[rstest]
#[case(test::TestRequest::post().uri("/api/status/healthz"))]
#[case(test::TestRequest::delete().uri("/"))]
#[actix_web::test]
async fn wrong_method_is_405_envelope(#[case] req: test::TestRequest) {
    let res = call(true, req).await;

    let body = expect_envelope(res, StatusCode::METHOD_NOT_ALLOWED).await;
    assert_eq!(
        body,
        json!({ "code": 405, "message": "Method Not Allowed", "data": {} })
    );
}

#[rstest]
#[actix_web::test]
async fn cors_allows_any_origin() {
    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("origin", "https://example.org"));

    let res = call(true, req).await;

    assert!(
        res.headers()
            .contains_key("access-control-allow-origin"),
        "CORS header missing"
    );
}
