//! End-to-end route dispatch over HTTP.

use payload_router::templating::Model;
use payload_router::{Payload, PayloadError, RouteCollection};
use serde_json::json;

mod common;

use common::{client, start_server, Site};

fn routes() -> RouteCollection {
    RouteCollection::new()
        .get("/foo/", |_, _| Ok("foo index".into()))
        .post("/bar", |_, _| Ok("bar posted".into()))
        .get("/bar/", |_, _| Ok("bar index".into()))
        .get("/users/:id", |context, params| {
            let verbose = context.get_boolean("verbose").unwrap_or(false);
            Ok(json!({ "id": params[0], "verbose": verbose }).into())
        })
        .post("/items", |context, _| {
            let item: serde_json::Value = context.payload_json()?;
            Ok(Payload::new(item)
                .with_header("X-Created", "1")
                .with_cookie("last", "item")
                .into())
        })
        .get("/hello", |context, _| {
            Ok(Model::of("name", context.get("name").unwrap_or("world")).into())
        })
        .get("/missing-record", |_, _| Err(PayloadError::NotFound("record".into())))
}

fn site() -> Site {
    Site::new().file("hello.html", "<p>Hello [[name]]</p>")
}

#[tokio::test]
async fn test_trailing_slash_redirect() {
    let server = start_server(site(), routes()).await;
    let res = client().get(server.url("/foo")).send().await.unwrap();

    assert_eq!(res.status(), 303);
    assert_eq!(res.headers()["location"], "/foo/");
    assert_eq!(res.headers()["content-length"], "0");
}

#[tokio::test]
async fn test_method_not_allowed_beats_redirect() {
    let server = start_server(site(), routes()).await;
    let res = client().get(server.url("/bar")).send().await.unwrap();
    assert_eq!(res.status(), 405);
}

#[tokio::test]
async fn test_not_found() {
    let server = start_server(site(), routes()).await;
    let res = client().get(server.url("/nothing/here")).send().await.unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_json_with_parameters_and_query() {
    let server = start_server(site(), routes()).await;
    let res = client()
        .get(server.url("/users/42?verbose=true"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json;charset=UTF-8");
    assert!(res.headers().contains_key("x-request-id"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "id": "42", "verbose": true }));
}

#[tokio::test]
async fn test_post_body_headers_and_cookies() {
    let server = start_server(site(), routes()).await;
    let res = client()
        .post(server.url("/items"))
        .json(&json!({ "name": "pen" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-created"], "1");
    assert_eq!(res.headers()["set-cookie"], "last=item; Path=/; Secure");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "name": "pen" }));
}

#[tokio::test]
async fn test_invalid_json_body_is_500() {
    let server = start_server(site(), routes()).await;
    let res = client()
        .post(server.url("/items"))
        .body("{")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
}

#[tokio::test]
async fn test_model_rendered_with_view() {
    let server = start_server(site(), routes()).await;
    let res = client().get(server.url("/hello?name=Ann")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/html;charset=UTF-8");
    assert_eq!(res.text().await.unwrap(), "<p>Hello Ann</p>");
}

#[tokio::test]
async fn test_handler_not_found_error() {
    let server = start_server(site(), routes()).await;
    let res = client().get(server.url("/missing-record")).send().await.unwrap();
    assert_eq!(res.status(), 404);
}
