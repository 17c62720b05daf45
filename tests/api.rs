use axum::body::Body;
use axum::http::{
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    Request, StatusCode,
};
use serde_json::{json, Value};
use starwars_api::password::verify_password;
use starwars_api::{build_app, App, AppState, Argon2Params, EntityStore, MemoryStore};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    app: App,
    store: Arc<MemoryStore>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_body_limit(64 * 1024)
    }

    fn with_body_limit(body_limit_bytes: usize) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone()).with_argon2(Argon2Params::insecure_fast());
        Self {
            app: build_app(state, body_limit_bytes),
            store,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        self.send_raw(builder.body(body).unwrap()).await
    }

    async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    async fn create_user(&self, username: &str, email: &str) -> i64 {
        let (status, body) = self
            .send(
                "POST",
                "/user",
                Some(json!({ "username": username, "email": email, "password": "may the force" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["user"]["id"].as_i64().unwrap()
    }

    async fn create_person(&self, name: &str, homeworld: &str) -> i64 {
        let (status, body) = self
            .send("POST", "/people", Some(json!({ "name": name, "homeworld": homeworld })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["character"]["id"].as_i64().unwrap()
    }

    async fn create_planet(&self, name: &str) -> i64 {
        let (status, body) = self
            .send(
                "POST",
                "/planets",
                Some(json!({ "name": name, "climate": "arid", "terrain": "desert" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["planet"]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn create_user_returns_public_user_and_hashes_password() {
    let t = TestApp::new();
    let (status, body) = t
        .send(
            "POST",
            "/user",
            Some(json!({ "username": "luke", "email": "luke@tatooine.net", "password": "red five" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], "user created");
    assert_eq!(body["user"]["username"], "luke");
    assert_eq!(body["user"]["email"], "luke@tatooine.net");
    assert_eq!(body["user"]["is_active"], true);
    assert!(body["user"].get("password").is_none());

    let id = body["user"]["id"].as_i64().unwrap();
    let stored = t.store.user(id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "red five");
    assert!(verify_password("red five", &stored.password_hash).unwrap());
}

#[tokio::test]
async fn duplicate_username_or_email_is_rejected_without_persisting() {
    let t = TestApp::new();
    t.create_user("han", "han@falcon.io").await;

    let (status, body) = t
        .send(
            "POST",
            "/user",
            Some(json!({ "username": "han", "email": "solo@falcon.io", "password": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "username already exists");

    let (status, body) = t
        .send(
            "POST",
            "/user",
            Some(json!({ "username": "solo", "email": "han@falcon.io", "password": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email already registered");

    let (status, users) = t.send("GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_user_fields_are_named() {
    let t = TestApp::new();
    let (status, body) = t
        .send("POST", "/user", Some(json!({ "username": "", "password": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing required fields: username, email");
    assert!(t.store.users().await.unwrap().is_empty());
}

#[tokio::test]
async fn serialized_users_never_contain_passwords() {
    let t = TestApp::new();
    let id = t.create_user("leia", "leia@alderaan.org").await;

    let (_, list) = t.send("GET", "/users", None).await;
    let (_, one) = t.send("GET", &format!("/users/{id}"), None).await;
    for body in [&list, &one] {
        let text = body.to_string();
        assert!(!text.contains("password"), "{text}");
        assert!(!text.contains("argon2"), "{text}");
    }
    assert_eq!(one["username"], "leia");
}

#[tokio::test]
async fn unknown_ids_return_not_found() {
    let t = TestApp::new();
    for uri in ["/users/99", "/people/99", "/planets/99"] {
        let (status, body) = t.send("GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body["error"].is_string(), "{uri}: {body}");
    }
}

#[tokio::test]
async fn people_and_planets_are_listed_and_read() {
    let t = TestApp::new();
    let yoda = t.create_person("Yoda", "Dagobah").await;
    t.create_person("Lando Calrissian", "Socorro").await;
    let tatooine = t.create_planet("Tatooine").await;

    let (status, people) = t.send("GET", "/people", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(people.as_array().unwrap().len(), 2);

    let (status, person) = t.send("GET", &format!("/people/{yoda}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(person, json!({ "id": yoda, "name": "Yoda", "homeworld": "Dagobah" }));

    let (status, planet) = t.send("GET", &format!("/planets/{tatooine}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(planet["climate"], "arid");
    assert_eq!(planet["terrain"], "desert");
}

#[tokio::test]
async fn duplicate_planet_name_is_rejected() {
    let t = TestApp::new();
    t.create_planet("Hoth").await;
    let (status, body) = t
        .send(
            "POST",
            "/planets",
            Some(json!({ "name": "Hoth", "climate": "frozen", "terrain": "tundra" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "a planet named 'Hoth' already exists");
    assert_eq!(t.store.planets().await.unwrap().len(), 1);
}

#[tokio::test]
async fn favorite_for_unknown_user_or_target_is_not_found_and_not_persisted() {
    let t = TestApp::new();
    let user = t.create_user("rey", "rey@jakku.net").await;
    let planet = t.create_planet("Jakku").await;

    let (status, body) = t
        .send("POST", &format!("/favorite/planet/{planet}"), Some(json!({ "user_id": 999 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user 999 not found");

    let (status, body) = t
        .send("POST", "/favorite/people/42", Some(json!({ "user_id": user })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "character 42 not found");

    let (status, _) = t
        .send("POST", "/favorite/planet/42", Some(json!({ "user_id": user })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(t.store.favorites_for_user(user).await.unwrap().is_empty());
    assert!(t.store.favorites_for_user(999).await.unwrap().is_empty());
}

#[tokio::test]
async fn favorite_requires_user_id() {
    let t = TestApp::new();
    let planet = t.create_planet("Dantooine").await;
    for body in [json!({}), json!({ "user_id": null }), json!({ "user_id": 0 })] {
        let (status, resp) = t
            .send("POST", &format!("/favorite/planet/{planet}"), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["error"], "missing required fields: user_id");
    }
}

#[tokio::test]
async fn character_favorite_round_trip() {
    let t = TestApp::new();
    let user = t.create_user("finn", "fn2187@order.mil").await;
    let poe = t.create_person("Poe Dameron", "Yavin 4").await;

    let (status, body) = t
        .send("POST", &format!("/favorite/people/{poe}"), Some(json!({ "user_id": user })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], "character added to favorites");
    assert_eq!(body["favorite"]["user_id"], user);
    assert_eq!(body["favorite"]["character"]["name"], "Poe Dameron");
    assert!(body["favorite"]["planet"].is_null());

    let (status, favorites) = t.send("GET", &format!("/favorites/{user}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let favorites = favorites.as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["character"]["id"], poe);

    let (status, body) = t
        .send("DELETE", &format!("/favorite/people/{poe}"), Some(json!({ "user_id": user })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], format!("favorite with ID {poe} has been removed"));

    let (status, body) = t
        .send("DELETE", &format!("/favorite/people/{poe}"), Some(json!({ "user_id": user })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "favorite not found");

    let (status, _) = t.send("GET", &format!("/favorites/{user}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn planet_favorite_sets_only_planet_key() {
    let t = TestApp::new();
    let user = t.create_user("lando", "lando@cloud.city").await;
    let bespin = t.create_planet("Bespin").await;

    let (status, body) = t
        .send("POST", &format!("/favorite/planet/{bespin}"), Some(json!({ "user_id": user })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["favorite"]["planet"]["name"], "Bespin");
    assert!(body["favorite"]["character"].is_null());

    let stored = t.store.favorites_for_user(user).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].favorite.planet_id, Some(bespin));
    assert_eq!(stored[0].favorite.people_id, None);

    let (status, _) = t
        .send("DELETE", &format!("/favorite/planet/{bespin}"), Some(json!({ "user_id": user })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(t.store.favorites_for_user(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn favorites_of_unknown_user_is_not_found() {
    let t = TestApp::new();
    let (status, body) = t.send("GET", "/favorites/12", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user 12 not found");
}

#[tokio::test]
async fn malformed_requests_use_error_envelope() {
    let t = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/user")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = t.send_raw(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid JSON body"));

    let (status, body) = t.send("GET", "/users/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("abc"));

    let (status, body) = t.send("DELETE", "/favorite/planet/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = t.send("GET", "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "route not found");
}

#[tokio::test]
async fn oversized_body_is_rejected_with_error_envelope() {
    let t = TestApp::with_body_limit(64);
    let payload = json!({
        "username": "a".repeat(20),
        "email": format!("{}@coruscant.gov", "b".repeat(60)),
        "password": "c".repeat(100),
    })
    .to_string();
    assert!(payload.len() > 64);

    let request = Request::builder()
        .method("POST")
        .uri("/user")
        .header(CONTENT_TYPE, "application/json")
        .header(CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let (status, body) = t.send_raw(request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "error": "request body too large" }));
    assert!(t.store.users().await.unwrap().is_empty());

    // Small bodies still pass under the same limit.
    let (status, _) = t
        .send("POST", "/planets", Some(json!({ "name": "Kef Bir", "climate": "wet", "terrain": "sea" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn wrong_method_is_rejected_with_error_envelope() {
    let t = TestApp::new();
    for (method, uri) in [("PUT", "/users"), ("DELETE", "/people/1"), ("PATCH", "/favorite/planet/1")] {
        let (status, body) = t.send(method, uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        assert_eq!(body, json!({ "error": "method not allowed" }), "{method} {uri}");
    }
}

#[tokio::test]
async fn overlong_fields_are_rejected_without_persisting() {
    let t = TestApp::new();
    let (status, body) = t
        .send(
            "POST",
            "/user",
            Some(json!({ "username": "x".repeat(26), "email": "long@name.io", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "username must be at most 25 characters");
    assert!(t.store.users().await.unwrap().is_empty());

    // Exactly at the column width is accepted.
    t.create_user(&"y".repeat(25), "edge@name.io").await;

    let (status, body) = t
        .send("POST", "/people", Some(json!({ "name": "Jar Jar", "homeworld": "n".repeat(81) })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "homeworld must be at most 80 characters");
    assert!(t.store.people().await.unwrap().is_empty());
}

#[tokio::test]
async fn trailing_slash_is_ignored() {
    let t = TestApp::new();
    t.create_person("Chewbacca", "Kashyyyk").await;
    let (status, people) = t.send("GET", "/people/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(people.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn operational_routes() {
    let t = TestApp::new();

    let (status, body) = t.send("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = t.send("GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let (status, body) = t.send("GET", "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "starwars-api");

    let (status, body) = t.send("GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let routes = body["routes"].as_array().unwrap();
    assert!(routes.contains(&json!({ "method": "DELETE", "path": "/favorite/planet/{id}" })));
    assert!(routes.contains(&json!({ "method": "POST", "path": "/user" })));
}
