mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, Utc};
use common::{TestServer, test_config};
use flyspray::auth::TokenIssuer;
use flyspray::config::JwtConfig;
use flyspray::store::Store;
use flyspray::types::{BugFilter, CommentFilter, ComponentFilter};
use serde_json::{Value, json};

fn assert_failure(body: &Value) {
    assert_eq!(body["success"], json!(false), "unexpected body: {body}");
    assert!(body["error"].is_string(), "missing error: {body}");
}

async fn create_project(server: &TestServer, name: &str, token: Option<&str>) -> i64 {
    let (status, body) = server
        .send(
            Method::POST,
            "/project",
            Some(json!({ "name": name }).to_string()),
            token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().expect("project id")
}

async fn signup(server: &TestServer, email: &str) -> (StatusCode, Value) {
    server
        .post(
            "/user/signup",
            json!({ "name": "alice", "email": email, "password": "hunter2" }),
        )
        .await
}

/// Registers, verifies and signs in `email`, returning the user id and
/// an access token.
async fn sign_in(server: &TestServer, email: &str) -> (String, String) {
    let (status, body) = signup(server, email).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["data"]["id"].as_str().expect("user id").to_string();

    let code = server.code_for(email).expect("verification code");
    let (status, _) = server
        .post("/user/signup/verify", json!({ "verification_code": code }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server
        .post(
            "/user/signin",
            json!({ "email": email, "password": "hunter2" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["data"]["access_token"].as_str().expect("token");
    (id, token.to_string())
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start();
    let (status, body) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn test_project_lifecycle() {
    let server = TestServer::start();

    let (status, body) = server
        .post("/project", json!({ "name": "Project A", "owner_id": "12" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "project is created successfully");
    assert_eq!(body["data"]["name"], "Project A");
    // Anonymous projects have no owner, whatever the body claims.
    assert_eq!(body["data"]["owner_id"], "");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = server.get(&format!("/project/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);

    let (status, body) = server
        .put(&format!("/project/{id}"), json!({ "name": "Project B" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Project B");

    let (status, body) = server.delete(&format!("/project/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "project is deleted successfully" }));

    let (status, body) = server.get(&format!("/project/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body);

    let (status, _) = server.delete(&format!("/project/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_project_validation() {
    let server = TestServer::start();

    let (status, body) = server.post("/project", json!({ "name": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body);

    let (status, body) = server
        .send(Method::POST, "/project", Some("not json".to_string()), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body);

    create_project(&server, "Tracker", None).await;
    let (status, body) = server.post("/project", json!({ "name": "Tracker" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "project name must be unique");

    let other = create_project(&server, "Other", None).await;
    let (status, _) = server
        .put(&format!("/project/{other}"), json!({ "name": "Tracker" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .put(&format!("/project/{other}"), json!({ "name": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.get("/project/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .put("/project/9999", json!({ "name": "Ghost" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_project_filters() {
    let server = TestServer::start();
    let (alice, alice_token) = sign_in(&server, "alice@example.com").await;
    let (_, bob_token) = sign_in(&server, "bob@example.com").await;
    create_project(&server, "Alpha", Some(&alice_token)).await;
    create_project(&server, "Beta", Some(&alice_token)).await;
    create_project(&server, "Gamma", Some(&bob_token)).await;

    let (status, body) = server
        .get(&format!("/project/filters?userid={alice}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["owner_id"], alice.as_str());

    let (status, body) = server
        .get(&format!("/project/filters?userid={alice}&name=Beta"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Beta");

    let (status, body) = server.get("/project/filters?after=2000-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, body) = server.get("/project/filters?userid=404").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, _) = server.get("/project/filters?after=someday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_component_flow() {
    let server = TestServer::start();
    let project_id = create_project(&server, "Widgets", None).await;

    let (status, _) = server
        .post("/component", json!({ "project_id": project_id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.post("/component", json!({ "name": "ui" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = server
        .state
        .store
        .filter_components(&ComponentFilter::default())
        .unwrap();
    assert!(stored.is_empty(), "rejected creates left rows: {stored:?}");

    let (status, body) = server
        .post("/component", json!({ "project_id": project_id, "name": "ui" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = server
        .get(&format!("/component/filters?project_id={project_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "ui");

    let (status, _) = server.get("/component/filters?project_id=9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.get("/component/filters").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.get("/component/filters?project_id=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .put(&format!("/component/{id}"), json!({ "name": "backend" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "backend");
    assert_eq!(body["data"]["project_id"], project_id);

    let (status, body) = server
        .put("/component/9999", json!({ "name": "ghost" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body);

    let (status, _) = server.delete(&format!("/component/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get(&format!("/component/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = server.delete(&format!("/component/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body);
}

#[tokio::test]
async fn test_bug_flow() {
    let server = TestServer::start();

    let (status, body) = server
        .post(
            "/bugs",
            json!({
                "user_id": "12",
                "component_id": 13,
                "category": "ui",
                "severity": "high",
                "summary": "button does nothing",
                "status": "new"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], "12");
    assert_eq!(body["data"]["opened"], true);
    assert_eq!(body["data"]["votes"], 0);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = server.get(&format!("/bugs/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["component_id"], 13);

    let (status, body) = server.get("/bugs/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body);

    let (status, _) = server.post("/bugs", json!({ "user_id": 12 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let stored = server.state.store.filter_bugs(&BugFilter::default()).unwrap();
    assert_eq!(stored.len(), 1);

    let (status, body) = server
        .put("/bugs/9999", json!({ "status": "fixed" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body);

    let (status, body) = server
        .put(
            &format!("/bugs/{id}"),
            json!({ "status": "fixed", "votes": 3, "opened": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "fixed");
    assert_eq!(body["data"]["votes"], 3);
    assert_eq!(body["data"]["opened"], false);
    assert_eq!(body["data"]["summary"], "button does nothing");

    let (status, _) = server
        .put(&format!("/bugs/{id}"), json!({ "votes": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server.get("/bugs/filters?status=fixed&user_id=12").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = server.get("/bugs/filters?status=new").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, _) = server.get("/bugs/filters?component_id=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.delete(&format!("/bugs/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.delete(&format!("/bugs/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_flow() {
    let server = TestServer::start();

    let (status, _) = server
        .post("/comment", json!({ "user_id": "5", "bug_id": 1, "summary": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let stored = server
        .state
        .store
        .filter_comments(&CommentFilter::default())
        .unwrap();
    assert!(stored.is_empty(), "rejected create left rows: {stored:?}");

    let (status, body) = server
        .post(
            "/comment",
            json!({ "user_id": 5, "bug_id": 1, "summary": "reproduced" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["owner_id"], "5");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = server.get("/comment/filters?bug_id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = server.get("/comment/filters?bug_id=1&user_id=6").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .put(&format!("/comment/{id}"), json!({ "summary": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .put(&format!("/comment/{id}"), json!({ "summary": "fixed upstream" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"], "fixed upstream");

    let (status, _) = server
        .put("/comment/9999", json!({ "summary": "nobody home" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.delete(&format!("/comment/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get(&format!("/comment/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = server.delete("/comment/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body);
}

#[tokio::test]
async fn test_member_flow() {
    let server = TestServer::start();
    let member = json!({ "user_id": "u-1", "project_id": 3, "admin_bool": true });

    let (status, body) = server.post("/member", member.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["admin"], true);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = server.post("/member", member).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_failure(&body);

    let (status, _) = server.post("/member", json!({ "user_id": "u-1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(server.state.store.list_members().unwrap().len(), 1);

    for uri in ["/members", "/member"] {
        let (status, body) = server.get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    let (status, _) = server.put(&format!("/member/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .put(&format!("/member/{id}"), json!({ "admin": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["admin"], false);

    let (status, body) = server
        .put("/member/9999", json!({ "admin": true }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body);

    let (status, _) = server.delete(&format!("/member/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get(&format!("/member/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = server.delete(&format!("/member/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body);
}

#[tokio::test]
async fn test_signup_validation() {
    let server = TestServer::start();

    let (status, body) = signup(&server, "alice@example.com").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["verified"], false);
    assert!(body["data"].get("password").is_none());
    assert!(server.code_for("alice@example.com").is_some());

    let (status, body) = signup(&server, "alice@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_failure(&body);

    let (status, _) = signup(&server, "not-an-email").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post("/user/signup", json!({ "email": "bob@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_account_flow() {
    let server = TestServer::start();
    signup(&server, "alice@example.com").await;
    let code = server.code_for("alice@example.com").unwrap();

    let credentials = json!({ "email": "alice@example.com", "password": "hunter2" });

    let (status, _) = server.post("/user/signin", credentials.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server
        .post("/user/signup/verify", json!({ "verification_code": 1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "wrong verification code");

    let (status, _) = server
        .post(
            "/user/signup/verify",
            json!({ "verification_code": code.to_string() }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server
        .post("/user/signup/verify", json!({ "verification_code": code }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .post(
            "/user/signin",
            json!({ "email": "alice@example.com", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "invalid email or password");

    let (status, _) = server
        .post(
            "/user/signin",
            json!({ "email": "nobody@example.com", "password": "hunter2" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server.post("/user/signin", credentials).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["verified"], true);
    let access = body["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = server.send(Method::GET, "/user", None, Some(&access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "alice@example.com");

    let (status, _) = server.get("/user").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = server
        .send(Method::GET, "/user", None, Some("garbage"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = server
        .post("/user/refresh_token", json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["access_token"].is_string());

    let (status, _) = server
        .post("/user/refresh_token", json!({ "refresh_token": access }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = server
        .post("/user/refresh_token", json!({ "refresh_token": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .send(
            Method::PUT,
            "/user",
            Some(json!({ "name": "alice b" }).to_string()),
            Some(&access),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "alice b");
    assert_eq!(body["data"]["email"], "alice@example.com");

    signup(&server, "bob@example.com").await;
    let (status, _) = server
        .send(
            Method::PUT,
            "/user",
            Some(json!({ "email": "bob@example.com" }).to_string()),
            Some(&access),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = server
        .send(
            Method::PUT,
            "/user",
            Some(json!({ "email": "Bad Email" }).to_string()),
            Some(&access),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expired_code_is_replaced() {
    let server = TestServer::start();
    signup(&server, "carol@example.com").await;
    let old_code = server.code_for("carol@example.com").unwrap();

    let user = server
        .state
        .store
        .get_user_by_email("carol@example.com")
        .unwrap()
        .unwrap();
    server
        .state
        .store
        .replace_verification_code(&user.id, old_code, Utc::now() - Duration::minutes(1))
        .unwrap();

    let (status, body) = server
        .post("/user/signup/verify", json!({ "verification_code": old_code }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body);

    let new_code = server.code_for("carol@example.com").unwrap();
    assert_ne!(new_code, old_code);

    let (status, _) = server
        .post("/user/signup/verify", json!({ "verification_code": new_code }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_project_ownership() {
    let server = TestServer::start();
    let (alice, alice_token) = sign_in(&server, "alice@example.com").await;
    let (_, bob_token) = sign_in(&server, "bob@example.com").await;

    let (status, body) = server
        .send(
            Method::POST,
            "/project",
            Some(json!({ "name": "Owned", "owner_id": "someone-else" }).to_string()),
            Some(&alice_token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["owner_id"], alice.as_str());
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/project/{id}");
    let rename = Some(json!({ "name": "Taken over" }).to_string());

    let (status, body) = server.put(&uri, json!({ "name": "Taken over" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body);
    let (status, _) = server.delete(&uri).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = server
        .send(Method::PUT, &uri, rename.clone(), Some(&bob_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "have not access to update project");
    let (status, body) = server
        .send(Method::DELETE, &uri, None, Some(&bob_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "have not access to delete project");

    let (status, _) = server
        .send(Method::PUT, &uri, rename, Some("not-a-token"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let project = server.state.store.get_project(id).unwrap().unwrap();
    assert_eq!(project.name, "Owned");

    let (status, body) = server
        .send(
            Method::PUT,
            &uri,
            Some(json!({ "name": "Renamed" }).to_string()),
            Some(&alice_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["owner_id"], alice.as_str());

    let (status, _) = server
        .send(Method::DELETE, &uri, None, Some(&alice_token))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_signed_with_placeholder_secret_is_rejected() {
    let server = TestServer::start();
    let (alice, alice_token) = sign_in(&server, "alice@example.com").await;
    let id = create_project(&server, "Guarded", Some(&alice_token)).await;

    let user = server.state.store.get_user(&alice).unwrap().unwrap();
    let forger = TokenIssuer::new(&JwtConfig {
        secret: "change-me".to_string(),
        ..test_config().jwt
    });
    let forged = forger.access_token(&user).unwrap();

    let (status, _) = server.send(Method::GET, "/user", None, Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = server
        .send(Method::DELETE, &format!("/project/{id}"), None, Some(&forged))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(server.state.store.get_project(id).unwrap().is_some());
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/project")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let server = TestServer::start();

    let response = server.request(preflight("https://bugs.example.com")).await;
    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://bugs.example.com")
        .body(Body::empty())
        .unwrap();
    let response = server.request(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_cors_restricted_to_configured_origins() {
    let mut config = test_config();
    config.server.cors_origins = vec!["https://bugs.example.com".to_string()];
    let server = TestServer::with_config(&config);

    let response = server.request(preflight("https://bugs.example.com")).await;
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://bugs.example.com"
    );

    let response = server.request(preflight("https://evil.example.com")).await;
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
