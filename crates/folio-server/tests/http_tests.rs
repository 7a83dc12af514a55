//! End-to-end tests for the `Folio` router.
//!
//! Each test gets its own temporary document directory and credential file
//! and drives the full middleware stack with `tower::ServiceExt::oneshot`.
//! Flash messages are checked by reading the visitor's session straight
//! from the session table.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use folio_core::credentials::CredentialStore;
use folio_core::session::{Session, SessionId, SessionStore};
use folio_server::build_router;
use folio_server::middleware::{SESSION_COOKIE, session_id_from_headers};
use folio_server::state::AppState;
use folio_storage::FsDocumentStore;

struct TestApp {
    _dir: tempfile::TempDir,
    data: PathBuf,
    state: Arc<AppState>,
    app: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let data = dir.path().join("data");
        std::fs::create_dir(&data).unwrap();

        let users = dir.path().join("users.yml");
        let hash = bcrypt::hash("secret", 4).unwrap();
        std::fs::write(&users, format!("admin: '{hash}'\n")).unwrap();

        let state = Arc::new(AppState::new(
            Arc::new(FsDocumentStore::new(&data)),
            CredentialStore::new(users),
            Arc::new(SessionStore::new(Duration::from_secs(3600))),
            false,
        ));
        let app = build_router(Arc::clone(&state));

        Self {
            _dir: dir,
            data,
            state,
            app,
        }
    }

    fn create_document(&self, name: &str, content: &str) {
        std::fs::write(self.data.join(name), content).unwrap();
    }

    fn document_exists(&self, name: &str) -> bool {
        self.data.join(name).exists()
    }

    async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(req).await.unwrap()
    }

    async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request("GET", path, cookie, None)).await
    }

    async fn post(&self, path: &str, form: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request("POST", path, cookie, Some(form))).await
    }

    /// Cookie header value for a session that is already signed in.
    async fn admin_cookie(&self) -> String {
        let id = self.state.sessions.insert(Session::signed_in()).await;
        format!("{SESSION_COOKIE}={id}")
    }

    /// The session a response belongs to: the one it just issued a cookie
    /// for, or else the one the request carried.
    async fn session_after(&self, resp: &Response<Body>, cookie: Option<&str>) -> Session {
        let id = issued_session(resp)
            .or_else(|| cookie.and_then(parse_cookie))
            .expect("response has no session");
        self.state.sessions.load(id).await.unwrap_or_default()
    }
}

fn request(method: &str, path: &str, cookie: Option<&str>, form: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match form {
        Some(form) => {
            builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_owned())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

fn issued_session(resp: &Response<Body>) -> Option<SessionId> {
    let set_cookie = resp.headers().get(SET_COOKIE)?.to_str().ok()?;
    let pair = set_cookie.split(';').next()?;
    parse_cookie(pair)
}

fn parse_cookie(cookie: &str) -> Option<SessionId> {
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(COOKIE, cookie.parse().ok()?);
    session_id_from_headers(&headers)
}

fn cookie_for(resp: &Response<Body>) -> String {
    let id = issued_session(resp).expect("response did not set a session cookie");
    format!("{SESSION_COOKIE}={id}")
}

async fn body_string(resp: Response<Body>) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn content_type(resp: &Response<Body>) -> &str {
    resp.headers()[CONTENT_TYPE].to_str().unwrap()
}

fn assert_redirect_home(resp: &Response<Body>) {
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[LOCATION], "/");
}

// ── Index & viewing ──────────────────────────────────────────────────

#[tokio::test]
async fn index_lists_documents() {
    let app = TestApp::new();
    app.create_document("about.md", "");
    app.create_document("changes.txt", "");
    app.create_document("history.txt", "");

    let resp = app.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "text/html;charset=utf-8");

    let body = body_string(resp).await;
    assert!(body.contains("about.md"));
    assert!(body.contains("changes.txt"));
    assert!(body.contains("history.txt"));
    assert!(body.contains(r#"<a href="/sign_in">Sign In</a>"#));
}

#[tokio::test]
async fn view_text_document_is_verbatim_plain_text() {
    let app = TestApp::new();
    app.create_document("history.txt", "1993 - Yukihiro Matsumoto dreams up Ruby.");

    let resp = app.get("/history.txt", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "text/plain");
    assert_eq!(
        body_string(resp).await,
        "1993 - Yukihiro Matsumoto dreams up Ruby."
    );
}

#[tokio::test]
async fn view_markdown_document_renders_inside_layout() {
    let app = TestApp::new();
    app.create_document("about.md", "<h1>Ruby is...</h1>\n\nA *dynamic* language.\n");

    let resp = app.get("/about.md", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "text/html;charset=utf-8");

    let body = body_string(resp).await;
    assert!(body.contains("<h1>Ruby is...</h1>"));
    assert!(body.contains("<em>dynamic</em>"));
    assert!(body.contains("Sign In"), "layout chrome should be present");
}

#[tokio::test]
async fn missing_document_redirects_with_flash() {
    let app = TestApp::new();

    let resp = app.get("/error", None).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, None).await;
    assert_eq!(session.flash(), Some("error does not exist."));

    // Shown once on the next page, then gone.
    let cookie = cookie_for(&resp);
    let body = body_string(app.get("/", Some(&cookie)).await).await;
    assert!(body.contains("error does not exist."));
    let body = body_string(app.get("/", Some(&cookie)).await).await;
    assert!(!body.contains("error does not exist."));
}

#[tokio::test]
async fn unsupported_type_redirects_with_flash() {
    let app = TestApp::new();
    app.create_document("image.png", "not really a png");

    let resp = app.get("/image.png", None).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, None).await;
    assert_eq!(session.flash(), Some("image.png cannot be displayed."));
}

#[tokio::test]
async fn names_with_spaces_are_reachable() {
    let app = TestApp::new();
    app.create_document("my notes.txt", "spaced");

    let body = body_string(app.get("/", None).await).await;
    assert!(body.contains(r#"href="/my%20notes.txt""#));

    let resp = app.get("/my%20notes.txt", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "spaced");
}

// ── Editing ──────────────────────────────────────────────────────────

#[tokio::test]
async fn edit_form_signed_in() {
    let app = TestApp::new();
    app.create_document("history.txt", "old & <busted>");
    let cookie = app.admin_cookie().await;

    let resp = app.get("/history.txt/edit", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains(r#"<textarea name="content" rows="20" cols="100">"#));
    assert!(body.contains("old &amp; &lt;busted&gt;"));
    assert!(body.contains(r#"<button type="submit">Save Changes</button>"#));
}

#[tokio::test]
async fn edit_form_signed_out() {
    let app = TestApp::new();
    app.create_document("history.txt", "");

    let resp = app.get("/history.txt/edit", None).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, None).await;
    assert_eq!(session.flash(), Some("You must be signed in to do that."));
}

#[tokio::test]
async fn edit_form_for_missing_document() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    let resp = app.get("/ghost.txt/edit", Some(&cookie)).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, Some(&cookie)).await;
    assert_eq!(session.flash(), Some("ghost.txt does not exist."));
}

#[tokio::test]
async fn update_document() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    let resp = app.post("/history.txt", "content=new+content", Some(&cookie)).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, Some(&cookie)).await;
    assert_eq!(
        session.flash(),
        Some("The history.txt file has been updated successfully")
    );

    let resp = app.get("/history.txt", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "new content");
}

#[tokio::test]
async fn update_document_signed_out() {
    let app = TestApp::new();

    let resp = app.post("/history.txt", "content=new+content", None).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, None).await;
    assert_eq!(session.flash(), Some("You must be signed in to do that."));
    assert!(!app.document_exists("history.txt"));
}

// ── Creating ─────────────────────────────────────────────────────────

#[tokio::test]
async fn new_document_form() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    let resp = app.get("/new_doc", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Add a new document:"));
    assert!(body.contains(r#"<button type="submit">Create</button>"#));
}

#[tokio::test]
async fn new_document_form_signed_out() {
    let app = TestApp::new();

    let resp = app.get("/new_doc", None).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, None).await;
    assert_eq!(session.flash(), Some("You must be signed in to do that."));
}

#[tokio::test]
async fn create_document() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    let resp = app.post("/create_doc", "new_doc_name=test.txt", Some(&cookie)).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, Some(&cookie)).await;
    assert_eq!(session.flash(), Some("test.txt has been created"));

    let body = body_string(app.get("/", Some(&cookie)).await).await;
    assert!(body.contains("test.txt"));
    assert_eq!(std::fs::read(app.data.join("test.txt")).unwrap(), b"");
}

#[tokio::test]
async fn create_document_trims_name() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    let resp = app.post("/create_doc", "new_doc_name=++notes.md++", Some(&cookie)).await;
    assert_redirect_home(&resp);
    assert!(app.document_exists("notes.md"));
}

#[tokio::test]
async fn create_document_signed_out() {
    let app = TestApp::new();

    let resp = app.post("/create_doc", "new_doc_name=test.txt", None).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, None).await;
    assert_eq!(session.flash(), Some("You must be signed in to do that."));
    assert!(!app.document_exists("test.txt"));
}

#[tokio::test]
async fn create_document_without_name() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    for form in ["new_doc_name=", "new_doc_name=+++", ""] {
        let resp = app.post("/create_doc", form, Some(&cookie)).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "form {form:?}");
        assert!(body_string(resp).await.contains("A name is required"));
    }
    assert_eq!(std::fs::read_dir(&app.data).unwrap().count(), 0);
}

#[tokio::test]
async fn create_document_with_path_in_name() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    let resp = app
        .post("/create_doc", "new_doc_name=..%2Fescape.txt", Some(&cookie))
        .await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, Some(&cookie)).await;
    assert_eq!(
        session.flash(),
        Some("../escape.txt is not a valid document name.")
    );
    assert!(!app.data.parent().unwrap().join("escape.txt").exists());
}

// ── Deleting ─────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_document() {
    let app = TestApp::new();
    app.create_document("test.txt", "");
    let cookie = app.admin_cookie().await;

    let resp = app.post("/test.txt/delete", "", Some(&cookie)).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, Some(&cookie)).await;
    assert_eq!(session.flash(), Some("test.txt has been deleted"));

    let body = body_string(app.get("/", Some(&cookie)).await).await;
    assert!(!body.contains(r#"href="/test.txt""#));
    assert!(!app.document_exists("test.txt"));
}

#[tokio::test]
async fn delete_document_signed_out() {
    let app = TestApp::new();
    app.create_document("test.txt", "keep me");

    let resp = app.post("/test.txt/delete", "", None).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, None).await;
    assert_eq!(session.flash(), Some("You must be signed in to do that."));
    assert!(app.document_exists("test.txt"));
}

#[tokio::test]
async fn delete_missing_document() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    let resp = app.post("/ghost.txt/delete", "", Some(&cookie)).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, Some(&cookie)).await;
    assert_eq!(session.flash(), Some("ghost.txt does not exist."));
}

// ── Sign in / out ────────────────────────────────────────────────────

#[tokio::test]
async fn sign_in_form() {
    let app = TestApp::new();

    let resp = app.get("/sign_in", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("<input"));
    assert!(body.contains(r#"<button type="submit">"#));
}

#[tokio::test]
async fn sign_in() {
    let app = TestApp::new();

    let resp = app.post("/sign_in", "username=admin&password=secret", None).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, None).await;
    assert_eq!(session.flash(), Some("Welcome!"));
    assert_eq!(session.identity(), Some("admin"));

    let cookie = cookie_for(&resp);
    let body = body_string(app.get("/", Some(&cookie)).await).await;
    assert!(body.contains("Signed in as admin"));
    assert!(body.contains("Welcome!"));
}

#[tokio::test]
async fn sign_in_with_invalid_credentials() {
    let app = TestApp::new();

    for form in [
        "username=admin&password=wrong",
        "username=incorrect&password=secret",
        "",
    ] {
        let resp = app.post("/sign_in", form, None).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "form {form:?}");
        assert!(issued_session(&resp).is_none(), "no identity should be stored");
        let body = body_string(resp).await;
        assert!(body.contains("Invalid Credentials"));
        assert!(!body.contains("Signed in as"));
    }
}

#[tokio::test]
async fn sign_in_form_keeps_username_after_failure() {
    let app = TestApp::new();

    let resp = app.post("/sign_in", "username=ad%22min&password=x", None).await;
    let body = body_string(resp).await;
    assert!(body.contains(r#"value="ad&quot;min""#));
}

#[tokio::test]
async fn sign_out() {
    let app = TestApp::new();
    let cookie = app.admin_cookie().await;

    let body = body_string(app.get("/", Some(&cookie)).await).await;
    assert!(body.contains("Signed in as admin"));

    let resp = app.post("/sign_out", "", Some(&cookie)).await;
    assert_redirect_home(&resp);
    let session = app.session_after(&resp, Some(&cookie)).await;
    assert_eq!(session.flash(), Some("You have been signed out."));
    assert!(!session.is_signed_in());

    let body = body_string(app.get("/", Some(&cookie)).await).await;
    assert!(body.contains("You have been signed out."));
    assert!(body.contains("Sign In"));
    assert!(!body.contains("Signed in as admin"));
}

// ── Plumbing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn security_headers_on_every_response() {
    let app = TestApp::new();

    let resp = app.get("/", None).await;
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert_eq!(resp.headers()["cache-control"], "no-store");
}

#[tokio::test]
async fn unreadable_store_is_generic_500() {
    let app = TestApp::new();
    std::fs::remove_dir_all(&app.data).unwrap();

    let resp = app.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(resp).await;
    assert!(body.contains("Something went wrong."));
    let root = app.data.to_str().unwrap();
    assert!(!body.contains(root), "paths must not leak: {body}");
}

#[tokio::test]
async fn unknown_session_cookie_is_replaced() {
    let app = TestApp::new();
    let stale = format!("{SESSION_COOKIE}={}", SessionId::generate());

    let resp = app.post("/sign_in", "username=admin&password=secret", Some(&stale)).await;
    assert_redirect_home(&resp);
    let fresh = cookie_for(&resp);
    assert_ne!(fresh, stale);
}

#[tokio::test]
async fn favicon_does_not_touch_flash() {
    let app = TestApp::new();
    let resp = app.get("/error", None).await;
    let cookie = cookie_for(&resp);

    let favicon = app.get("/favicon.ico", Some(&cookie)).await;
    assert_eq!(favicon.status(), StatusCode::NO_CONTENT);

    let body = body_string(app.get("/", Some(&cookie)).await).await;
    assert!(body.contains("error does not exist."));
}
