use base64::{engine::general_purpose, Engine};
use http::{header::WWW_AUTHENTICATE, Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use std::{
    io::Write,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use warden_auth::{
    create_password_hash,
    server::http_message_types::{empty_body, full_body, HttpRequest, HttpResponse},
    AuthBasic, Collaborators, DirectoryAuthenticator, DirectoryParams, HashAlgorithm,
    MiddlewareStack, Realm, RealmConfig, RequestContext,
};

fn request(raw: Option<&str>) -> HttpRequest {
    warden_tracing::try_init();
    let mut builder = Request::builder().uri("/admin");
    if let Some(raw) = raw {
        builder = builder.header(
            "Authorization",
            format!("Basic {}", general_purpose::STANDARD.encode(raw)),
        );
    }
    builder.body(empty_body()).unwrap()
}

async fn app(_req: HttpRequest, context: RequestContext) -> HttpResponse {
    let user = context.authenticated_user.unwrap_or_default();
    Response::new(full_body(format!("hello {}", user)))
}

async fn body_text(response: HttpResponse) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn inline_realm_from_json() {
    let hash = create_password_hash("hunter2", HashAlgorithm::Sha512Crypt).unwrap();
    let realm = Realm::from_json(
        "Admin Area",
        json!({ "username": "root", "password": hash }),
    )
    .unwrap();
    let stack = MiddlewareStack::new().layer(AuthBasic::new(realm));
    stack.initialize().await.unwrap();

    let ok = stack.call(request(Some("root:hunter2")), app).await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(body_text(ok).await, "hello root");

    let denied = stack.call(request(Some("root:hunter3")), app).await.unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        denied.headers().get(WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"Admin Area\""
    );
    assert_eq!(body_text(denied).await, "Unauthorized");
}

#[tokio::test]
async fn missing_header_is_challenged_without_reaching_the_app() {
    let reached = Arc::new(AtomicUsize::new(0));
    let stack = MiddlewareStack::new().layer(AuthBasic::new(Realm::new(
        "Nobody",
        warden_auth::CredentialMap::new(),
    )));
    let counter = reached.clone();
    let response = stack
        .call(request(None), |req, ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            app(req, ctx)
        })
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"Nobody\""
    );
    assert_eq!(reached.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn credential_file_realm() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "alice:secret").unwrap();
    let realm = Realm::from_json("Files", json!({ "path": file.path() })).unwrap();
    let stack = MiddlewareStack::new().layer(AuthBasic::new(realm));

    let ok = stack.call(request(Some("alice:secret")), app).await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    let denied = stack.call(request(Some("alice:wrong")), app).await.unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    // The file is re-read on every request.
    let argon = create_password_hash("rotated", HashAlgorithm::Argon2).unwrap();
    std::fs::write(file.path(), format!("alice:{}\n", argon)).unwrap();
    let stale = stack.call(request(Some("alice:secret")), app).await.unwrap();
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
    let fresh = stack.call(request(Some("alice:rotated")), app).await.unwrap();
    assert_eq!(fresh.status(), StatusCode::OK);
}

struct StubDirectory {
    calls: Arc<AtomicUsize>,
}

impl DirectoryAuthenticator for StubDirectory {
    fn authenticate(&mut self, username: &str, password: &str) -> anyhow::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(username == "bob" && password == "ldap-pw")
    }
}

#[tokio::test]
async fn directory_realm_uses_connector() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen_hosts = Arc::new(std::sync::Mutex::new(Vec::new()));
    let (counter, hosts) = (calls.clone(), seen_hosts.clone());
    let collaborators = Collaborators::default().with_directory(
        move |params: &DirectoryParams| -> anyhow::Result<Box<dyn DirectoryAuthenticator>> {
            hosts.lock().unwrap().push(params.search_filter("bob"));
            Ok(Box::new(StubDirectory {
                calls: counter.clone(),
            }))
        },
    );
    let realm = Realm::from_json(
        "Corp",
        json!({
            "host": "ad.example.com",
            "basedn": "dc=example,dc=com",
            "binddn": "cn=svc,dc=example,dc=com",
            "bindpw": "svc-pw",
            "filter": "(sAMAccountName=%s)"
        }),
    )
    .unwrap();
    let stack = MiddlewareStack::new().layer(AuthBasic::with_collaborators(realm, collaborators));

    let no_password = stack.call(request(Some("bob:")), app).await.unwrap();
    assert_eq!(no_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let ok = stack.call(request(Some("bob:ldap-pw")), app).await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        *seen_hosts.lock().unwrap(),
        vec!["(sAMAccountName=bob)".to_owned()]
    );
}

#[tokio::test]
async fn unwired_directory_fails_closed() {
    let realm = Realm::from_json("Corp", json!({ "host": "ldap.example.com" })).unwrap();
    let stack = MiddlewareStack::new().layer(AuthBasic::new(realm));
    let response = stack.call(request(Some("bob:pw")), app).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_decisions_share_one_gate() {
    let layer = AuthBasic::new(Realm::new(
        "Callback",
        RealmConfig::callback(|user, pass| {
            std::thread::sleep(std::time::Duration::from_millis(5));
            user == pass
        }),
    ));
    let stack = Arc::new(MiddlewareStack::new().layer(layer));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let stack = stack.clone();
            tokio::spawn(async move {
                let raw = if i % 2 == 0 {
                    format!("u{i}:u{i}")
                } else {
                    format!("u{i}:nope")
                };
                let response = stack.call(request(Some(&raw)), app).await.unwrap();
                (i, response.status())
            })
        })
        .collect();

    for handle in handles {
        let (i, status) = handle.await.unwrap();
        let expected = if i % 2 == 0 {
            StatusCode::OK
        } else {
            StatusCode::UNAUTHORIZED
        };
        assert_eq!(status, expected, "request {}", i);
    }
}
