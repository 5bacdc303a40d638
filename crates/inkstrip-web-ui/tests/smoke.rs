mod common;

use common::{ADMIN_PASSWORD, ADMIN_USERNAME, ROBOTS_TXT, TestServer, assert_redirect, location_of};

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn empty_site_shows_placeholder() {
    let server = TestServer::start().await;
    let driver = server.driver();

    let body = driver.get_page("/").await;
    assert!(body.contains("Placeholder"), "{body}");
    assert!(body.contains("You need to add a comic!"), "{body}");
    assert!(body.contains("href=\"/register\""), "Header should offer registration");

    // Any id shows the placeholder while there are no posts
    let body = driver.get_page("/7").await;
    assert!(body.contains("You need to add a comic!"), "{body}");

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn login_before_any_user_redirects_to_registration() {
    let server = TestServer::start().await;
    let driver = server.driver();

    assert_redirect(&driver.get("/login").await, "/register");
    assert_redirect(&driver.login("someone", "Whatever1").await, "/register");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn register_enforces_password_policy() {
    let server = TestServer::start().await;
    let driver = server.driver();

    let resp = driver.register(ADMIN_USERNAME, "abc12345").await;
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Your password must contain"), "{body}");
    assert!(!server.db().has_users().await.unwrap());

    assert_redirect(&driver.register(ADMIN_USERNAME, "Abc12345").await, "/admin");
    assert!(server.db().has_users().await.unwrap());

    // Registration logs the user in
    let body = driver.get_page("/admin").await;
    assert!(body.contains("href=\"/logout\""), "{body}");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn register_rejects_duplicate_username() {
    let server = TestServer::start().await;
    server.admin_driver().await;

    let resp = server
        .driver()
        .register(ADMIN_USERNAME, "Other1234")
        .await;
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("already exists"), "{body}");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn registration_can_be_closed() {
    let server = TestServer::start_with(|opts| opts.allow_registration = false).await;

    // The first account can always be created
    server.admin_driver().await;

    let resp = server.driver().register("second", "Second123").await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Registration is closed"));
    assert!(server.db().get_user("second").await.unwrap().is_none());
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn admin_requires_login() {
    let server = TestServer::start().await;
    let driver = server.driver();

    assert_redirect(&driver.get("/admin").await, "/login?redirect=%2Fadmin");
    assert_redirect(&driver.get("/edit/1").await, "/login?redirect=%2Fedit%2F1");

    let resp = driver.post_form("/admin", &[("banner_url", "x")]).await;
    assert_redirect(&resp, "/login?redirect=%2Fadmin");
    assert_eq!(
        server.db().get_site_settings().await.unwrap().banner_url,
        inkstrip_core::site::DEFAULT_BANNER_URL
    );
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn login_logout_flow() {
    let server = TestServer::start().await;
    server.admin_driver().await;
    let driver = server.driver();

    let resp = driver.login("nobody", ADMIN_PASSWORD).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Invalid username"));

    let resp = driver.login(ADMIN_USERNAME, "Wrong1234").await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Invalid password"));

    let resp = driver
        .post_form(
            "/login",
            &[
                ("username", ADMIN_USERNAME),
                ("password", ADMIN_PASSWORD),
                ("redirect", "/edit/3"),
            ],
        )
        .await;
    assert_redirect(&resp, "/edit/3");
    assert!(driver.get_page("/").await.contains("href=\"/admin\""));

    assert_redirect(&driver.get("/logout").await, "/");
    assert_redirect(&driver.get("/admin").await, "/login?redirect=%2Fadmin");
    assert!(driver.get_page("/").await.contains("href=\"/login\""));
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn login_ignores_offsite_redirects() {
    let server = TestServer::start().await;
    server.admin_driver().await;
    let driver = server.driver();

    let resp = driver
        .post_form(
            "/login",
            &[
                ("username", ADMIN_USERNAME),
                ("password", ADMIN_PASSWORD),
                ("redirect", "//evil.example.com/"),
            ],
        )
        .await;
    assert_redirect(&resp, "/admin");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn bad_post_ids_redirect_home() {
    let server = TestServer::start().await;
    let admin = server.admin_driver().await;
    admin.create_post("01/01/2024", "one", "first page").await;

    let driver = server.driver();
    assert_redirect(&driver.get("/abc").await, "/");
    assert_redirect(&driver.get("/-1").await, "/");
    assert_redirect(&driver.get("/42").await, "/");
    assert_eq!(driver.get("/1").await.status(), 200);
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn static_files_and_not_found() {
    let server = TestServer::start().await;
    let driver = server.driver();

    let resp = driver.get("/robots.txt").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), ROBOTS_TXT);

    let resp = driver.get("/static/style.css").await;
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()
            .get("cache-control")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("max-age")
    );

    let resp = driver.get("/no/such/page").await;
    assert_eq!(resp.status(), 404);
    assert!(resp.text().await.unwrap().contains("Not Found"));

    let resp = driver.get("/about").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("cache-control").unwrap().to_str().unwrap(),
        "no-store"
    );
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn www_host_redirects_to_bare_domain() {
    let server = TestServer::start().await;
    let driver = server.driver();

    let resp = driver
        .get_with_headers("/about?x=1", &[("host", "www.comic.example")])
        .await;
    assert_eq!(resp.status(), 308);
    assert_eq!(location_of(&resp), "http://comic.example/about?x=1");

    let resp = driver
        .get_with_headers(
            "/",
            &[("host", "www.comic.example"), ("x-forwarded-proto", "https")],
        )
        .await;
    assert_eq!(location_of(&resp), "https://comic.example/");
}
