#![allow(dead_code)]

use inkstrip_db::Database;
use inkstrip_web_ui::{Opts, Server, SharedState};
use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const BROWSER_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
pub const CRAWLER_UA: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "Abc12345";

pub const ROBOTS_TXT: &str = "User-agent: *\nDisallow: /admin\n";

/// A test web UI server running on a random port with ephemeral storage.
pub struct TestServer {
    state: SharedState,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<inkstrip_web_ui::ServerResult<()>>,
    _temp_dir: TempDir,
    base_url: String,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(customize: impl FnOnce(&mut Opts)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        let static_dir = temp_dir.path().join("static");
        std::fs::create_dir_all(&static_dir).expect("Failed to create static dir");
        std::fs::write(static_dir.join("robots.txt"), ROBOTS_TXT).expect("Failed to write file");
        std::fs::write(static_dir.join("style.css"), "body {}\n").expect("Failed to write file");

        let mut opts = Opts::new("127.0.0.1:0".to_string(), data_dir, static_dir);
        customize(&mut opts);

        let server = Server::init(opts)
            .await
            .expect("Failed to start test server");
        let base_url = format!("http://{}", server.addr().expect("Bound"));
        let state = server.state().clone();

        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(server.run_until(async move {
            let _ = shutdown_rx.await;
        }));

        Self {
            state,
            shutdown,
            handle,
            _temp_dir: temp_dir,
            base_url,
        }
    }

    /// Create a new `UiDriver` with its own cookie jar (independent session).
    pub fn driver(&self) -> UiDriver {
        UiDriver::new(self.base_url.clone(), BROWSER_UA)
    }

    /// Like [`Self::driver`], but identifying as a search engine crawler
    pub fn crawler_driver(&self) -> UiDriver {
        UiDriver::new(self.base_url.clone(), CRAWLER_UA)
    }

    /// A driver already logged in as the site admin
    pub async fn admin_driver(&self) -> UiDriver {
        let driver = self.driver();
        let resp = driver.register(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_redirect(&resp, "/admin");
        driver
    }

    pub fn db(&self) -> &Database {
        self.state.db()
    }

    /// Shut down the server cleanly.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        self.handle
            .await
            .expect("Server task panicked")
            .expect("Server shutdown failed");
    }
}

/// Assert a `303 See Other` to `location`
pub fn assert_redirect(resp: &reqwest::Response, location: &str) {
    assert_eq!(
        resp.status(),
        reqwest::StatusCode::SEE_OTHER,
        "Expected redirect to {location}"
    );
    assert_eq!(location_of(resp), location);
}

pub fn location_of(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get("location")
        .expect("Missing Location header")
        .to_str()
        .expect("Invalid Location header")
}

/// HTTP client driver for interacting with the web UI in tests.
///
/// Each `UiDriver` maintains its own cookie jar, so it represents
/// an independent browser session.
pub struct UiDriver {
    client: reqwest::Client,
    base_url: String,
}

impl UiDriver {
    fn new(base_url: String, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            // Don't auto-follow redirects, let tests assert on redirect targets.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a GET request to the given path.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// GET and return the body of a `200 OK` page
    pub async fn get_page(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), 200, "GET {path}");
        resp.text().await.expect("Body")
    }

    /// Send a form POST to the given path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_form(
            "/register",
            &[("username", username), ("password", password)],
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    /// Create a new post through the admin form.
    pub async fn create_post(&self, date: &str, title: &str, body: &str) -> reqwest::Response {
        self.post_form(
            "/admin",
            &[("date", date), ("title", title), ("body", body)],
        )
        .await
    }

    pub async fn edit_post(
        &self,
        id: u64,
        date: &str,
        title: &str,
        published: bool,
        body: &str,
    ) -> reqwest::Response {
        self.post_form(
            &format!("/edit/{id}"),
            &[
                ("date", date),
                ("title", title),
                ("published", if published { "1" } else { "0" }),
                ("body", body),
            ],
        )
        .await
    }

    /// Send a request with extra headers, for proxy and host handling
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> reqwest::Response {
        let mut req = self.client.get(self.url(path));
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        req.send().await.expect("GET request failed")
    }

    pub async fn post_form_with_headers(
        &self,
        path: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> reqwest::Response {
        let mut req = self.client.post(self.url(path)).form(form);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        req.send().await.expect("POST request failed")
    }
}
