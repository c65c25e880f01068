//! AOC HTTP client implementation

use reqwest::header::{HeaderValue, USER_AGENT};
use tracing::debug;
use zeroize::Zeroize;

use crate::error::AocError;
use crate::settings::SettingsPage;

const DEFAULT_BASE_URL: &str = "https://adventofcode.com";
const DEFAULT_USER_AGENT: &str = concat!(
    "aoc-http-client/",
    env!("CARGO_PKG_VERSION"),
    " (local solver workspace)"
);

/// Result of session verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// User ID if session is valid, None otherwise
    pub user_id: Option<u64>,
}

/// Blocking client for adventofcode.com
///
/// Redirects are never followed: an expired session is detected by the
/// settings page redirecting to the home page.
///
/// ```no_run
/// use aoc_http_client::AocClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AocClient::new()?;
/// let input = client.get_input(2023, 1, "your_session_cookie")?;
/// println!("{} bytes", input.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AocClient {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
    settings: SettingsPage,
}

impl AocClient {
    /// Client for adventofcode.com with rustls and no redirect policy
    pub fn new() -> Result<Self, AocError> {
        Self::builder().build()
    }

    pub fn builder() -> AocClientBuilder {
        AocClientBuilder::new()
    }

    /// Cookie header marked sensitive, with the temporary string wiped
    fn cookie_header(session: &str) -> Result<HeaderValue, AocError> {
        let mut cookie = format!("session={session}");
        let header = HeaderValue::from_bytes(cookie.as_bytes())
            .map_err(|_| AocError::ClientInit("Invalid session cookie format".to_string()));
        cookie.zeroize();
        let mut header = header?;
        header.set_sensitive(true);
        Ok(header)
    }

    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, AocError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AocError::ClientInit("Cannot modify base URL path".to_string()))?
            .clear()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: reqwest::Url, session: &str) -> Result<reqwest::blocking::Response, AocError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .header("Cookie", Self::cookie_header(session)?)
            .send()?;
        Ok(response)
    }

    /// Check a session cookie against the settings page.
    ///
    /// A 2xx response means the session is valid and the user id is read
    /// from the page; redirects and error statuses mean it is not.
    pub fn verify_session(&self, session: &str) -> Result<SessionInfo, AocError> {
        let response = self.get(self.url(&["settings"])?, session)?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "session rejected");
            return Ok(SessionInfo { user_id: None });
        }
        let html = response.text().map_err(|_| AocError::Encoding)?;
        Ok(SessionInfo {
            user_id: self.settings.user_id(&html),
        })
    }

    /// Download the personal puzzle input for `year`/`day`
    ///
    /// # Errors
    ///
    /// * `AocError::InvalidStatus` - e.g. 404 before the puzzle unlocks, 400 for a bad session
    /// * `AocError::Encoding` - body is not UTF-8
    pub fn get_input(&self, year: u16, day: u8, session: &str) -> Result<String, AocError> {
        let url = self.url(&[&year.to_string(), "day", &day.to_string(), "input"])?;
        let response = self.get(url, session)?;
        if !response.status().is_success() {
            return Err(AocError::InvalidStatus {
                status: response.status(),
            });
        }
        response.text().map_err(|_| AocError::Encoding)
    }
}

/// Builder for an [`AocClient`]
///
/// The redirect policy is always forced to `none`, whatever client builder is supplied.
#[derive(Debug, Default)]
pub struct AocClientBuilder {
    base_url: Option<reqwest::Url>,
    client_builder: Option<reqwest::blocking::ClientBuilder>,
}

impl AocClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client somewhere other than adventofcode.com, e.g. a mock server
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self, AocError> {
        self.base_url = Some(url.into_url()?);
        Ok(self)
    }

    /// Custom HTTP client configuration (timeouts, proxies, ...)
    pub fn client_builder(mut self, builder: reqwest::blocking::ClientBuilder) -> Self {
        self.client_builder = Some(builder);
        self
    }

    pub fn build(self) -> Result<AocClient, AocError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => reqwest::Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| AocError::ClientInit(e.to_string()))?,
        };
        let builder = self
            .client_builder
            .unwrap_or_else(|| reqwest::blocking::Client::builder().use_rustls_tls());
        let client = builder
            .redirect(reqwest::redirect::Policy::none())
            .default_headers(
                [(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT))]
                    .into_iter()
                    .collect(),
            )
            .build()
            .map_err(|e| AocError::ClientInit(e.to_string()))?;

        Ok(AocClient {
            client,
            base_url,
            settings: SettingsPage::new()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn client_for(server: &mockito::Server) -> AocClient {
        AocClient::builder()
            .base_url(server.url())
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn default_base_url() {
        let client = AocClient::new().unwrap();
        assert_eq!(client.base_url.as_str(), "https://adventofcode.com/");
    }

    #[test]
    fn invalid_base_url() {
        assert!(AocClient::builder().base_url("not a valid url").is_err());
    }

    #[test]
    fn custom_client_builder() {
        let builder = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .use_rustls_tls();
        assert!(AocClient::builder().client_builder(builder).build().is_ok());
    }

    #[test]
    fn redirects_are_not_followed() {
        let mut server = mockito::Server::new();
        let home = server.mock("GET", "/").with_status(200).expect(0).create();
        let settings = server
            .mock("GET", "/settings")
            .with_status(303)
            .with_header("location", "/")
            .expect(1)
            .create();

        let info = client_for(&server).verify_session("expired").unwrap();
        assert_eq!(info.user_id, None);
        home.assert();
        settings.assert();
    }

    #[test]
    fn session_cookie_and_user_agent_are_sent() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/settings")
            .match_header("cookie", "session=abc123")
            .match_header("user-agent", mockito::Matcher::Regex("aoc-http-client".into()))
            .with_status(200)
            .with_body("<p>(anonymous user #4242)</p>")
            .create();

        let info = client_for(&server).verify_session("abc123").unwrap();
        assert_eq!(info.user_id, Some(4242));
        mock.assert();
    }

    #[test]
    fn invalid_cookie_characters() {
        let server = mockito::Server::new();
        let result = client_for(&server).verify_session("bad\nsession");
        assert!(matches!(result, Err(AocError::ClientInit(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_session_redirects_and_errors_are_invalid(
            session in "[a-f0-9]{32,128}",
            status_code in prop::sample::select(vec![301, 302, 303, 307, 400, 401, 403, 404, 500, 503]),
        ) {
            let mut server = mockito::Server::new();
            let mock = server.mock("GET", "/settings")
                .with_status(status_code)
                .with_header("location", "/")
                .expect(1)
                .create();

            let info = client_for(&server).verify_session(&session);
            prop_assert!(info.is_ok());
            prop_assert_eq!(info.unwrap().user_id, None);
            mock.assert();
        }

        #[test]
        fn prop_input_url_construction(
            year in 2015u16..2030u16,
            day in 1u8..=25u8,
            session in "[a-f0-9]{32,128}",
        ) {
            let mut server = mockito::Server::new();
            let path = format!("/{year}/day/{day}/input");
            let mock = server.mock("GET", path.as_str())
                .with_status(200)
                .with_body("1abc2\n")
                .expect(1)
                .create();

            let input = client_for(&server).get_input(year, day, &session);
            let input = input.ok();
            prop_assert_eq!(input.as_deref(), Some("1abc2\n"));
            mock.assert();
        }

        #[test]
        fn prop_input_error_status(
            status_code in prop::sample::select(vec![400, 401, 404, 429, 500, 502]),
        ) {
            let mut server = mockito::Server::new();
            let mock = server.mock("GET", "/2023/day/1/input")
                .with_status(status_code)
                .expect(1)
                .create();

            match client_for(&server).get_input(2023, 1, "session") {
                Err(AocError::InvalidStatus { status }) => {
                    prop_assert_eq!(status.as_u16(), status_code as u16);
                }
                other => prop_assert!(false, "expected InvalidStatus, got {:?}", other),
            }
            mock.assert();
        }
    }
}
