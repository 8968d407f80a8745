use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::AsyncReadExt;
use http::{header, Request, Uri};
use isahc::config::Configurable;
use isahc::{AsyncBody, HttpClient};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ErrorBody;
use crate::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the bearer token for outgoing requests comes from. Implemented by
/// the application's session store so it can be swapped out in tests.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// No session, no Authorization header.
pub struct NoToken;

impl TokenSource for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Request client bound to one backend base address. Injects the current
/// session token before every request and times each request out.
#[derive(Clone)]
pub struct Http {
    client: HttpClient,
    base: String,
    tokens: Arc<dyn TokenSource>,
}

impl Http {
    pub fn new(base: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Http {
        let client = HttpClient::builder().build().unwrap();

        Http {
            client,
            base: base.into(),
            tokens,
        }
    }

    fn url(&self, path: &str, query: Option<HashMap<&str, String>>) -> Result<Uri> {
        let url = if let Some(query) = query {
            let query = serde_urlencoded::to_string(query).unwrap_or_else(|_| String::new());
            format!("{}{}?{}", self.base, path, query)
        } else {
            format!("{}{}", self.base, path)
        };

        url.parse::<Uri>().map_err(http::Error::from).map_err(Error::from)
    }

    fn builder(&self, method: http::Method, uri: Uri) -> http::request::Builder {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .timeout(REQUEST_TIMEOUT);

        if let Some(token) = self.tokens.token() {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        req
    }

    /// Sends the request and returns the raw response body, or an error
    /// carrying the backend's message for non-success statuses.
    async fn request<B: Into<AsyncBody>>(&self, req: Request<B>) -> Result<Vec<u8>> {
        log::debug!("{} {}", req.method(), req.uri());

        let res = self.client.send_async(req).await?;
        let status = res.status();

        let mut body = res.into_body();
        let mut bytes = Vec::new();
        body.read_to_end(&mut bytes).await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));

            log::debug!("backend rejected request: {} {}", status.as_u16(), message);

            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(bytes)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.builder(http::Method::GET, self.url(path, None)?).body(())?;
        let body = self.request(req).await?;

        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<HashMap<&str, String>>,
    ) -> Result<T> {
        let req = self.builder(http::Method::POST, self.url(path, query)?).body(())?;
        let body = self.request(req).await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// POST with query parameters, response body ignored.
    pub async fn post_ok(&self, path: &str, query: Option<HashMap<&str, String>>) -> Result<()> {
        let req = self.builder(http::Method::POST, self.url(path, query)?).body(())?;
        self.request(req).await?;

        Ok(())
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_vec(body)?;
        let req = self
            .builder(http::Method::POST, self.url(path, None)?)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)?;
        let body = self.request(req).await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// POST with a JSON body, response body ignored.
    pub async fn post_json_ok<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let body = serde_json::to_vec(body)?;
        let req = self
            .builder(http::Method::POST, self.url(path, None)?)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)?;
        self.request(req).await?;

        Ok(())
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.builder(http::Method::PUT, self.url(path, None)?).body(())?;
        let body = self.request(req).await?;

        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use tiny_http::{Response, Server};

    use super::*;

    struct FixedToken(&'static str);

    impl TokenSource for FixedToken {
        fn token(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn local_server() -> (Server, String) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let base = format!("http://{}", server.server_addr().to_ip().unwrap());

        (server, base)
    }

    #[async_std::test]
    async fn attaches_bearer_token() {
        let (server, base) = local_server();

        let handle = thread::spawn(move || {
            let request = server.recv().unwrap();
            let auth = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Authorization"))
                .map(|h| h.value.as_str().to_string());
            request.respond(Response::from_string("{}")).unwrap();
            auth
        });

        let http = Http::new(base, Arc::new(FixedToken("sesame")));
        let _: serde_json::Value = http.get("/").await.unwrap();

        assert_eq!(handle.join().unwrap().as_deref(), Some("Bearer sesame"));
    }

    #[async_std::test]
    async fn omits_header_without_token() {
        let (server, base) = local_server();

        let handle = thread::spawn(move || {
            let request = server.recv().unwrap();
            let has_auth = request.headers().iter().any(|h| h.field.equiv("Authorization"));
            request.respond(Response::from_string("{}")).unwrap();
            has_auth
        });

        let http = Http::new(base, Arc::new(NoToken));
        let _: serde_json::Value = http.get("/").await.unwrap();

        assert!(!handle.join().unwrap());
    }

    #[async_std::test]
    async fn surfaces_backend_message_on_rejection() {
        let (server, base) = local_server();

        thread::spawn(move || {
            let request = server.recv().unwrap();
            let response =
                Response::from_string(r#"{"message":"Insufficient funds"}"#).with_status_code(400);
            request.respond(response).unwrap();
        });

        let http = Http::new(base, Arc::new(NoToken));
        let err = http.get::<serde_json::Value>("/").await.unwrap_err();

        match err {
            Error::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Insufficient funds");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[async_std::test]
    async fn falls_back_to_status_when_body_is_not_json() {
        let (server, base) = local_server();

        thread::spawn(move || {
            let request = server.recv().unwrap();
            let response = Response::from_string("gateway exploded").with_status_code(502);
            request.respond(response).unwrap();
        });

        let http = Http::new(base, Arc::new(NoToken));
        let err = http.get::<serde_json::Value>("/").await.unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "request failed with status 502");
    }
}
