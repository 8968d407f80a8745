use crate::model::{Credentials, Profile, Registration};
use crate::{Http, Result};

/// Requests against the user service.
#[derive(Clone)]
pub struct UserService {
    http: Http,
}

impl UserService {
    pub fn new(http: Http) -> UserService {
        UserService { http }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Profile> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        self.http.post_json("/login", &credentials).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<()> {
        self.http.post_json_ok("", registration).await
    }

    pub async fn get(&self, user_id: i64) -> Result<Profile> {
        self.http.get(&format!("/{}", user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::sync::Arc;
    use std::thread;

    use tiny_http::{Response, Server};

    use crate::NoToken;

    use super::*;

    #[async_std::test]
    async fn login_posts_credentials_and_parses_profile() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let base = format!("http://{}", server.server_addr().to_ip().unwrap());

        let handle = thread::spawn(move || {
            let mut request = server.recv().unwrap();

            let mut body = String::new();
            request.as_reader().read_to_string(&mut body).unwrap();
            let url = request.url().to_string();

            request
                .respond(Response::from_string(r#"{"id":42,"firstName":"John"}"#))
                .unwrap();

            (url, body)
        });

        let users = UserService::new(Http::new(base, Arc::new(NoToken)));
        let profile = users.login("john_doe", "secret").await.unwrap();

        let (url, body) = handle.join().unwrap();
        assert_eq!(url, "/login");
        assert_eq!(body, r#"{"username":"john_doe","password":"secret"}"#);
        assert_eq!(profile.id, 42);
        assert_eq!(profile.first_name.as_deref(), Some("John"));
    }
}
