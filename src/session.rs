use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{format_err, Context, Error};
use serde::{Deserialize, Serialize};

use api::TokenSource;

/// Identity persisted between runs after a successful login. Stored with
/// the same key names the backends use (`userId`, `userName`, `token`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: i64,
    pub user_name: String,
    pub token: Option<String>,
}

/// Durable session storage, the terminal counterpart of the browser's
/// local storage entries: survives restarts, local to this machine.
pub struct SessionStore {
    path: PathBuf,
    current: RwLock<Option<Identity>>,
}

impl SessionStore {
    /// Store under the platform data directory.
    pub fn open() -> Result<SessionStore, Error> {
        let dir = dirs_next::data_dir()
            .ok_or_else(|| format_err!("Could not get data directory"))?
            .join("folio");

        Ok(SessionStore::at(dir.join("session.json")))
    }

    /// Store backed by an explicit file. Tests point this at a temp path.
    pub fn at(path: PathBuf) -> SessionStore {
        let current = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok());

        SessionStore {
            path,
            current: RwLock::new(current),
        }
    }

    pub fn create(&self, identity: Identity) -> Result<(), Error> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let raw = serde_json::to_string(&identity)?;
        fs::write(&self.path, raw).context("Failed to persist session")?;

        *self.current.write().unwrap() = Some(identity);

        Ok(())
    }

    pub fn read(&self) -> Option<Identity> {
        self.current.read().unwrap().clone()
    }

    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
        *self.current.write().unwrap() = None;
    }
}

impl TokenSource for SessionStore {
    fn token(&self) -> Option<String> {
        self.read().and_then(|identity| identity.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "folio-session-{}-{}.json",
            std::process::id(),
            name
        ));
        let _ = fs::remove_file(&path);
        path
    }

    fn identity() -> Identity {
        Identity {
            user_id: 42,
            user_name: String::from("John"),
            token: Some(String::from("sesame")),
        }
    }

    #[test]
    fn create_then_read_then_clear() {
        let store = SessionStore::at(temp_path("lifecycle"));

        assert_eq!(store.read(), None);

        store.create(identity()).unwrap();
        assert_eq!(store.read(), Some(identity()));
        assert_eq!(store.token().as_deref(), Some("sesame"));

        store.clear();
        assert_eq!(store.read(), None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn session_survives_reopen() {
        let path = temp_path("reopen");

        SessionStore::at(path.clone()).create(identity()).unwrap();

        let reopened = SessionStore::at(path.clone());
        assert_eq!(reopened.read(), Some(identity()));

        reopened.clear();
        assert_eq!(SessionStore::at(path).read(), None);
    }

    #[test]
    fn token_absent_when_identity_has_none() {
        let store = SessionStore::at(temp_path("no-token"));

        store
            .create(Identity {
                user_id: 1,
                user_name: String::from("Jane"),
                token: None,
            })
            .unwrap();

        assert_eq!(store.token(), None);
    }
}
