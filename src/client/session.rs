use std::collections::HashMap;

use crate::auth::dto::PublicUser;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Key/value slot storage, e.g. browser local storage.
pub trait TokenStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage(HashMap<String, String>);

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }
}

/// Explicit session context. Starts at login, ends at logout.
#[derive(Debug, Default)]
pub struct Session<S: TokenStorage = MemoryStorage> {
    storage: S,
}

impl<S: TokenStorage> Session<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn begin(&mut self, token: &str, user: &PublicUser) -> serde_json::Result<()> {
        let user = serde_json::to_string(user)?;
        self.storage.set(TOKEN_KEY, token.to_string());
        self.storage.set(USER_KEY, user);
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<PublicUser> {
        self.storage
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    /// True while a token is held. Signature and expiry are not checked;
    /// the server is the judge of that.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn logout(&mut self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
