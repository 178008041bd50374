use std::sync::RwLock;

/// Where the client looks up the bearer token. Consulted on every request,
/// so a token saved or cleared between calls takes effect immediately.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Blank tokens are the same as no token.
pub(crate) fn usable(token: Option<String>) -> Option<String> {
    token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// In-process token, set after login and dropped on logout.
#[derive(Debug, Default)]
pub struct MemoryToken {
    token: RwLock<Option<String>>,
}

impl MemoryToken {
    pub fn new(token: Option<String>) -> Self {
        MemoryToken { token: RwLock::new(token) }
    }

    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

impl TokenSource for MemoryToken {
    fn token(&self) -> Option<String> {
        let current = self.token.read().ok().and_then(|guard| guard.clone());
        usable(current)
    }
}

/// No credentials at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

impl TokenSource for Anonymous {
    fn token(&self) -> Option<String> {
        None
    }
}
