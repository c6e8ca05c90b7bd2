use super::session::{Session, TokenStorage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Render,
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Resolved(Decision),
}

/// Gates protected routes on session presence.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_route: String,
    public_routes: Vec<String>,
}

impl RouteGuard {
    pub fn new(login_route: impl Into<String>) -> Self {
        Self {
            login_route: login_route.into(),
            public_routes: Vec::new(),
        }
    }

    pub fn with_public_routes<I, R>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.public_routes.extend(routes.into_iter().map(Into::into));
        self
    }

    /// The login route itself is always public.
    pub fn is_public(&self, path: &str) -> bool {
        path == self.login_route || self.public_routes.iter().any(|r| r == path)
    }

    pub fn decide<S: TokenStorage>(&self, path: &str, session: &Session<S>) -> Decision {
        if self.is_public(path) || session.is_authenticated() {
            Decision::Render
        } else {
            Decision::Redirect(self.login_route.clone())
        }
    }

    /// Starts a navigation in the `Checking` state.
    pub fn navigate(&self, path: impl Into<String>) -> Navigation<'_> {
        Navigation {
            guard: self,
            path: path.into(),
            decision: None,
        }
    }
}

/// One navigation; resolves exactly once.
#[derive(Debug)]
pub struct Navigation<'g> {
    guard: &'g RouteGuard,
    path: String,
    decision: Option<Decision>,
}

impl Navigation<'_> {
    pub fn state(&self) -> GuardState {
        match &self.decision {
            None => GuardState::Checking,
            Some(d) => GuardState::Resolved(d.clone()),
        }
    }

    /// Reads the session on the first call; later calls return the same
    /// decision even if the session changed.
    pub fn resolve<S: TokenStorage>(&mut self, session: &Session<S>) -> &Decision {
        let (guard, path) = (self.guard, &self.path);
        self.decision
            .get_or_insert_with(|| guard.decide(path, session))
    }
}
