//! Request identity.
//!
//! The gateway forwards the authenticated user id in the `user-info` header.
//! A missing or malformed header never rejects the request; it degrades to
//! [`RequestIdentity::Anonymous`].

use std::future::Future;

use tracing::warn;

use crate::domain::UserId;

pub const USER_HEADER: &str = "user-info";

tokio::task_local! {
    static CURRENT_USER: Option<UserId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestIdentity {
    Anonymous,
    User(UserId),
}

impl RequestIdentity {
    pub fn from_header(value: Option<&str>) -> Self {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::Anonymous;
        };
        match raw.parse::<UserId>() {
            Ok(id) => Self::User(id),
            Err(e) => {
                warn!(header = USER_HEADER, value = raw, error = %e, "ignoring malformed user header");
                Self::Anonymous
            }
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }

    /// Run `fut` with this identity as the current user.
    ///
    /// The context lives exactly as long as the returned future.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT_USER.scope(self.user_id(), fut).await
    }
}

/// User of the enclosing [`RequestIdentity::scope`], if any.
pub fn current_user() -> Option<UserId> {
    CURRENT_USER.try_with(|user| *user).ok().flatten()
}
