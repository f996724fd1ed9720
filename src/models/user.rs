use serde::{Deserialize, Serialize};

/// Identity fields supplied by the authentication provider
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AuthUser {
    pub user_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

impl AuthUser {
    /// Unique identifier, treating an empty string as absent
    pub fn id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<AuthUser>,
}

impl AuthState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: AuthUser) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
        }
    }

    /// Identifier of the current user, only when authenticated
    pub fn user_id(&self) -> Option<&str> {
        if !self.is_authenticated {
            return None;
        }
        self.user.as_ref().and_then(AuthUser::id)
    }
}
