//! Navigation seam between the authenticator and the host application.
//!
//! The authenticator never renders anything; when a request cannot be
//! authenticated it hands the host a [`LoginRedirect`] and the host decides
//! how to get the user to the login view.

/// A forced redirect to the login view.
///
/// `return_url` carries the originally intended destination so the login
/// flow can send the user back afterwards. It is omitted when the user was
/// already at the root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub login_path: String,
    pub return_url: Option<String>,
}

impl LoginRedirect {
    /// The redirect target as a path-and-query string.
    pub fn target(&self) -> String {
        match &self.return_url {
            Some(return_url) => format!("{}?returnUrl={}", self.login_path, return_url),
            None => self.login_path.clone(),
        }
    }
}

/// Redirect capability supplied by the host application.
pub trait Navigator: Send + Sync {
    /// Path the user is currently looking at.
    fn current_path(&self) -> String;

    /// Send the user to the login view.
    fn redirect_to_login(&self, redirect: LoginRedirect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_carries_the_return_url() {
        let redirect = LoginRedirect {
            login_path: "/login".to_string(),
            return_url: Some("/my-profile".to_string()),
        };
        assert_eq!(redirect.target(), "/login?returnUrl=/my-profile");
    }

    #[test]
    fn target_without_return_url_is_the_bare_login_path() {
        let redirect = LoginRedirect {
            login_path: "/login".to_string(),
            return_url: None,
        };
        assert_eq!(redirect.target(), "/login");
    }
}
