//! Account credentials and environment configuration

use std::env;
use std::fmt;

use crate::error::{KasError, Result};

/// Environment variable holding the default KAS login.
pub const ENV_USERNAME: &str = "ALLINKL_USERNAME";
/// Environment variable holding the default KAS password.
pub const ENV_PASSWORD: &str = "ALLINKL_PASSWORD";
/// Truthy value enables `POST <url>` in transport error messages.
pub const ENV_VERBOSE_ERRORS: &str = "LEGO_DEBUG_CLIENT_VERBOSE_ERROR";

/// KAS account login and password.
#[derive(Clone)]
pub struct KasCredentials {
    login: String,
    password: String,
}

impl KasCredentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Reads `ALLINKL_USERNAME` and `ALLINKL_PASSWORD`.
    ///
    /// # Errors
    /// [`KasError::MissingCredentials`] naming the first variable that is
    /// unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, None)
    }

    /// Fills in whichever of `login`/`password` is `None` or empty from the
    /// environment.
    pub fn resolve(login: Option<String>, password: Option<String>) -> Result<Self> {
        Self::resolve_with(login, password, |name| env::var(name).ok())
    }

    fn resolve_with(
        login: Option<String>,
        password: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| KasError::MissingCredentials {
                    variable: name.to_string(),
                })
        };
        let login = match login.filter(|l| !l.is_empty()) {
            Some(login) => login,
            None => require(ENV_USERNAME)?,
        };
        let password = match password.filter(|p| !p.is_empty()) {
            Some(password) => password,
            None => require(ENV_PASSWORD)?,
        };
        Ok(Self::new(login, password))
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for KasCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KasCredentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

/// `LEGO_DEBUG_CLIENT_VERBOSE_ERROR` as a boolean (`1`, `t`, `true`, ...).
pub fn verbose_errors_from_env() -> bool {
    env::var(ENV_VERBOSE_ERRORS).is_ok_and(|v| parse_truthy(&v))
}

fn parse_truthy(value: &str) -> bool {
    matches!(
        value.trim(),
        "1" | "t" | "T" | "true" | "TRUE" | "True"
    )
}
