//! Token authorization for REST commands.
//!
//! Every route declares whether it needs a token. The gate checks the token a
//! caller supplied against the configured token set before the handler runs.
//!
//! # Rules
//!
//! - `requires_token = true`: the supplied token must match a configured
//!   token; otherwise the request is denied.
//! - `requires_token = false`: the request is allowed, unless the deployment
//!   sets `require_token_everywhere`, in which case the route is treated as
//!   if it required a token.
//!
//! # Security Properties
//!
//! - **No plaintext at rest**: only SHA-256 digests of the configured tokens
//!   are kept in memory.
//! - **Constant-time comparison**: the supplied token's digest is compared
//!   against every configured digest with `subtle`, so timing does not reveal
//!   which entry matched or how much of it.
//!
//! # Example
//!
//! ```rust
//! use rest_dispatch::rest::{authorize, AuthConfig, AuthError, TokenSet};
//!
//! let config = AuthConfig::new(TokenSet::new(["s3cret"]));
//!
//! assert!(authorize(true, Some("s3cret"), &config).is_ok());
//! assert_eq!(authorize(true, None, &config), Err(AuthError::MissingToken));
//! assert!(authorize(false, None, &config).is_ok());
//! ```

use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};
use tracing::debug;

// =============================================================================
// Types
// =============================================================================

/// Reason a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No token was supplied
    MissingToken,

    /// A token was supplied but matches no configured token
    InvalidToken,
}

impl AuthError {
    /// Short machine-readable identifier.
    pub fn error_type(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing token"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
        }
    }
}

impl std::error::Error for AuthError {}

// =============================================================================
// Token Set
// =============================================================================

type TokenDigest = [u8; 32];

/// The set of tokens accepted by the deployment.
#[derive(Clone, Default)]
pub struct TokenSet {
    digests: Vec<TokenDigest>,
}

impl TokenSet {
    /// Create a token set from plaintext tokens.
    ///
    /// Empty strings are skipped; they could otherwise be matched by a
    /// request carrying `token=`.
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let digests = tokens
            .into_iter()
            .filter(|t| !t.as_ref().is_empty())
            .map(|t| digest(t.as_ref()))
            .collect();
        Self { digests }
    }

    /// A set that accepts nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a token.
    pub fn insert(&mut self, token: &str) {
        if !token.is_empty() {
            self.digests.push(digest(token));
        }
    }

    /// Whether the token matches a configured token.
    ///
    /// All entries are compared regardless of where a match occurs.
    pub fn contains(&self, token: &str) -> bool {
        let candidate = digest(token);
        let found = self
            .digests
            .iter()
            .fold(Choice::from(0), |acc, known| {
                acc | known[..].ct_eq(&candidate[..])
            });
        found.into()
    }

    /// Number of configured tokens.
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    /// Whether no tokens are configured.
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSet")
            .field("len", &self.digests.len())
            .finish()
    }
}

fn digest(token: &str) -> TokenDigest {
    Sha256::digest(token.as_bytes()).into()
}

// =============================================================================
// Configuration
// =============================================================================

/// Process-wide authorization settings, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Tokens accepted for protected routes
    pub tokens: TokenSet,

    /// Require a valid token on every route, including token-exempt ones
    pub require_token_everywhere: bool,
}

impl AuthConfig {
    /// Create a configuration with the given tokens.
    pub fn new(tokens: TokenSet) -> Self {
        Self {
            tokens,
            require_token_everywhere: false,
        }
    }

    /// Force token authentication on all routes.
    pub fn with_require_token_everywhere(mut self, enabled: bool) -> Self {
        self.require_token_everywhere = enabled;
        self
    }
}

// =============================================================================
// Gate
// =============================================================================

/// Decide whether a request may reach its handler.
///
/// Stateless: the decision depends only on the route flag, the supplied token
/// and the configuration.
pub fn authorize(
    requires_token: bool,
    supplied: Option<&str>,
    config: &AuthConfig,
) -> Result<(), AuthError> {
    if !requires_token && !config.require_token_everywhere {
        return Ok(());
    }

    let token = match supplied {
        Some(token) if !token.is_empty() => token,
        _ => {
            debug!(forced = !requires_token, "Token required but none supplied");
            return Err(AuthError::MissingToken);
        }
    };

    if config.tokens.contains(token) {
        Ok(())
    } else {
        Err(AuthError::InvalidToken)
    }
}

// =============================================================================
// Tests
// =============================================================================
