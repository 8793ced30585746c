pub mod extractors;
pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use middleware::{AuthMiddleware, TokenRejection};
pub use password::{hash_password, verify_password};
pub use session::{AuthSettings, AuthenticatedUser};
pub use token::{generate_token, verify_token, Claims};

lazy_static! {
    // Usernames double as mail recipients, so address characters are allowed.
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_.@+-]+$").unwrap();
}

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired login for the new account.
    /// Must be between 3 and 50 characters: letters, digits, `_ . @ + -`.
    #[validate(
        length(min = 3, max = 50),
        regex(
            path = "USERNAME_REGEX",
            message = "Username may only contain letters, digits and _ . @ + -"
        )
    )]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[validate(length(max = 150))]
    pub full_name: Option<String>,
    #[validate(length(max = 150))]
    pub contacts: Option<String>,
    #[validate(length(max = 20))]
    pub ipn: Option<String>,
    #[validate(length(max = 150))]
    pub photo: Option<String>,
}

/// Response structure after a successful login.
/// Contains the session-bound access token and the ID of the authenticated user.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
}
