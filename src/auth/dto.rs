use serde::Deserialize;

/// Body of `POST /register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}
