use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{ForgotPasswordRequest, LoginRequest, RegisterRequest},
        extractors::FormOrJson,
        services::{self, CredentialError, LoginOutcome, ResetOutcome},
    },
    state::AppState,
    views::{
        render, ForgotPasswordView, LoginView, RegisterView, SuccessView, MESSAGE_ERROR,
        MESSAGE_SUCCESS,
    },
};

type PageResult = Result<Html<String>, (StatusCode, String)>;

const EMAIL_NOT_FOUND: &str = "Email not found. Please register or provide a valid email.";

pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(login_page))
        .route("/register", get(register_page).post(register))
        .route("/login", post(login))
        .route(
            "/forgot-password",
            get(forgot_password_page).post(forgot_password),
        )
}

fn internal(msg: &str) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string())
}

pub async fn login_page() -> PageResult {
    render(&LoginView)
}

pub async fn register_page() -> PageResult {
    render(&RegisterView)
}

pub async fn forgot_password_page() -> PageResult {
    render(&ForgotPasswordView::default())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    FormOrJson(payload): FormOrJson<RegisterRequest>,
) -> PageResult {
    if let Err(e) = services::register(
        state.users.as_ref(),
        &payload.username,
        &payload.email,
        &payload.password,
    )
    .await
    {
        error!(error = ?e, username = %payload.username, "error inserting user");
        return Err(internal("Error registering user"));
    }

    info!(username = %payload.username, "user registered");
    render(&SuccessView {
        message: "Registration Successful!",
        action_message: "You have successfully registered. Please login to continue.",
        message_type: MESSAGE_SUCCESS,
    })
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    FormOrJson(payload): FormOrJson<LoginRequest>,
) -> PageResult {
    let outcome = services::authenticate(state.users.as_ref(), &payload.username, &payload.password)
        .await
        .map_err(|e| {
            error!(error = ?e, "error fetching user");
            internal("Error logging in")
        })?;

    match outcome {
        LoginOutcome::Success => {
            info!(username = %payload.username, "user logged in");
            render(&SuccessView {
                message: "Login Successful!",
                action_message: "You are now logged in. Welcome back!",
                message_type: MESSAGE_SUCCESS,
            })
        }
        LoginOutcome::InvalidCredentials => {
            warn!(username = %payload.username, "invalid login attempt");
            render(&SuccessView {
                message: "Invalid Login Attempt!",
                action_message: "Invalid username or password. Please try again or register if you don't have an account.",
                message_type: MESSAGE_ERROR,
            })
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    FormOrJson(payload): FormOrJson<ForgotPasswordRequest>,
) -> PageResult {
    let outcome =
        services::reset_password(state.users.as_ref(), &payload.email, &payload.new_password)
            .await
            .map_err(|e| match e {
                CredentialError::Update(_) => {
                    error!(error = ?e, "error updating password");
                    internal("Error updating password")
                }
                _ => {
                    error!(error = ?e, "error fetching user");
                    internal("Error resetting password")
                }
            })?;

    match outcome {
        ResetOutcome::Reset => {
            info!("password reset");
            render(&SuccessView {
                message: "Password Reset Successful!",
                action_message: "Your password has been reset. You can now log in with the new password.",
                message_type: MESSAGE_SUCCESS,
            })
        }
        ResetOutcome::EmailNotFound => {
            warn!("password reset for unknown email");
            render(&ForgotPasswordView {
                error: Some(EMAIL_NOT_FOUND),
                message_type: MESSAGE_ERROR,
            })
        }
    }
}
