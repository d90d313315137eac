use askama::Template;
use axum::{http::StatusCode, response::Html};
use tracing::error;

pub const MESSAGE_SUCCESS: &str = "message-success";
pub const MESSAGE_ERROR: &str = "message-error";

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginView;

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterView;

#[derive(Template)]
#[template(path = "forgot-password.html")]
pub struct ForgotPasswordView<'a> {
    pub error: Option<&'a str>,
    pub message_type: &'a str,
}

impl Default for ForgotPasswordView<'_> {
    fn default() -> Self {
        Self {
            error: None,
            message_type: MESSAGE_SUCCESS,
        }
    }
}

/// Result page shared by every POST route.
#[derive(Template)]
#[template(path = "success.html")]
pub struct SuccessView<'a> {
    pub message: &'a str,
    pub action_message: &'a str,
    pub message_type: &'a str,
}

pub fn render<T: Template>(view: &T) -> Result<Html<String>, (StatusCode, String)> {
    view.render().map(Html).map_err(|e| {
        error!(error = %e, "template render failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error rendering page".to_string(),
        )
    })
}
