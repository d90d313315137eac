use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;

/// Deserializes the body as JSON when `Content-Type` says so, otherwise as
/// an urlencoded form.
pub struct FormOrJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.trim_start().starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(body) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(body))
        } else {
            let Form(body) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(body))
        }
    }
}
