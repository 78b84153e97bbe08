//! Browser fetch plumbing (wasm32 only)
//!
//! Thin wrappers over `web_sys` fetch that return response bodies as text;
//! parsing stays in `types.rs` where it is natively testable.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::ApiError;

fn js_err(context: &str, value: JsValue) -> ApiError {
    let detail = value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"));
    ApiError::Network(format!("{context}: {detail}"))
}

fn build_request(
    url: &str,
    method: &str,
    body: Option<&str>,
    token: Option<&str>,
) -> Result<Request, ApiError> {
    let init = RequestInit::new();
    init.set_method(method);
    init.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        init.set_body(&JsValue::from_str(body));
    }

    let request =
        Request::new_with_str_and_init(url, &init).map_err(|e| js_err("build request", e))?;
    let headers = request.headers();
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| js_err("set header", e))?;
    if let Some(token) = token {
        headers
            .set("Authorization", &format!("Bearer {token}"))
            .map_err(|e| js_err("set header", e))?;
    }
    Ok(request)
}

async fn run(request: Request) -> Result<String, ApiError> {
    let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| js_err("fetch", e))?;
    let response: Response = response
        .dyn_into()
        .map_err(|e| js_err("response cast", e))?;

    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(|e| js_err("read body", e))?)
        .await
        .map_err(|e| js_err("read body", e))?;
    text.as_string()
        .ok_or_else(|| ApiError::Network("non-text response body".into()))
}

/// GET a JSON endpoint, returning the raw body text
pub async fn get_text(url: &str, token: Option<&str>) -> Result<String, ApiError> {
    run(build_request(url, "GET", None, token)?).await
}

/// POST a JSON body, returning the raw response body text
pub async fn post_text(url: &str, body: &str, token: Option<&str>) -> Result<String, ApiError> {
    run(build_request(url, "POST", Some(body), token)?).await
}
