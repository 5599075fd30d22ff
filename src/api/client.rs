use std::time::Duration;

use http::Response;
use ureq::{Agent, Body};

use crate::{api::CallError, prelude::*};

/// Build the blocking agent shared by the API clients.
///
/// Statuses are checked by [`ensure_success`] so that the error keeps the response body.
#[must_use]
pub fn new_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .user_agent(concat!("victron-connector/", env!("CARGO_PKG_VERSION")))
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

pub fn ensure_success(mut response: Response<Body>) -> Result<Response<Body>, CallError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CallError::Status { status, body: read_body(&mut response) })
    }
}

/// Read the body for logging, replacing invalid UTF-8.
pub fn read_body(response: &mut Response<Body>) -> String {
    match response.body_mut().read_to_vec() {
        Ok(body) => String::from_utf8_lossy(&body).into_owned(),
        Err(error) => {
            warn!("failed to read the response body: {error:#}");
            String::new()
        }
    }
}
