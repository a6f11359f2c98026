use axum::{
    body::Body,
    http::{StatusCode, header::LOCATION},
    response::Response,
};

/// The value of `header_name`, failing the test if it is missing.
#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let Some(value) = response.headers().get(header_name) else {
        panic!("Response has no {header_name} header");
    };

    value
        .to_str()
        .unwrap_or_else(|error| panic!("The {header_name} header is not text: {error}"))
        .to_owned()
}

/// Check that an HTMX endpoint sends the client on to `endpoint`.
#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}

/// Check that a plain page request is answered with "303 See Other" to `endpoint`.
#[track_caller]
pub(crate) fn assert_see_other(response: &Response<Body>, endpoint: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(get_header(response, LOCATION.as_str()), endpoint);
}
