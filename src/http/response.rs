//! Canned responses written by the server.

/// Static page served for every accepted GET.
pub const SUCCESS_BODY: &str =
    "<html><head><title>Test Page</title></head><body>Nothing here</body></html>\r\n";

/// Full `200 Success` response.
pub fn success_response() -> Vec<u8> {
    format!(
        "HTTP/1.1 200 Success\r\n\
         Connection: close\r\n\
         Content-Type: text/html\r\n\
         Content-Length: {}\r\n\
         \r\n\
         {}",
        SUCCESS_BODY.len(),
        SUCCESS_BODY
    )
    .into_bytes()
}

/// Header-only error response carrying `status`.
pub fn error_response(status: u16) -> Vec<u8> {
    format!("HTTP/1.1 {status} Error Occurred\r\n\r\n").into_bytes()
}
