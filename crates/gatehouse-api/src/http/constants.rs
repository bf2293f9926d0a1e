//! Shared HTTP constants (headers, problem URIs).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const PROBLEM_INTERNAL: &str = "https://gatehouse.dev/problems/internal";
pub(crate) const PROBLEM_UNAUTHORIZED: &str = "https://gatehouse.dev/problems/unauthorized";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://gatehouse.dev/problems/bad-request";
pub(crate) const PROBLEM_NOT_FOUND: &str = "https://gatehouse.dev/problems/not-found";
pub(crate) const PROBLEM_METHOD_NOT_ALLOWED: &str =
    "https://gatehouse.dev/problems/method-not-allowed";
pub(crate) const PROBLEM_PAYLOAD_TOO_LARGE: &str =
    "https://gatehouse.dev/problems/payload-too-large";
pub(crate) const PROBLEM_UNSUPPORTED_MEDIA_TYPE: &str =
    "https://gatehouse.dev/problems/unsupported-media-type";

pub(crate) const CONTENT_TYPE_PROMETHEUS: &str = "text/plain; version=0.0.4";
