//! Route labels for request spans.

/// Collapse numeric path segments so log fields stay low-cardinality.
///
/// `/products/42` becomes `/products/{id}`.
pub(super) fn request_route(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut route = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            route.push('/');
        }

        if !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_digit()) {
            route.push_str("{id}");
        } else {
            route.push_str(segment);
        }
    }

    route
}
