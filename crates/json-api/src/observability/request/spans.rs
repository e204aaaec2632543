//! Route labels for spans and metrics.

use uuid::Uuid;

/// Replace identifier segments so every order, product or user maps to one label.
///
/// `/orders/0195.../pay` becomes `/orders/{id}/pay`.
pub(super) fn route_label(path: &str) -> String {
    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}
