//! Per-request path classification.
//!
//! Only the leading path segment is inspected. Everything after it, including
//! the query string, is carried over byte for byte.

use crate::registry::{HashRegistry, hashed_segment};

/// Outcome of classifying a request path against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Unhashed immutable dataset name; redirect to `location`.
    Redirect { dataset: String, location: String },
    /// Current hashed form; serve `path` (segment stripped back to the
    /// dataset name) and attach the long-lived cache header.
    Hashed { dataset: String, path: String },
    /// Not ours. Leave the request alone.
    Passthrough,
}

/// Classify a path (with optional `?query`) against the registry.
pub fn classify(path_and_query: &str, registry: &HashRegistry) -> Rewrite {
    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_and_query, None),
    };

    let Some(trimmed) = path.strip_prefix('/') else {
        return Rewrite::Passthrough;
    };
    let (segment, rest) = match trimmed.find('/') {
        Some(idx) => trimmed.split_at(idx),
        None => (trimmed, ""),
    };
    if segment.is_empty() {
        return Rewrite::Passthrough;
    }

    if let Some(token) = registry.hash_for(segment) {
        return Rewrite::Redirect {
            dataset: segment.to_string(),
            location: rebuild(&hashed_segment(segment, token), rest, query),
        };
    }

    if let Some(dataset) = registry.resolve_hashed(segment) {
        return Rewrite::Hashed {
            dataset: dataset.to_string(),
            path: rebuild(dataset, rest, query),
        };
    }

    Rewrite::Passthrough
}

fn rebuild(segment: &str, rest: &str, query: Option<&str>) -> String {
    let mut out = String::with_capacity(1 + segment.len() + rest.len() + 16);
    out.push('/');
    out.push_str(segment);
    out.push_str(rest);
    if let Some(query) = query {
        out.push('?');
        out.push_str(query);
    }
    out
}
