//! Destination path joining.
//!
//! Paths use `/` regardless of platform since they name objects on the
//! storage backend, not local files.

/// Join `prefix` and `suffix` and normalize the result.
///
/// Empty segments are skipped, repeated separators collapse, `.` and `..`
/// segments are resolved, and a trailing separator is kept. An empty result is `.`.
pub fn normalized_join(prefix: &str, suffix: &str) -> String {
    let joined = [prefix, suffix]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    normalize(&joined)
}

fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if normalized.is_empty() && !absolute {
        normalized.push('.');
    }
    if !normalized.is_empty() && trailing {
        normalized.push('/');
    }

    if absolute {
        format!("/{}", normalized)
    } else {
        normalized
    }
}
