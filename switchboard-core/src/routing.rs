// Route pattern matching and installation-order rules

use std::collections::HashMap;

/// Marker that makes a path segment a parameter (`/users/:id`)
pub const PARAM_MARKER: char = ':';

/// A registered route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    pattern: String,
}

impl RoutePattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// True when the pattern contains a parameter marker
    pub fn is_parameterized(&self) -> bool {
        self.pattern.contains(PARAM_MARKER)
    }

    /// Match a request path against this pattern, extracting parameters
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        match_path(&self.pattern, path)
    }
}

/// Match a route path pattern against a request path
/// Returns Some(params) if matched, None otherwise
pub fn match_path(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();

    for (pattern_part, path_part) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(param_name) = pattern_part.strip_prefix(PARAM_MARKER) {
            params.insert(param_name.to_string(), path_part.to_string());
        } else if pattern_part != path_part {
            return None;
        }
    }

    Some(params)
}

/// Parse a query string into a map of parameters
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let mut split = part.splitn(2, '=');
            let key = split.next()?;
            let value = split.next().unwrap_or("");
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Compute the order route patterns are installed in.
///
/// Literal paths (no parameter marker) come first, then parameterized paths;
/// within each group the paths are sorted in reverse string order. The
/// tie-break is plain string comparison, not segment length, so `/foo/:id`
/// lands before `/:bar` purely by byte order.
pub fn install_order(paths: &[String]) -> Vec<String> {
    let (mut literal, mut parameterized): (Vec<String>, Vec<String>) = paths
        .iter()
        .cloned()
        .partition(|p| !p.contains(PARAM_MARKER));

    literal.sort_unstable_by(|a, b| b.cmp(a));
    parameterized.sort_unstable_by(|a, b| b.cmp(a));

    literal.append(&mut parameterized);
    literal
}
