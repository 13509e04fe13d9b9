use axum::http::{ HeaderValue, request::Parts };
use tower_http::cors::{ AllowHeaders, AllowMethods, AllowOrigin, CorsLayer };

/// Origin allow-list entry. A single `*` matches any (possibly empty) run of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPattern {
    Exact(String),
    Wildcard { prefix: String, suffix: String },
}

impl OriginPattern {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().trim_end_matches('/');
        if raw.is_empty() {
            return None;
        }
        match raw.split_once('*') {
            Some((prefix, suffix)) => Some(OriginPattern::Wildcard {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }),
            None => Some(OriginPattern::Exact(raw.to_string())),
        }
    }

    pub fn matches(&self, origin: &str) -> bool {
        match self {
            OriginPattern::Exact(expected) => expected == origin,
            OriginPattern::Wildcard { prefix, suffix } =>
                origin.len() >= prefix.len() + suffix.len() &&
                    origin.starts_with(prefix.as_str()) &&
                    origin.ends_with(suffix.as_str()),
        }
    }
}

pub fn parse_origins(raw: &[String]) -> Vec<OriginPattern> {
    raw.iter().filter_map(|o| OriginPattern::parse(o)).collect()
}

pub fn origin_allowed(patterns: &[OriginPattern], origin: &HeaderValue) -> bool {
    match origin.to_str() {
        Ok(origin) => patterns.iter().any(|p| p.matches(origin)),
        Err(_) => false,
    }
}

/// Credentials are allowed, so methods and headers are mirrored rather than `*`.
pub fn cors_layer(patterns: Vec<OriginPattern>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(
            AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
                origin_allowed(&patterns, origin)
            })
        )
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
