use axum::http::{HeaderValue, Method, header};
use core_config::Environment;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

const CORS_ENV: &str = "CORS_ALLOWED_ORIGIN";

/// CORS for the listed origins with the methods the API exposes.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Allows any origin. Development only.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Parse a comma-separated origin list, ignoring blank entries.
pub fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>().map_err(|e| format!("{s}: {e}")))
        .collect()
}

/// Build the CORS layer from `CORS_ALLOWED_ORIGIN`.
///
/// Unset or empty is permissive in development and an error in production.
pub fn cors_layer_from_env(environment: &Environment) -> io::Result<CorsLayer> {
    let raw = std::env::var(CORS_ENV).unwrap_or_default();
    let origins = parse_origins(&raw).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid {CORS_ENV} value {e}"),
        )
    })?;

    if origins.is_empty() {
        if environment.is_production() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{CORS_ENV} must list at least one origin in production"),
            ));
        }
        warn!("{CORS_ENV} not set, allowing any origin");
        return Ok(create_permissive_cors_layer());
    }

    info!(origins = %raw, "CORS configured");
    Ok(create_cors_layer(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_blanks() {
        let origins = parse_origins(" http://localhost:3000, ,https://hotel.example ").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:3000");
    }

    #[test]
    fn test_parse_origins_rejects_invalid_header() {
        assert!(parse_origins("http://bad\nhost").is_err());
    }

    #[test]
    fn test_unset_is_permissive_in_development() {
        temp_env::with_var_unset(CORS_ENV, || {
            assert!(cors_layer_from_env(&Environment::Development).is_ok());
        });
    }

    #[test]
    fn test_unset_is_an_error_in_production() {
        temp_env::with_var_unset(CORS_ENV, || {
            let err = cors_layer_from_env(&Environment::Production).unwrap_err();
            assert!(err.to_string().contains(CORS_ENV));
        });
    }

    #[test]
    fn test_listed_origins_in_production() {
        temp_env::with_var(CORS_ENV, Some("https://hotel.example"), || {
            assert!(cors_layer_from_env(&Environment::Production).is_ok());
        });
    }
}
