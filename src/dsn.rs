/// Index used when the DSN has no path.
pub const DEFAULT_INDEX: &str = "logs";

/// Backend location parsed from a DSN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// HTTP base URL of the cluster, e.g. `http://127.0.0.1:9200`.
    pub base_url: String,
    /// Target index name.
    pub index: String,
}

/// Parse a DSN string into a base URL and an index.
///
/// Examples:
/// - "elasticsearch://127.0.0.1:9200/app-logs"
/// - "opensearch://search.internal:9200/audit"
/// - "https://es.example.com/app-logs"
/// - "localhost:9200" (plain HTTP, index `logs`)
///
/// The `elasticsearch://` and `opensearch://` schemes map to plain HTTP;
/// use an `https://` DSN for TLS.
pub fn parse_dsn(dsn: &str) -> Result<BackendConfig, DsnError> {
    let dsn = dsn.trim();
    let lower = dsn.to_ascii_lowercase();

    let (scheme, rest) = match lower.find("://") {
        Some(pos) => (&lower[..pos], &dsn[pos + 3..]),
        None => ("http", dsn),
    };

    let http_scheme = match scheme {
        "elasticsearch" | "opensearch" | "http" => "http",
        "https" => "https",
        _ => return Err(DsnError::UnknownScheme(scheme.to_string())),
    };

    let (authority, path) = match rest.find('/') {
        Some(pos) => (&rest[..pos], rest[pos + 1..].trim_end_matches('/')),
        None => (rest, ""),
    };

    if authority.is_empty() {
        return Err(DsnError::MissingHost);
    }

    let index = match path {
        "" => DEFAULT_INDEX.to_string(),
        p if p.contains('/') => return Err(DsnError::InvalidIndex(p.to_string())),
        p => urlencoding::decode(p)
            .map_err(|_| DsnError::InvalidIndex(p.to_string()))?
            .into_owned(),
    };

    Ok(BackendConfig {
        base_url: format!("{}://{}", http_scheme, authority),
        index,
    })
}

/// Error type returned when parsing a DSN.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DsnError {
    #[error("unknown or unsupported DSN scheme: {0}")]
    UnknownScheme(String),

    #[error("DSN has no host")]
    MissingHost,

    #[error("invalid index name in DSN: {0}")]
    InvalidIndex(String),
}
