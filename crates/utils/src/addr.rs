use super::errors::UtilsError;

/// Port assumed when the caller omits one.
pub const DEFAULT_PORT: &str = "25565";

/// Builds the normalized cache key for a host and optional port string.
/// The result is lowercased so `Foo.example` and `foo.example` share one
/// cache entry. No DNS resolution happens here; the port string is passed
/// through untouched so a malformed port surfaces at probe time.
pub fn normalize_address(ip: &str, port: &str) -> Result<String, UtilsError> {
    if ip.is_empty() {
        return Err(UtilsError::MissingInput);
    }

    let port = if port.is_empty() { DEFAULT_PORT } else { port };

    Ok(format!("{}:{}", ip, port).to_lowercase())
}
