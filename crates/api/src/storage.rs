//! Local-disk blob storage with public URLs.
//!
//! Uploads land under `<storage_root>/<user_id>/<uuid>.<ext>` and are served
//! back at `/files/{user_id}/{name}`. Names are server-generated UUIDs, so
//! the public URLs are unguessable; the serving handler re-validates names
//! to keep path traversal out.

use std::path::{Path, PathBuf};

use countersign_core::types::DbId;
use uuid::Uuid;

use crate::config::ServerConfig;

/// File extensions accepted by the upload endpoint.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "webp"];

/// Extract and validate the lowercase extension from an uploaded filename.
pub fn validate_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

/// Generate a fresh stored-object name for an upload.
pub fn stored_name(ext: &str) -> String {
    format!("{}.{ext}", Uuid::new_v4())
}

/// Public URL for a stored object.
pub fn public_url(config: &ServerConfig, user_id: DbId, name: &str) -> String {
    format!("{}/files/{user_id}/{name}", config.public_base_url)
}

/// Absolute disk path for a stored object, or `None` when `name` is not a
/// plain single-segment filename (traversal attempts read as missing files).
pub fn resolve_path(config: &ServerConfig, user_id: DbId, name: &str) -> Option<PathBuf> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
    {
        return None;
    }
    Some(config.storage_root.join(user_id.to_string()).join(name))
}

/// Write an uploaded blob to disk, creating the per-user directory on first
/// use. Returns the stored path.
pub async fn save(
    config: &ServerConfig,
    user_id: DbId,
    name: &str,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    let dir = config.storage_root.join(user_id.to_string());
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Content type for a stored object, by extension.
pub fn content_type_for(name: &str) -> &'static str {
    match Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// If `url` points at this server's own `/files/` tree, return the local
/// `(user_id, name)` pair so callers can read from disk instead of looping
/// through HTTP.
pub fn local_candidate(config: &ServerConfig, url: &str) -> Option<(DbId, String)> {
    let rest = url.strip_prefix(&config.public_base_url)?;
    let rest = rest.strip_prefix("/files/")?;
    let (user_id, name) = rest.split_once('/')?;
    let user_id: DbId = user_id.parse().ok()?;
    if resolve_path(config, user_id, name).is_none() {
        return None;
    }
    Some((user_id, name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtConfig;

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            public_base_url: "http://localhost:3000".to_string(),
            storage_root: PathBuf::from("/tmp/countersign-test"),
            max_upload_bytes: 1024,
            jwt: JwtConfig {
                secret: "test".to_string(),
                access_token_expiry_mins: 15,
                refresh_token_expiry_days: 7,
            },
            ads: None,
            payments_webhook_secret: None,
        }
    }

    #[test]
    fn extension_allowlist() {
        assert_eq!(validate_extension("scan.PDF"), Some("pdf".to_string()));
        assert_eq!(validate_extension("sig.png"), Some("png".to_string()));
        assert_eq!(validate_extension("run.exe"), None);
        assert_eq!(validate_extension("noext"), None);
    }

    #[test]
    fn traversal_names_are_rejected() {
        let config = test_config();
        assert!(resolve_path(&config, 1, "../secrets").is_none());
        assert!(resolve_path(&config, 1, "a/b.png").is_none());
        assert!(resolve_path(&config, 1, ".hidden").is_none());
        assert!(resolve_path(&config, 1, "").is_none());
        assert!(resolve_path(&config, 1, "ok.png").is_some());
    }

    #[test]
    fn local_candidate_round_trip() {
        let config = test_config();
        let url = public_url(&config, 7, "doc.pdf");
        assert_eq!(local_candidate(&config, &url), Some((7, "doc.pdf".to_string())));
        assert!(local_candidate(&config, "https://elsewhere.example/x.pdf").is_none());
        assert!(local_candidate(&config, "http://localhost:3000/files/7/../../etc").is_none());
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("a.pdf"), "application/pdf");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }
}
