//! Storage paths for uploaded files.
//!
//! Uploaded images are written below `<storage_root>/public/images/`. The
//! database keeps the path relative to the storage root
//! (`public/images/<name>`), and both binaries serve `<storage_root>/public`
//! under [`PUBLIC_URL_PREFIX`].

/// Directory, relative to the storage root, holding product images.
pub const IMAGE_DIRECTORY: &str = "public/images";

/// URL prefix under which `<storage_root>/public` is served.
pub const PUBLIC_URL_PREFIX: &str = "/storage";

/// Public URL for a stored path.
///
/// ```
/// use apola_core::storage::public_url;
///
/// assert_eq!(public_url("public/images/a.jpg"), "/storage/images/a.jpg");
/// ```
#[must_use]
pub fn public_url(stored_path: &str) -> String {
    let relative = stored_path.trim_start_matches('/');
    let relative = relative.strip_prefix("public/").unwrap_or(relative);
    format!("{PUBLIC_URL_PREFIX}/{relative}")
}

/// File extension for an accepted image content type.
///
/// Only raster formats browsers render inertly are accepted; anything else,
/// SVG and HTML included, yields `None`. Parameters after `;` are ignored.
///
/// ```
/// use apola_core::storage::extension_for;
///
/// assert_eq!(extension_for("image/jpeg"), Some("jpg"));
/// assert_eq!(extension_for("text/html"), None);
/// ```
#[must_use]
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or(content_type).trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/avif" => Some("avif"),
        _ => None,
    }
}

/// Stored path for an image named `stem` with extension `ext`.
#[must_use]
pub fn image_path(stem: &str, ext: &str) -> String {
    format!("{IMAGE_DIRECTORY}/{stem}.{ext}")
}

/// Whether `stored_path` is a plain file directly inside [`IMAGE_DIRECTORY`].
///
/// Paths read back from the database are checked before any file operation
/// so that a tampered row cannot point outside the image directory.
#[must_use]
pub fn is_image_path(stored_path: &str) -> bool {
    stored_path
        .strip_prefix(IMAGE_DIRECTORY)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|name| {
            !name.is_empty()
                && !name.starts_with('.')
                && name
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        })
}
