//! Object key conventions for derived artifacts.
//!
//! Downstream consumers look artifacts up by these names, so the output must
//! stay stable: `video.mp4` becomes `video-full-hd.mp4` and
//! `video_thumbnail.jpg`. Only the last path segment is inspected, so a
//! dotted prefix such as `uploads.v2/clip` is left alone.

const FULL_HD_MARKER: &str = "-full-hd";
const THUMBNAIL_SUFFIX: &str = "_thumbnail.jpg";

/// Splits `name` at the final `.` of its last path segment.
fn split_extension(name: &str) -> (&str, &str) {
    let segment_start = name.rfind('/').map_or(0, |i| i + 1);
    match name[segment_start..].rfind('.') {
        Some(dot) => name.split_at(segment_start + dot),
        None => (name, ""),
    }
}

/// `video.mp4` -> `video-full-hd.mp4`, `videofile` -> `videofile-full-hd`.
pub fn full_hd_name(name: &str) -> String {
    let (stem, ext) = split_extension(name);
    format!("{stem}{FULL_HD_MARKER}{ext}")
}

/// `video.mp4` -> `video_thumbnail.jpg`. The whole extension is dropped,
/// whatever its length.
pub fn thumbnail_name(name: &str) -> String {
    let (stem, _) = split_extension(name);
    format!("{stem}{THUMBNAIL_SUFFIX}")
}

/// Last path segment of an object key, used as the local file name.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
