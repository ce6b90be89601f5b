//! MIME type detection module
//!
//! Returns the Content-Type for a media file based on its extension.

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use flv_stream_server::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("flv")), "video/x-flv");
/// assert_eq!(get_content_type(Some("mp4")), "video/mp4");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let lowered = extension.map(str::to_ascii_lowercase);
    match lowered.as_deref() {
        // Video
        Some("flv") => "video/x-flv",
        Some("f4v") => "video/x-f4v",
        Some("mp4" | "m4v") => "video/mp4",
        Some("ts") => "video/mp2t",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("ogv") => "video/ogg",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",

        // Audio
        Some("aac") => "audio/aac",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",
        Some("ogg" | "oga") => "audio/ogg",

        // Playlists
        Some("m3u8") => "application/vnd.apple.mpegurl",

        // Default
        _ => "application/octet-stream",
    }
}
