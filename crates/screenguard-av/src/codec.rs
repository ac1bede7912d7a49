//! Codec identifier normalization.
//!
//! Probing tools and encoders report the same compression format under
//! several names (`avc1` from the container sample entry, `libx264` from the
//! encoder tag). Comparisons against the configured requirement use the
//! canonical token returned by [`normalize_codec`].

/// Canonical token for H.264 / AVC.
pub const H264: &str = "h264";

/// Identifiers that all denote H.264.
const H264_ALIASES: [&str; 4] = ["h264", "libx264", "avc1", "x264"];

/// Normalize a codec identifier to its canonical, lower-cased form.
///
/// Known H.264 aliases collapse to [`H264`]; anything else is returned
/// trimmed and lower-cased.
///
/// # Example
///
/// ```
/// use screenguard_av::normalize_codec;
///
/// assert_eq!(normalize_codec(" AVC1 "), "h264");
/// assert_eq!(normalize_codec("HEVC"), "hevc");
/// ```
pub fn normalize_codec(codec_name: &str) -> String {
    let codec = codec_name.trim().to_lowercase();

    if H264_ALIASES.contains(&codec.as_str()) {
        return H264.to_string();
    }

    codec
}
