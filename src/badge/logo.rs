//! Badge logos.
//!
//! Named logos are looked up through a [`LogoResolver`] and drawn as a
//! single-path 24x24 icon. Inline logos arrive as base64 from the caller.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::svg::escape_xml;

/// Default logo width in pixels.
pub const DEFAULT_LOGO_WIDTH: u32 = 14;

/// Fill for named logos when the caller gives no `logoColor`.
pub const DEFAULT_LOGO_COLOR: &str = "whitesmoke";

/// Looks up named logos.
pub trait LogoResolver: Send + Sync {
    /// Returns the path data (`d` attribute) of a 24x24 icon, or `None` if
    /// the name is unknown.
    fn resolve(&self, name: &str) -> Option<String>;
}

/// The icon set shipped with pulse.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinIcons;

#[rustfmt::skip]
const BUILTIN: &[(&str, &str)] = &[
    ("server", "M3 3h18v7H3zm0 11h18v7H3zM6 5.5v2h2v-2zm0 11v2h2v-2z"),
    ("pulse", "M2 12h5l2-6 4 12 3-9 2 3h4v2h-5.2L16 12.4l-3 9L9 9.6 8.4 14H2z"),
    ("check", "M9 16.2 4.8 12l-1.4 1.4L9 19 21 7l-1.4-1.4z"),
    ("cube", "M12 2 3 7v10l9 5 9-5V7zm0 2.3L18.7 8 12 11.7 5.3 8zM5 9.7l6 3.3v6.6l-6-3.3zm8 9.9V13l6-3.3v6.6z"),
    ("users", "M9 11a4 4 0 1 0 0-8 4 4 0 0 0 0 8zm8 0a3 3 0 1 0 0-6 3 3 0 0 0 0 6zM1 21c0-4 3.6-7 8-7s8 3 8 7zm17 0c0-2.2-.8-4.2-2.2-5.7A6 6 0 0 1 23 21z"),
    ("clock", "M12 2a10 10 0 1 0 0 20 10 10 0 0 0 0-20zm0 2a8 8 0 1 1 0 16 8 8 0 0 1 0-16zm-1 3v6l5 3 1-1.7-4-2.4V7z"),
];

impl LogoResolver for BuiltinIcons {
    fn resolve(&self, name: &str) -> Option<String> {
        let name = name.trim().to_ascii_lowercase();
        BUILTIN
            .iter()
            .find(|(icon, _)| *icon == name)
            .map(|(_, path)| (*path).to_string())
    }
}

/// Wraps icon path data in an SVG document and returns it as a data URI.
pub fn named_logo_data_uri(path: &str, fill: &str) -> String {
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="{}" d="{}"/></svg>"#,
        escape_xml(fill),
        escape_xml(path)
    );
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Turns a caller-supplied `logoBase64` value into a data URI.
///
/// Accepts a complete `data:image/...` URI or bare base64 of an SVG
/// document. Query decoding turns `+` into a space, so spaces are mapped
/// back. Returns `None` when the value isn't usable.
pub fn inline_logo_data_uri(raw: &str) -> Option<String> {
    let raw = raw.trim().replace(' ', "+");
    if raw.is_empty() {
        return None;
    }

    if let Some(rest) = raw.strip_prefix("data:") {
        let (media, payload) = rest.split_once(";base64,")?;
        if !media.starts_with("image/") || STANDARD.decode(payload).is_err() {
            return None;
        }
        return Some(raw);
    }

    STANDARD.decode(&raw).ok()?;
    Some(format!("data:image/svg+xml;base64,{raw}"))
}
