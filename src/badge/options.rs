//! Caller overrides for badge appearance.

use percent_encoding::percent_decode_str;

use super::color::to_svg_color;
use super::logo::{
    DEFAULT_LOGO_COLOR, DEFAULT_LOGO_WIDTH, LogoResolver, inline_logo_data_uri,
    named_logo_data_uri,
};
use super::svg::{BadgeStyle, Logo};
use crate::constants::{DEFAULT_CACHE_SECONDS, MAX_CACHE_SECONDS};

/// Badge overrides as received from the query string. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeOptions {
    pub style: Option<String>,
    pub logo: Option<String>,
    pub logo_base64: Option<String>,
    pub logo_color: Option<String>,
    pub logo_size: Option<String>,
    pub label: Option<String>,
    pub label_color: Option<String>,
    pub color: Option<String>,
    pub cache_seconds: Option<i64>,
    pub link: Option<String>,
}

/// Why a set of overrides can't be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("unknown badge style '{0}'")]
    UnknownStyle(String),
    #[error("{0} is not valid percent-encoded UTF-8")]
    BadEncoding(&'static str),
}

/// Overrides after validation, ready to merge into a badge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoration {
    pub style: BadgeStyle,
    pub logo: Option<Logo>,
    pub link: Option<String>,
    pub label: Option<String>,
    /// SVG fill value.
    pub label_color: Option<String>,
    /// SVG fill value.
    pub color: Option<String>,
}

impl BadgeOptions {
    /// Parses a `cacheSeconds` query value.
    ///
    /// Leading integer digits are taken (`"120s"` is 120); values with no
    /// leading digits are treated as absent.
    pub fn parse_cache_seconds(raw: &str) -> Option<i64> {
        let raw = raw.trim();
        let (negative, digits) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return None;
        }
        let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
        Some(if negative { -value } else { value })
    }

    /// `Cache-Control` value for live and offline badges.
    pub fn cache_control(&self) -> String {
        cache_control(self.cache_seconds)
    }

    /// Validates the overrides.
    ///
    /// Unparseable colors, unknown logo names and bad logo sizes are dropped
    /// silently. An unknown style or a link or label that doesn't decode is
    /// an error.
    pub fn resolve(&self, logos: &dyn LogoResolver) -> Result<Decoration, OptionsError> {
        let style = match self.style.as_deref() {
            None | Some("") => BadgeStyle::default(),
            Some(name) => {
                BadgeStyle::parse(name).ok_or_else(|| OptionsError::UnknownStyle(name.to_string()))?
            },
        };

        let link = self
            .link
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(|l| decode_component(l, "link"))
            .transpose()?;

        let label = self
            .label
            .as_deref()
            .map(|l| decode_component(l, "label"))
            .transpose()?;

        Ok(Decoration {
            style,
            logo: self.logo(logos),
            link,
            label,
            label_color: self.label_color.as_deref().and_then(to_svg_color),
            color: self.color.as_deref().and_then(to_svg_color),
        })
    }

    fn logo(&self, logos: &dyn LogoResolver) -> Option<Logo> {
        let data_uri = match self.logo_base64.as_deref() {
            Some(inline) => inline_logo_data_uri(inline)?,
            None => {
                let path = logos.resolve(self.logo.as_deref()?)?;
                let fill = self
                    .logo_color
                    .as_deref()
                    .and_then(to_svg_color)
                    .unwrap_or_else(|| DEFAULT_LOGO_COLOR.to_string());
                named_logo_data_uri(&path, &fill)
            },
        };
        Some(Logo {
            data_uri,
            width: self.logo_width(),
        })
    }

    /// `auto` or an integer 8..=32; anything else gives the default.
    fn logo_width(&self) -> u32 {
        self.logo_size
            .as_deref()
            .and_then(|size| size.trim().parse::<u32>().ok())
            .filter(|px| (8..=32).contains(px))
            .unwrap_or(DEFAULT_LOGO_WIDTH)
    }
}

/// `public, max-age=<n>` with `n = clamp(seconds ?? 60, 0, 86400)`, or
/// `no-cache` when `n` is 0.
pub fn cache_control(seconds: Option<i64>) -> String {
    match seconds
        .unwrap_or(DEFAULT_CACHE_SECONDS)
        .clamp(0, MAX_CACHE_SECONDS)
    {
        0 => "no-cache".to_string(),
        n => format!("public, max-age={n}"),
    }
}

fn decode_component(raw: &str, field: &'static str) -> Result<String, OptionsError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| OptionsError::BadEncoding(field))
}
