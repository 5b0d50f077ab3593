//! SVG badge drawing.
//!
//! Text width is estimated from Verdana 11px advances and rounded up to
//! whole pixels, so the same [`BadgeSpec`] always renders the same bytes.

use super::color::text_colors;

/// Visual badge style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadgeStyle {
    #[default]
    Flat,
    FlatSquare,
    Plastic,
    ForTheBadge,
    Social,
}

impl BadgeStyle {
    /// Parses a `style` query value. Returns `None` for unknown styles.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "flat" => Some(Self::Flat),
            "flat-square" => Some(Self::FlatSquare),
            "plastic" => Some(Self::Plastic),
            "for-the-badge" => Some(Self::ForTheBadge),
            "social" => Some(Self::Social),
            _ => None,
        }
    }
}

/// Image placed before the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    pub data_uri: String,
    pub width: u32,
}

/// Everything needed to draw one badge. Colors are SVG fill values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeSpec {
    pub label: String,
    pub message: String,
    pub color: String,
    pub label_color: String,
    pub style: BadgeStyle,
    pub logo: Option<Logo>,
    pub link: Option<String>,
}

const FONT_FAMILY: &str = "Verdana,Geneva,DejaVu Sans,sans-serif";
const SOCIAL_FONT_FAMILY: &str = "Helvetica Neue,Helvetica,Arial,sans-serif";
const PADDING: u32 = 5;
const LOGO_GAP: u32 = 3;
const LOGO_HEIGHT: u32 = 14;

/// Verdana 11px advance widths for ASCII 0x20..=0x7e.
#[rustfmt::skip]
const ASCII_WIDTHS: [f64; 95] = [
    3.87, 4.33, 5.05, 9.0, 7.0, 11.84, 7.99, 2.95, 4.99, 4.99, 7.0, 9.0, 4.0, 4.99, 4.0, 4.99,
    7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 4.99, 4.99, 9.0, 9.0, 9.0, 6.0,
    11.0, 7.52, 7.54, 7.68, 8.48, 6.96, 6.32, 8.53, 8.27, 4.63, 5.0, 7.62, 6.12, 9.27, 8.23, 8.66,
    6.63, 8.66, 7.65, 7.52, 6.78, 8.05, 7.52, 10.88, 7.54, 6.77, 7.54, 4.99, 4.99, 4.99, 9.0, 7.0,
    7.0, 6.61, 6.83, 5.73, 6.83, 6.55, 3.78, 6.83, 6.96, 3.02, 3.79, 6.5, 3.02, 10.67, 6.96, 6.68,
    6.83, 6.83, 4.69, 5.73, 4.33, 6.96, 6.5, 9.0, 6.5, 6.5, 5.75, 6.98, 4.99, 6.98, 9.0,
];

/// Width used for characters outside the table (that of `m`).
const FALLBACK_WIDTH: f64 = 10.67;

fn char_width(c: char) -> f64 {
    let code = c as usize;
    if (0x20..=0x7e).contains(&code) {
        ASCII_WIDTHS[code - 0x20]
    } else {
        FALLBACK_WIDTH
    }
}

fn raw_width(text: &str) -> f64 {
    text.chars().map(char_width).sum()
}

/// Estimated rendered width of `text` in whole pixels.
pub fn text_width(text: &str) -> u32 {
    raw_width(text).ceil() as u32
}

/// Escapes text for use in element content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders a badge to an SVG document.
pub fn render(spec: &BadgeSpec) -> String {
    match spec.style {
        BadgeStyle::Flat | BadgeStyle::FlatSquare | BadgeStyle::Plastic => classic(spec),
        BadgeStyle::ForTheBadge => for_the_badge(spec),
        BadgeStyle::Social => social(spec),
    }
}

fn title(label: &str, message: &str) -> String {
    if label.is_empty() {
        escape_xml(message)
    } else {
        escape_xml(&format!("{label}: {message}"))
    }
}

fn document(width: u32, height: u32, title: &str, body: &str, link: Option<&str>) -> String {
    let body = match link {
        Some(href) => format!(
            r#"<a target="_blank" xlink:href="{}">{body}</a>"#,
            escape_xml(href)
        ),
        None => body.to_string(),
    };
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" role="img" aria-label="{title}"><title>{title}</title>{body}</svg>"#
    )
}

fn logo_image(logo: Option<&Logo>, x: u32, height: u32) -> String {
    logo.map_or_else(String::new, |logo| {
        format!(
            r#"<image x="{x}" y="{}" width="{}" height="{LOGO_HEIGHT}" xlink:href="{}"/>"#,
            height.saturating_sub(LOGO_HEIGHT) / 2,
            logo.width,
            escape_xml(&logo.data_uri)
        )
    })
}

/// Label and message box widths for the left/right layouts.
struct Layout {
    left: u32,
    right: u32,
    label_width: u32,
    message_width: u32,
    /// Offset of the label text from the left edge.
    label_offset: u32,
}

impl Layout {
    fn new(spec: &BadgeSpec, label_width: u32, message_width: u32, padding: u32) -> Self {
        let logo_width = spec.logo.as_ref().map_or(0, |l| l.width);
        let has_label = !spec.label.is_empty();
        let gap = if spec.logo.is_some() && has_label {
            LOGO_GAP
        } else {
            0
        };
        let left = if has_label || spec.logo.is_some() {
            label_width + 2 * padding + logo_width + gap
        } else {
            0
        };
        Self {
            left,
            right: message_width + 2 * padding,
            label_width,
            message_width,
            label_offset: padding + logo_width + gap,
        }
    }

    fn total(&self) -> u32 {
        self.left + self.right
    }

    /// Label text center in tenths of a pixel.
    fn label_x(&self) -> u32 {
        self.label_offset * 10 + self.label_width * 5
    }

    /// Message text center in tenths of a pixel.
    fn message_x(&self) -> u32 {
        self.left * 10 + self.right * 5
    }
}

fn shadowed_text(text: &str, x: u32, y: u32, width: u32, fill: &str, shadow: Option<&str>) -> String {
    let text = escape_xml(text);
    let length = width * 10;
    let shadow = shadow.map_or_else(String::new, |shadow| {
        format!(
            r#"<text aria-hidden="true" x="{x}" y="{}" fill="{shadow}" fill-opacity=".3" transform="scale(.1)" textLength="{length}">{text}</text>"#,
            y + 10
        )
    });
    format!(
        r#"{shadow}<text x="{x}" y="{y}" transform="scale(.1)" fill="{fill}" textLength="{length}">{text}</text>"#
    )
}

/// `flat`, `flat-square` and `plastic`.
fn classic(spec: &BadgeSpec) -> String {
    let layout = Layout::new(
        spec,
        text_width(&spec.label),
        text_width(&spec.message),
        PADDING,
    );
    let total = layout.total();
    let (height, text_y) = match spec.style {
        BadgeStyle::Plastic => (18, 130),
        _ => (20, 140),
    };
    let label_color = escape_xml(&spec.label_color);
    let color = escape_xml(&spec.color);
    let (label_fg, label_shadow) = text_colors(&spec.label_color);
    let (message_fg, message_shadow) = text_colors(&spec.color);

    let shapes = format!(
        r#"<rect width="{}" height="{height}" fill="{label_color}"/><rect x="{}" width="{}" height="{height}" fill="{color}"/>"#,
        layout.left, layout.left, layout.right
    );
    let background = match spec.style {
        BadgeStyle::FlatSquare => format!(r#"<g shape-rendering="crispEdges">{shapes}</g>"#),
        BadgeStyle::Plastic => format!(
            r##"<linearGradient id="s" x2="0" y2="100%"><stop offset="0" stop-color="#fff" stop-opacity=".7"/><stop offset=".1" stop-color="#aaa" stop-opacity=".1"/><stop offset=".9" stop-opacity=".3"/><stop offset="1" stop-opacity=".5"/></linearGradient><clipPath id="r"><rect width="{total}" height="{height}" rx="4" fill="#fff"/></clipPath><g clip-path="url(#r)">{shapes}<rect width="{total}" height="{height}" fill="url(#s)"/></g>"##
        ),
        _ => format!(
            r##"<linearGradient id="s" x2="0" y2="100%"><stop offset="0" stop-color="#bbb" stop-opacity=".1"/><stop offset="1" stop-opacity=".1"/></linearGradient><clipPath id="r"><rect width="{total}" height="{height}" rx="3" fill="#fff"/></clipPath><g clip-path="url(#r)">{shapes}<rect width="{total}" height="{height}" fill="url(#s)"/></g>"##
        ),
    };

    let shadows = spec.style != BadgeStyle::FlatSquare;
    let label_text = if spec.label.is_empty() {
        String::new()
    } else {
        shadowed_text(
            &spec.label,
            layout.label_x(),
            text_y,
            layout.label_width,
            label_fg,
            shadows.then_some(label_shadow),
        )
    };
    let message_text = shadowed_text(
        &spec.message,
        layout.message_x(),
        text_y,
        layout.message_width,
        message_fg,
        shadows.then_some(message_shadow),
    );

    let body = format!(
        r##"{background}<g fill="#fff" text-anchor="middle" font-family="{FONT_FAMILY}" text-rendering="geometricPrecision" font-size="110">{}{label_text}{message_text}</g>"##,
        logo_image(spec.logo.as_ref(), PADDING, height)
    );
    document(
        total,
        height,
        &title(&spec.label, &spec.message),
        &body,
        spec.link.as_deref(),
    )
}

/// Uppercase width with 1px letter spacing and bold weight.
fn wide_text_width(text: &str) -> u32 {
    (raw_width(text) * 1.1).ceil() as u32 + text.chars().count() as u32
}

fn for_the_badge(spec: &BadgeSpec) -> String {
    const HEIGHT: u32 = 28;
    const WIDE_PADDING: u32 = 9;

    let label = spec.label.to_uppercase();
    let message = spec.message.to_uppercase();
    let layout = Layout::new(
        spec,
        wide_text_width(&label),
        wide_text_width(&message),
        WIDE_PADDING,
    );
    let (label_fg, _) = text_colors(&spec.label_color);
    let (message_fg, _) = text_colors(&spec.color);

    let label_text = if label.is_empty() {
        String::new()
    } else {
        format!(
            r#"<text transform="scale(.1)" x="{}" y="175" textLength="{}" fill="{label_fg}">{}</text>"#,
            layout.label_x(),
            layout.label_width * 10,
            escape_xml(&label)
        )
    };
    let message_text = format!(
        r#"<text transform="scale(.1)" x="{}" y="175" textLength="{}" fill="{message_fg}" font-weight="bold">{}</text>"#,
        layout.message_x(),
        layout.message_width * 10,
        escape_xml(&message)
    );

    let body = format!(
        r##"<g shape-rendering="crispEdges"><rect width="{left}" height="{HEIGHT}" fill="{label_color}"/><rect x="{left}" width="{right}" height="{HEIGHT}" fill="{color}"/></g><g fill="#fff" text-anchor="middle" font-family="{FONT_FAMILY}" text-rendering="geometricPrecision" font-size="100" letter-spacing="10">{logo}{label_text}{message_text}</g>"##,
        left = layout.left,
        right = layout.right,
        label_color = escape_xml(&spec.label_color),
        color = escape_xml(&spec.color),
        logo = logo_image(spec.logo.as_ref(), WIDE_PADDING, HEIGHT),
    );
    document(
        layout.total(),
        HEIGHT,
        &title(&label, &message),
        &body,
        spec.link.as_deref(),
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// GitHub-like white button with a count bubble. Ignores colors.
fn social(spec: &BadgeSpec) -> String {
    const HEIGHT: u32 = 20;
    const BUBBLE_GAP: u32 = 6;

    let label = capitalize(&spec.label);
    let layout = Layout::new(
        spec,
        text_width(&label),
        text_width(&spec.message),
        PADDING,
    );
    let left = layout.left;
    let bubble_x = left + BUBBLE_GAP;
    let total = bubble_x + layout.right;

    let label_text = if label.is_empty() {
        String::new()
    } else {
        shadowed_text(
            &label,
            layout.label_x(),
            140,
            layout.label_width,
            "#333",
            Some("#fff"),
        )
    };
    let message_x = bubble_x * 10 + layout.right * 5;
    let message_text = format!(
        r##"<text aria-hidden="true" x="{message_x}" y="150" fill="#fff" transform="scale(.1)" textLength="{length}" font-weight="400">{text}</text><text x="{message_x}" y="140" transform="scale(.1)" fill="#333" textLength="{length}" font-weight="400">{text}</text>"##,
        length = layout.message_width * 10,
        text = escape_xml(&spec.message)
    );

    let body = format!(
        r##"<linearGradient id="a" x2="0" y2="100%"><stop offset="0" stop-color="#fcfcfc" stop-opacity="0"/><stop offset="1" stop-opacity=".1"/></linearGradient><g stroke="#d5d5d5"><rect stroke="none" fill="#fcfcfc" x=".5" y=".5" width="{label_box}" height="19" rx="2"/><rect x="{bubble_left}.5" y=".5" width="{bubble_box}" height="19" rx="2" fill="#fafafa"/><rect x="{notch_x}" y="7.5" width=".5" height="5" stroke="#fafafa"/><path d="M{bubble_left}.5 6.5l-3 3v1l3 3" stroke="#d5d5d5" fill="#fafafa"/></g><rect stroke="#d5d5d5" fill="url(#a)" x=".5" y=".5" width="{label_box}" height="19" rx="2"/><g fill="#333" text-anchor="middle" font-family="{SOCIAL_FONT_FAMILY}" text-rendering="geometricPrecision" font-weight="700" font-size="110">{logo}{label_text}{message_text}</g>"##,
        label_box = left.saturating_sub(1),
        bubble_left = bubble_x,
        bubble_box = layout.right.saturating_sub(1),
        notch_x = bubble_x.saturating_sub(1),
        logo = logo_image(spec.logo.as_ref(), PADDING, HEIGHT),
    );
    document(
        total,
        HEIGHT,
        &title(&label, &spec.message),
        &body,
        spec.link.as_deref(),
    )
}
