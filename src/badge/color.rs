//! Badge color names and CSS color parsing.

/// Default label (left side) background.
pub const DEFAULT_LABEL_COLOR: &str = "#555";

/// Color of error badges.
pub const ERROR_COLOR: &str = "critical";

/// Brightness above which text switches to dark.
const BRIGHTNESS_THRESHOLD: f64 = 0.69;

/// Named colors of the badge palette, resolved before CSS keywords.
const PALETTE: &[(&str, &str)] = &[
    ("brightgreen", "#4c1"),
    ("green", "#97ca00"),
    ("yellow", "#dfb317"),
    ("yellowgreen", "#a4a61d"),
    ("orange", "#fe7d37"),
    ("red", "#e05d44"),
    ("blue", "#007ec6"),
    ("grey", "#555"),
    ("lightgrey", "#9f9f9f"),
];

const ALIASES: &[(&str, &str)] = &[
    ("gray", "grey"),
    ("lightgray", "lightgrey"),
    ("critical", "red"),
    ("important", "orange"),
    ("success", "brightgreen"),
    ("informational", "blue"),
    ("inactive", "lightgrey"),
];

#[rustfmt::skip]
const CSS_KEYWORDS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]), ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]), ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]), ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]), ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]), ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]), ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]), ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]), ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]), ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]), ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]), ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]), ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]), ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]), ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]), ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]), ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]), ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]), ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]), ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]), ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]), ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]), ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]), ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]), ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]), ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]), ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]), ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]), ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]), ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]), ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]), ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]), ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]), ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]), ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]), ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]), ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]), ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]), ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]), ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]), ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]), ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]), ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]), ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]), ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]), ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]), ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]), ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]), ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]), ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]), ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]), ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]), ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]), ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]), ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]), ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]), ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]), ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]), ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]), ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]), ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]), ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]), ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]), ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]), ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]), ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]), ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]), ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]), ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]), ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]), ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]), ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]), ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]), ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]), ("yellowgreen", [154, 205, 50]),
];

/// Resolves a user or built-in color into an SVG fill value.
///
/// Accepts palette names and their aliases, 3/4/6/8-digit hex with or
/// without `#`, CSS color keywords and `rgb()`/`rgba()`/`hsl()`/`hsla()`.
/// Returns `None` for anything else.
pub fn to_svg_color(input: &str) -> Option<String> {
    let color = input.trim().to_ascii_lowercase();
    if color.is_empty() {
        return None;
    }

    let name = ALIASES
        .iter()
        .find(|(alias, _)| *alias == color)
        .map_or(color.as_str(), |(_, target)| target);
    if let Some((_, hex)) = PALETTE.iter().find(|(n, _)| *n == name) {
        return Some((*hex).to_string());
    }

    let digits = color.strip_prefix('#').unwrap_or(&color);
    if is_hex_color(digits) {
        return Some(format!("#{digits}"));
    }

    if keyword_rgb(&color).is_some() {
        return Some(color);
    }

    if parse_functional(&color).is_some() {
        return Some(color.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    None
}

/// Color for a TPS reading.
pub fn tps_color(tps: f64) -> &'static str {
    if tps >= 19.0 {
        "brightgreen"
    } else if tps >= 15.0 {
        "yellow"
    } else if tps >= 10.0 {
        "orange"
    } else {
        "red"
    }
}

/// Text and shadow colors readable on `background` (an SVG fill value).
///
/// Unknown colors count as dark.
pub fn text_colors(background: &str) -> (&'static str, &'static str) {
    if brightness(background) > BRIGHTNESS_THRESHOLD {
        ("#333", "#ccc")
    } else {
        ("#fff", "#010101")
    }
}

/// Perceived brightness in `0.0..=1.0`.
fn brightness(color: &str) -> f64 {
    let Some([r, g, b]) = to_rgb(color) else {
        return 0.0;
    };
    (f64::from(r) * 299.0 + f64::from(g) * 587.0 + f64::from(b) * 114.0) / 255_000.0
}

fn to_rgb(color: &str) -> Option<[u8; 3]> {
    if let Some(digits) = color.strip_prefix('#') {
        return hex_rgb(digits);
    }
    keyword_rgb(color).or_else(|| parse_functional(color))
}

fn is_hex_color(digits: &str) -> bool {
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

fn hex_rgb(digits: &str) -> Option<[u8; 3]> {
    if !is_hex_color(digits) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match digits.len() {
        3 | 4 => Some([nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17]),
        _ => Some([byte(0)?, byte(2)?, byte(4)?]),
    }
}

fn keyword_rgb(name: &str) -> Option<[u8; 3]> {
    CSS_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == name)
        .map(|(_, rgb)| *rgb)
}

/// Parses `rgb()`, `rgba()`, `hsl()` and `hsla()` into RGB.
fn parse_functional(color: &str) -> Option<[u8; 3]> {
    let open = color.find('(')?;
    let inner = color.get(open + 1..)?.strip_suffix(')')?;
    let func = color[..open].trim();

    let args: Vec<&str> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    let alpha_ok = |args: &[&str]| {
        args.get(3)
            .is_none_or(|a| parse_component(a, 1.0).is_some())
    };

    match (func, args.len()) {
        ("rgb" | "rgba", 3 | 4) if alpha_ok(&args) => {
            let mut rgb = [0u8; 3];
            for (slot, arg) in rgb.iter_mut().zip(&args) {
                *slot = parse_component(arg, 255.0)?.clamp(0.0, 255.0).round() as u8;
            }
            Some(rgb)
        },
        ("hsl" | "hsla", 3 | 4) if alpha_ok(&args) => {
            let hue = args[0].strip_suffix("deg").unwrap_or(args[0]).parse::<f64>().ok()?;
            let sat = args[1].strip_suffix('%')?.parse::<f64>().ok()? / 100.0;
            let light = args[2].strip_suffix('%')?.parse::<f64>().ok()? / 100.0;
            Some(hsl_to_rgb(hue, sat.clamp(0.0, 1.0), light.clamp(0.0, 1.0)))
        },
        _ => None,
    }
}

/// A number, or a percentage of `full`.
fn parse_component(arg: &str, full: f64) -> Option<f64> {
    let value = match arg.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? / 100.0 * full,
        None => arg.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

fn hsl_to_rgb(hue: f64, sat: f64, light: f64) -> [u8; 3] {
    let chroma = (1.0 - (2.0 * light - 1.0).abs()) * sat;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = light - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).clamp(0.0, 255.0).round() as u8;
    [channel(r), channel(g), channel(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_and_aliases() {
        assert_eq!(to_svg_color("brightgreen").as_deref(), Some("#4c1"));
        assert_eq!(to_svg_color("success").as_deref(), Some("#4c1"));
        assert_eq!(to_svg_color("critical").as_deref(), Some("#e05d44"));
        assert_eq!(to_svg_color("informational").as_deref(), Some("#007ec6"));
        assert_eq!(to_svg_color("lightgray").as_deref(), Some("#9f9f9f"));
        assert_eq!(to_svg_color("Blue").as_deref(), Some("#007ec6"));
    }

    #[test]
    fn test_hex_with_and_without_hash() {
        assert_eq!(to_svg_color("ff0000").as_deref(), Some("#ff0000"));
        assert_eq!(to_svg_color("#ABC").as_deref(), Some("#abc"));
        assert_eq!(to_svg_color("#11223344").as_deref(), Some("#11223344"));
        assert_eq!(to_svg_color("#12345"), None);
    }

    #[test]
    fn test_css_keywords_and_functions() {
        assert_eq!(to_svg_color("blueviolet").as_deref(), Some("blueviolet"));
        assert_eq!(
            to_svg_color("rgb(10, 20, 30)").as_deref(),
            Some("rgb(10, 20, 30)")
        );
        assert!(to_svg_color("hsla(120, 50%, 50%, 0.5)").is_some());
        assert!(to_svg_color("rgb(1,2)").is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        for bad in ["", "   ", "notacolor", "url(#x)", "rgb(a,b,c)", "#ggg"] {
            assert_eq!(to_svg_color(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn test_tps_tiers() {
        assert_eq!(tps_color(20.0), "brightgreen");
        assert_eq!(tps_color(19.0), "brightgreen");
        assert_eq!(tps_color(18.9), "yellow");
        assert_eq!(tps_color(15.0), "yellow");
        assert_eq!(tps_color(14.9), "orange");
        assert_eq!(tps_color(10.0), "orange");
        assert_eq!(tps_color(9.9), "red");
    }

    #[test]
    fn test_text_contrast() {
        assert_eq!(text_colors("#fff").0, "#333");
        assert_eq!(text_colors("yellow").0, "#333");
        assert_eq!(text_colors("#555").0, "#fff");
        assert_eq!(text_colors("#4c1").0, "#fff");
        assert_eq!(text_colors("hsl(0, 0%, 100%)").0, "#333");
    }
}
