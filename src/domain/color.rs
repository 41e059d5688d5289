// Chart colors: palette assignment and lightening
use std::str::FromStr;
use thiserror::Error;

/// Returned by [`lighten`] for colors that cannot be parsed
pub const FALLBACK_GRAY: &str = "#808080";

/// Plotly "Dark24" followed by "Light24"
pub const PALETTE: [&str; 48] = [
    "#2E91E5", "#E15F99", "#1CA71C", "#FB0D0D", "#DA16FF", "#222A2A", "#B68100", "#750D86",
    "#EB663B", "#511CFB", "#00A08B", "#FB00D1", "#FC0080", "#B2828D", "#6C7C32", "#778AAE",
    "#862A16", "#A777F1", "#620042", "#1616A7", "#DA60CA", "#6C4516", "#0D2A63", "#AF0038",
    "#FD3216", "#00FE35", "#6A76FC", "#FED4C4", "#FE00CE", "#0DF9FF", "#F6F926", "#FF9616",
    "#479B55", "#EEA6FB", "#DC587D", "#D626FF", "#6E899C", "#00B5F7", "#B68E00", "#C9FBE5",
    "#FF0092", "#22FFA7", "#E3EE9E", "#86CE00", "#BC7196", "#7E7DCD", "#FC6955", "#E48F72",
];

/// CSS Color Module Level 4 named colors
const NAMED_COLORS: [(&str, &str); 148] = [
    ("aliceblue", "#F0F8FF"),
    ("antiquewhite", "#FAEBD7"),
    ("aqua", "#00FFFF"),
    ("aquamarine", "#7FFFD4"),
    ("azure", "#F0FFFF"),
    ("beige", "#F5F5DC"),
    ("bisque", "#FFE4C4"),
    ("black", "#000000"),
    ("blanchedalmond", "#FFEBCD"),
    ("blue", "#0000FF"),
    ("blueviolet", "#8A2BE2"),
    ("brown", "#A52A2A"),
    ("burlywood", "#DEB887"),
    ("cadetblue", "#5F9EA0"),
    ("chartreuse", "#7FFF00"),
    ("chocolate", "#D2691E"),
    ("coral", "#FF7F50"),
    ("cornflowerblue", "#6495ED"),
    ("cornsilk", "#FFF8DC"),
    ("crimson", "#DC143C"),
    ("cyan", "#00FFFF"),
    ("darkblue", "#00008B"),
    ("darkcyan", "#008B8B"),
    ("darkgoldenrod", "#B8860B"),
    ("darkgray", "#A9A9A9"),
    ("darkgreen", "#006400"),
    ("darkgrey", "#A9A9A9"),
    ("darkkhaki", "#BDB76B"),
    ("darkmagenta", "#8B008B"),
    ("darkolivegreen", "#556B2F"),
    ("darkorange", "#FF8C00"),
    ("darkorchid", "#9932CC"),
    ("darkred", "#8B0000"),
    ("darksalmon", "#E9967A"),
    ("darkseagreen", "#8FBC8F"),
    ("darkslateblue", "#483D8B"),
    ("darkslategray", "#2F4F4F"),
    ("darkslategrey", "#2F4F4F"),
    ("darkturquoise", "#00CED1"),
    ("darkviolet", "#9400D3"),
    ("deeppink", "#FF1493"),
    ("deepskyblue", "#00BFFF"),
    ("dimgray", "#696969"),
    ("dimgrey", "#696969"),
    ("dodgerblue", "#1E90FF"),
    ("firebrick", "#B22222"),
    ("floralwhite", "#FFFAF0"),
    ("forestgreen", "#228B22"),
    ("fuchsia", "#FF00FF"),
    ("gainsboro", "#DCDCDC"),
    ("ghostwhite", "#F8F8FF"),
    ("gold", "#FFD700"),
    ("goldenrod", "#DAA520"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("greenyellow", "#ADFF2F"),
    ("grey", "#808080"),
    ("honeydew", "#F0FFF0"),
    ("hotpink", "#FF69B4"),
    ("indianred", "#CD5C5C"),
    ("indigo", "#4B0082"),
    ("ivory", "#FFFFF0"),
    ("khaki", "#F0E68C"),
    ("lavender", "#E6E6FA"),
    ("lavenderblush", "#FFF0F5"),
    ("lawngreen", "#7CFC00"),
    ("lemonchiffon", "#FFFACD"),
    ("lightblue", "#ADD8E6"),
    ("lightcoral", "#F08080"),
    ("lightcyan", "#E0FFFF"),
    ("lightgoldenrodyellow", "#FAFAD2"),
    ("lightgray", "#D3D3D3"),
    ("lightgreen", "#90EE90"),
    ("lightgrey", "#D3D3D3"),
    ("lightpink", "#FFB6C1"),
    ("lightsalmon", "#FFA07A"),
    ("lightseagreen", "#20B2AA"),
    ("lightskyblue", "#87CEFA"),
    ("lightslategray", "#778899"),
    ("lightslategrey", "#778899"),
    ("lightsteelblue", "#B0C4DE"),
    ("lightyellow", "#FFFFE0"),
    ("lime", "#00FF00"),
    ("limegreen", "#32CD32"),
    ("linen", "#FAF0E6"),
    ("magenta", "#FF00FF"),
    ("maroon", "#800000"),
    ("mediumaquamarine", "#66CDAA"),
    ("mediumblue", "#0000CD"),
    ("mediumorchid", "#BA55D3"),
    ("mediumpurple", "#9370DB"),
    ("mediumseagreen", "#3CB371"),
    ("mediumslateblue", "#7B68EE"),
    ("mediumspringgreen", "#00FA9A"),
    ("mediumturquoise", "#48D1CC"),
    ("mediumvioletred", "#C71585"),
    ("midnightblue", "#191970"),
    ("mintcream", "#F5FFFA"),
    ("mistyrose", "#FFE4E1"),
    ("moccasin", "#FFE4B5"),
    ("navajowhite", "#FFDEAD"),
    ("navy", "#000080"),
    ("oldlace", "#FDF5E6"),
    ("olive", "#808000"),
    ("olivedrab", "#6B8E23"),
    ("orange", "#FFA500"),
    ("orangered", "#FF4500"),
    ("orchid", "#DA70D6"),
    ("palegoldenrod", "#EEE8AA"),
    ("palegreen", "#98FB98"),
    ("paleturquoise", "#AFEEEE"),
    ("palevioletred", "#DB7093"),
    ("papayawhip", "#FFEFD5"),
    ("peachpuff", "#FFDAB9"),
    ("peru", "#CD853F"),
    ("pink", "#FFC0CB"),
    ("plum", "#DDA0DD"),
    ("powderblue", "#B0E0E6"),
    ("purple", "#800080"),
    ("rebeccapurple", "#663399"),
    ("red", "#FF0000"),
    ("rosybrown", "#BC8F8F"),
    ("royalblue", "#4169E1"),
    ("saddlebrown", "#8B4513"),
    ("salmon", "#FA8072"),
    ("sandybrown", "#F4A460"),
    ("seagreen", "#2E8B57"),
    ("seashell", "#FFF5EE"),
    ("sienna", "#A0522D"),
    ("silver", "#C0C0C0"),
    ("skyblue", "#87CEEB"),
    ("slateblue", "#6A5ACD"),
    ("slategray", "#708090"),
    ("slategrey", "#708090"),
    ("snow", "#FFFAFA"),
    ("springgreen", "#00FF7F"),
    ("steelblue", "#4682B4"),
    ("tan", "#D2B48C"),
    ("teal", "#008080"),
    ("thistle", "#D8BFD8"),
    ("tomato", "#FF6347"),
    ("turquoise", "#40E0D0"),
    ("violet", "#EE82EE"),
    ("wheat", "#F5DEB3"),
    ("white", "#FFFFFF"),
    ("whitesmoke", "#F5F5F5"),
    ("yellow", "#FFFF00"),
    ("yellowgreen", "#9ACD32"),
];

#[derive(Debug, Error, PartialEq)]
pub enum ColorParseError {
    #[error("empty color")]
    Empty,
    #[error("unknown color: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }

    fn to_unit(self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Accepts `#rrggbb`, `#rgb` and CSS color names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }

        let hex = match NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
        {
            Some((_, hex)) => *hex,
            None => s,
        };

        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ColorParseError::Unknown(s.to_string()))?;

        let channel = |d: &str| u8::from_str_radix(d, 16).ok();
        let parsed = match digits.len() {
            6 => channel(&digits[0..2]).zip(channel(&digits[2..4])).zip(channel(&digits[4..6])),
            3 => {
                let double = |i: usize| channel(digits[i..i + 1].repeat(2).as_str());
                double(0).zip(double(1)).zip(double(2))
            }
            _ => None,
        };

        parsed
            .map(|((r, g), b)| Rgb { r, g, b })
            .ok_or_else(|| ColorParseError::Unknown(s.to_string()))
    }
}

/// Blend a color's lightness toward white.
///
/// `amount` of 1 keeps the color, 0 gives white. Unparseable colors yield
/// [`FALLBACK_GRAY`].
pub fn lighten(color: &str, amount: f64) -> String {
    let rgb = match color.parse::<Rgb>() {
        Ok(rgb) => rgb,
        Err(e) => {
            tracing::debug!("Falling back to gray for color {:?}: {}", color, e);
            return FALLBACK_GRAY.to_string();
        }
    };

    let amount = if amount.is_finite() { amount.clamp(0.0, 1.0) } else { 1.0 };
    let (r, g, b) = rgb.to_unit();
    let (h, l, s) = rgb_to_hls(r, g, b);
    let lightness = (amount * l + (1.0 - amount)).clamp(0.0, 1.0);
    let (r, g, b) = hls_to_rgb(h, lightness, s);

    Rgb::from_unit(r, g, b).to_hex()
}

/// Palette color for the motor at `index` in sorted motor order
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, l, 0.0);
    }

    let range = max - min;
    let s = if l <= 0.5 {
        range / (max + min)
    } else {
        range / (2.0 - max - min)
    };

    let rc = (max - r) / range;
    let gc = (max - g) / range;
    let bc = (max - b) / range;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }

    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;

    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_and_names() {
        assert_eq!("#2E91E5".parse::<Rgb>(), Ok(Rgb { r: 0x2e, g: 0x91, b: 0xe5 }));
        assert_eq!("#fff".parse::<Rgb>(), Ok(Rgb { r: 255, g: 255, b: 255 }));
        assert_eq!("Blue".parse::<Rgb>(), Ok(Rgb { r: 0, g: 0, b: 255 }));
        assert_eq!("".parse::<Rgb>(), Err(ColorParseError::Empty));
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gggggg".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_parse_extended_css_names() {
        assert_eq!("RebeccaPurple".parse::<Rgb>(), Ok(Rgb { r: 0x66, g: 0x33, b: 0x99 }));
        assert_eq!("lightgoldenrodyellow".parse::<Rgb>(), Ok(Rgb { r: 0xfa, g: 0xfa, b: 0xd2 }));
        assert_eq!(lighten("tomato", 1.0), "#ff6347");
        assert!("notacolor".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_lighten_full_amount_keeps_color() {
        for color in PALETTE {
            assert_eq!(lighten(color, 1.0), color.to_lowercase());
        }
    }

    #[test]
    fn test_lighten_zero_amount_is_white() {
        assert_eq!(lighten("#2E91E5", 0.0), "#ffffff");
        assert_eq!(lighten("black", 0.0), "#ffffff");
    }

    #[test]
    fn test_lighten_half_is_lighter() {
        let base = "#1CA71C".parse::<Rgb>().unwrap();
        let light = lighten("#1CA71C", 0.5).parse::<Rgb>().unwrap();
        let sum = |c: Rgb| c.r as u32 + c.g as u32 + c.b as u32;
        assert!(sum(light) > sum(base));
    }

    #[test]
    fn test_lighten_gray_stays_gray() {
        // no saturation: only lightness moves
        assert_eq!(lighten("#000000", 0.5), "#808080");
    }

    #[test]
    fn test_lighten_malformed_falls_back() {
        assert_eq!(lighten("", 0.5), FALLBACK_GRAY);
        assert_eq!(lighten("not-a-color", 0.5), FALLBACK_GRAY);
    }

    #[test]
    fn test_lighten_is_deterministic() {
        assert_eq!(lighten("#AF0038", 0.3), lighten("#AF0038", 0.3));
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(0), "#2E91E5");
        assert_eq!(palette_color(48), "#2E91E5");
        assert_eq!(palette_color(25), "#00FE35");
    }
}
