//! Colour type, textual parsing and formatting.
//!
//! Variable stores hold colours as normalized float channels. Token documents
//! hold them as text in one of several CSS-like notations. [`Rgba::parse`]
//! goes one way and [`Rgba::format`] goes the other.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TokvarError};

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$").expect("valid regex")
});

static RGBA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*([\d.]+)\s*\)$")
        .expect("valid regex")
});

static HSL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^hsl\(\s*(\d{1,3})\s*,\s*(\d{1,3})%\s*,\s*(\d{1,3})%\s*\)$").expect("valid regex")
});

static HSLA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^hsla\(\s*(\d{1,3})\s*,\s*(\d{1,3})%\s*,\s*(\d{1,3})%\s*,\s*([\d.]+)\s*\)$")
        .expect("valid regex")
});

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Fa-f0-9]{3}){1,2}$").expect("valid regex"));

static FLOAT_TUPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\{\s*r:\s*([\d.]+),\s*g:\s*([\d.]+),\s*b:\s*([\d.]+)(?:,\s*opacity:\s*([\d.]+))?\s*\}$",
    )
    .expect("valid regex")
});

/// How a translucent colour is written back out as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OpacityFormat {
    /// `#rrggbbaa`
    Hex,
    /// `rgba(r, g, b, a)`
    #[default]
    Rgba,
}

/// An RGBA colour with every channel normalized to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Rgba {
    /// Create a new colour from normalized channels.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour from normalized channels.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create an opaque colour from byte channels.
    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Parse colour text.
    ///
    /// Notations are tried in order: `rgb()`, `rgba()`, `hsl()`, `hsla()`,
    /// `#rgb` / `#rrggbb`, then the float tuple `{r: .., g: .., b: ..[, opacity: ..]}`.
    /// Integer channels are divided by 255; hsl is converted through the
    /// standard hue/saturation/lightness model.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();

        if let Some(caps) = RGB_RE.captures(text) {
            return Ok(Self::rgb(
                byte_channel(&caps[1])?,
                byte_channel(&caps[2])?,
                byte_channel(&caps[3])?,
            ));
        }

        if let Some(caps) = RGBA_RE.captures(text) {
            return Ok(Self::new(
                byte_channel(&caps[1])?,
                byte_channel(&caps[2])?,
                byte_channel(&caps[3])?,
                float_channel(&caps[4])?,
            ));
        }

        if let Some(caps) = HSL_RE.captures(text) {
            return hsl_to_rgb(&caps[1], &caps[2], &caps[3]);
        }

        if let Some(caps) = HSLA_RE.captures(text) {
            let mut colour = hsl_to_rgb(&caps[1], &caps[2], &caps[3])?;
            colour.a = float_channel(&caps[4])?;
            return Ok(colour);
        }

        if HEX_RE.is_match(text) {
            return from_hex(&text[1..]);
        }

        if let Some(caps) = FLOAT_TUPLE_RE.captures(text) {
            let a = match caps.get(4) {
                Some(m) => float_channel(m.as_str())?,
                None => 1.0,
            };
            return Ok(Self::new(
                float_channel(&caps[1])?,
                float_channel(&caps[2])?,
                float_channel(&caps[3])?,
                a,
            ));
        }

        Err(TokvarError::Parse {
            message: format!("Invalid color format: {}", text),
            help: Some(
                "Use #rgb, #rrggbb, rgb(), rgba(), hsl(), hsla() or {r: .., g: .., b: ..}".to_string(),
            ),
        })
    }

    /// Check whether `text` is written in the float-tuple notation.
    pub fn is_float_tuple(text: &str) -> bool {
        FLOAT_TUPLE_RE.is_match(text.trim())
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.a == 1.0
    }

    /// Format as text.
    ///
    /// Opaque colours are always `#rrggbb`. Translucent colours follow
    /// `opacity`: `#rrggbbaa`, or `rgba(r, g, b, a)` with alpha rounded to
    /// four decimals.
    pub fn format(&self, opacity: OpacityFormat) -> String {
        let [r, g, b] = [self.r, self.g, self.b].map(to_byte);

        if self.is_opaque() {
            return format!("#{:02x}{:02x}{:02x}", r, g, b);
        }

        match opacity {
            OpacityFormat::Hex => {
                format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, to_byte(self.a))
            }
            OpacityFormat::Rgba => {
                let alpha = (self.a * 10_000.0).round() / 10_000.0;
                format!("rgba({}, {}, {}, {})", r, g, b, alpha)
            }
        }
    }
}

impl FromStr for Rgba {
    type Err = TokvarError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(OpacityFormat::default()))
    }
}

/// Scale a normalized channel to a byte, rounding half away from zero.
fn to_byte(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Expand and decode a 3 or 6 digit hex body (without `#`).
fn from_hex(hex: &str) -> Result<Rgba> {
    let expanded: String = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };

    let r = parse_hex_byte(&expanded[0..2])?;
    let g = parse_hex_byte(&expanded[2..4])?;
    let b = parse_hex_byte(&expanded[4..6])?;
    Ok(Rgba::from_bytes(r, g, b))
}

fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16)
        .map_err(|_| TokvarError::parse(format!("Invalid hex byte: {}", s)))
}

fn byte_channel(s: &str) -> Result<f64> {
    s.parse::<u16>()
        .map(|v| v as f64 / 255.0)
        .map_err(|_| TokvarError::parse(format!("Invalid colour channel: {}", s)))
}

fn float_channel(s: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|_| TokvarError::parse(format!("Invalid colour channel: {}", s)))
}

/// Convert integer hue degrees and saturation/lightness percentages to RGB.
fn hsl_to_rgb(h: &str, s: &str, l: &str) -> Result<Rgba> {
    use palette::{encoding::Srgb as SrgbEncoding, Hsl, IntoColor, Srgb};

    let hue = float_channel(h)?;
    let saturation = float_channel(s)? / 100.0;
    let lightness = float_channel(l)? / 100.0;

    let hsl: Hsl<SrgbEncoding, f64> = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb<f64> = hsl.into_color();

    Ok(Rgba::rgb(rgb.red, rgb.green, rgb.blue))
}
