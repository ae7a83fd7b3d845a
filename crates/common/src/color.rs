use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Linear RGB triple with each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Errors from color parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("malformed hex color {0:?}: expected six hex digits with optional '#'")]
    Malformed(String),
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`, case-insensitive.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::Malformed(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorError::Malformed(hex.to_string()))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// 8-bit channels, as used by color picker widgets.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        let red = Rgb::new(1.0, 0.0, 0.0);
        assert_eq!(Rgb::from_hex("#ff0000").unwrap(), red);
        assert_eq!(Rgb::from_hex("ff0000").unwrap(), red);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            Rgb::from_hex("#1B1B1B").unwrap(),
            Rgb::from_hex("#1b1b1b").unwrap()
        );
        let c = Rgb::from_hex("#1b1b1b").unwrap();
        assert!((c.r - 27.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_non_hex_without_panicking() {
        assert_eq!(
            Rgb::from_hex("zzzzzz"),
            Err(ColorError::Malformed("zzzzzz".into()))
        );
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("##ff0000").is_err());
        assert!(Rgb::from_hex("#ff00000").is_err());
        // multi-byte input of the right byte length must not split a char
        assert!(Rgb::from_hex("ffé00").is_err());
    }

    #[test]
    fn hex_output_matches_input() {
        let c: Rgb = "#3A7fC0".parse().unwrap();
        assert_eq!(c.to_hex(), "#3a7fc0");
        assert_eq!(c.to_string(), "#3a7fc0");
        assert_eq!(Rgb::from_rgb8(c.to_rgb8()), c);
    }
}
