use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Rgba8Premul,
    error::{HeartlineError, HeartlineResult},
    math::Rng64,
};

/// Straight (non-premultiplied) RGBA8 color.
///
/// Serialized as `#rrggbb` (or `#rrggbbaa` when not opaque); deserialized from
/// either a hex string or a `[r, g, b]` / `[r, g, b, a]` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn parse_hex(s: &str) -> HeartlineResult<Self> {
        parse_hex(s).map_err(HeartlineError::validation)
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn premultiplied(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self {
                    r: *r,
                    g: *g,
                    b: *b,
                    a: *a,
                }),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }

    match s.len() {
        6 => Ok(Rgba8::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Rgba8 {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
            a: hex_byte(&s[6..8])?,
        }),
        _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

/// Non-empty set of colors particles draw from uniformly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub Vec<Rgba8>);

impl Palette {
    /// Pinks and lavenders of the floating-heart background.
    pub fn ambient() -> Self {
        Self(vec![
            Rgba8::rgb(0xff, 0x9e, 0xcd),
            Rgba8::rgb(0xff, 0x7e, 0xb8),
            Rgba8::rgb(0xe8, 0x5a, 0x9a),
            Rgba8::rgb(0xe8, 0xd5, 0xf2),
            Rgba8::rgb(0xe0, 0xb0, 0xff),
            Rgba8::rgb(0xff, 0xb3, 0xba),
            Rgba8::rgb(0xff, 0xcc, 0xe0),
            Rgba8::rgb(0xf4, 0xc2, 0xc2),
        ])
    }

    /// Six-color set shared by click bursts and the footer's rising hearts.
    pub fn burst() -> Self {
        let mut p = Self::ambient();
        p.0.truncate(6);
        p
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self, field: &str) -> HeartlineResult<()> {
        if self.0.is_empty() {
            return Err(HeartlineError::validation(format!(
                "{field} palette must contain at least one color"
            )));
        }
        Ok(())
    }

    /// Uniform pick; an empty palette falls back to opaque white.
    pub fn pick(&self, rng: &mut Rng64) -> Rgba8 {
        if self.0.is_empty() {
            return Rgba8::rgb(255, 255, 255);
        }
        self.0[rng.next_index(self.0.len())]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
