use std::{fmt::Write as _, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque color tag carried by pieces and filled cells.
///
/// The engine never interprets the value; it only stores it in the grid so
/// the renderer can read it back.
///
/// # Wire format
///
/// Serialized as a `"#rrggbb"` hex string.
///
/// # Example
///
/// ```
/// use blockfall_engine::ColorTag;
///
/// let red: ColorTag = "#ff0000".parse().unwrap();
/// assert_eq!(red, ColorTag::new(255, 0, 0));
/// assert_eq!(red.to_string(), "#ff0000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("#{r:02x}{g:02x}{b:02x}")]
pub struct ColorTag {
    r: u8,
    g: u8,
    b: u8,
}

impl ColorTag {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Returns the seven-entry default palette.
    #[must_use]
    pub fn default_palette() -> Vec<Self> {
        DEFAULT_PALETTE.to_vec()
    }
}

const DEFAULT_PALETTE: [ColorTag; 7] = [
    ColorTag::new(200, 200, 200),
    ColorTag::new(255, 0, 0),
    ColorTag::new(0, 255, 0),
    ColorTag::new(0, 0, 255),
    ColorTag::new(255, 255, 0),
    ColorTag::new(0, 255, 255),
    ColorTag::new(255, 0, 255),
];

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid color tag {input:?}: expected \"#rrggbb\"")]
pub struct ParseColorTagError {
    #[error(not(source))]
    input: String,
}

impl FromStr for ColorTag {
    type Err = ParseColorTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorTagError {
            input: s.to_owned(),
        };
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for ColorTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(7);
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for ColorTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
