use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    ConfigError, GameConfig,
    core::{color::ColorTag, piece::Piece, shape::Shape},
};

/// Produces the next falling piece.
///
/// Each spawn draws a shape from the catalog and a color from the palette,
/// independently and uniformly, and places the piece at its spawn position.
/// The random source is owned by the spawner; there is no global state, so
/// two spawners with the same seed yield the same sequence.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameConfig, PieceSpawner, SpawnSeed};
/// use rand::Rng as _;
///
/// let config = GameConfig::default();
/// let seed: SpawnSeed = rand::rng().random();
///
/// let mut first = PieceSpawner::with_seed(&config, seed).unwrap();
/// let mut second = PieceSpawner::with_seed(&config, seed).unwrap();
/// for _ in 0..10 {
///     assert_eq!(first.spawn(), second.spawn());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PieceSpawner<R = Pcg32> {
    rng: R,
    shapes: Vec<Shape>,
    colors: Vec<ColorTag>,
    columns: usize,
}

/// Seed for deterministic piece spawning.
///
/// A 128-bit seed for the spawner's random number generator, displayed and
/// serialized as a 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnSeed([u8; 16]);

impl SpawnSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl fmt::Display for SpawnSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.to_u128())
    }
}

/// Error returned when a string is not a 32-digit hex seed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected 32 hex digits")]
pub struct ParseSpawnSeedError;

impl FromStr for SpawnSeed {
    type Err = ParseSpawnSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSpawnSeedError);
        }
        u128::from_str_radix(s, 16)
            .map(Self::from_u128)
            .map_err(|_| ParseSpawnSeedError)
    }
}

impl Serialize for SpawnSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for SpawnSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        hex_str
            .parse::<Self>()
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))
    }
}

impl Distribution<SpawnSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SpawnSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SpawnSeed(seed)
    }
}

impl PieceSpawner {
    /// Creates a spawner seeded from the thread-local random generator.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a reproducible sequence.
    pub fn with_seed(config: &GameConfig, seed: SpawnSeed) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::from_seed(seed.0))
    }
}

impl<R> PieceSpawner<R>
where
    R: Rng,
{
    /// Creates a spawner drawing from the given random source.
    ///
    /// Only the catalog, palette and column count of `config` are used.
    pub fn with_rng(config: &GameConfig, rng: R) -> Result<Self, ConfigError> {
        if config.shape_catalog().is_empty() {
            return Err(ConfigError::EmptyShapeCatalog);
        }
        if config.color_palette().is_empty() {
            return Err(ConfigError::EmptyColorPalette);
        }
        Ok(Self {
            rng,
            shapes: config.shape_catalog().to_vec(),
            colors: config.color_palette().to_vec(),
            columns: config.columns(),
        })
    }

    /// Draws a random shape and color and returns the piece at its spawn
    /// position.
    pub fn spawn(&mut self) -> Piece {
        let shape = &self.shapes[self.rng.random_range(0..self.shapes.len())];
        let color = self.colors[self.rng.random_range(0..self.colors.len())];
        Piece::spawn(shape, color, self.columns)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::ShapeMatrix;

    use super::*;

    const SEED: SpawnSeed = SpawnSeed::from_u128(0x1234_5678_9abc_def0_1122_3344_5566_7788);

    mod spawn_seed_serialization {
        use super::*;

        #[test]
        fn test_known_values() {
            let zero = SpawnSeed::from_u128(0);
            assert_eq!(
                serde_json::to_string(&zero).unwrap(),
                "\"00000000000000000000000000000000\""
            );

            let seed = SpawnSeed::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
            let deserialized: SpawnSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_deserialize_uppercase_hex() {
            let json = "\"0123456789ABCDEFFEDCBA9876543210\"";
            let deserialized: SpawnSeed = serde_json::from_str(json).unwrap();
            assert_eq!(
                deserialized.to_u128(),
                0x0123_4567_89ab_cdef_fedc_ba98_7654_3210
            );
        }

        #[test]
        fn test_errors() {
            for json in [
                "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
                "\"0123456789abcdef0123456789abcde\"",
                "\"0123456789abcdef0123456789abcdef0\"",
                "\"\"",
                "\"+fffffffffffffffffffffffffffffff\"",
            ] {
                let err = serde_json::from_str::<SpawnSeed>(json).unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{json}: {err}");
            }
        }
    }

    #[test]
    fn test_parse_seed() {
        assert_eq!(
            "0123456789ABCDEFfedcba9876543210".parse(),
            Ok(SpawnSeed::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210))
        );
        assert_eq!(SEED.to_string().parse(), Ok(SEED));
        for input in ["ff", "+fffffffffffffffffffffffffffffff", "0x23456789abcdef0123456789abcdef"] {
            assert_eq!(input.parse::<SpawnSeed>(), Err(ParseSpawnSeedError), "{input}");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let config = GameConfig::default();
        let mut first = PieceSpawner::with_seed(&config, SEED).unwrap();
        let mut second = PieceSpawner::with_seed(&config, SEED).unwrap();
        for _ in 0..50 {
            assert_eq!(first.spawn(), second.spawn());
        }
    }

    #[test]
    fn test_spawned_pieces_come_from_config() {
        let config = GameConfig::default();
        let mut spawner = PieceSpawner::with_seed(&config, SEED).unwrap();
        let mut shapes = HashSet::new();
        let mut colors = HashSet::new();
        for _ in 0..500 {
            let piece = spawner.spawn();
            let shape = config
                .shape_catalog()
                .iter()
                .find(|shape| shape.matrix() == piece.matrix())
                .expect("spawned matrix must be a catalog template");
            assert_eq!(piece.position().row(), 0);
            assert_eq!(
                piece.position().column(),
                i32::try_from(config.columns() / 2 - shape.matrix().width() / 2).unwrap()
            );
            assert!(config.color_palette().contains(&piece.color()));
            shapes.insert(shape.name().to_owned());
            colors.insert(piece.color());
        }
        assert_eq!(shapes.len(), config.shape_catalog().len());
        assert_eq!(colors.len(), config.color_palette().len());
    }

    #[test]
    fn test_single_entry_catalog() {
        let dot = Shape::new("dot", ShapeMatrix::from_rows(&[&[1]]).unwrap());
        let config = GameConfig::default()
            .with_columns(5)
            .with_shape_catalog(vec![dot])
            .with_color_palette(vec![ColorTag::new(9, 9, 9)]);
        let mut spawner = PieceSpawner::with_rng(&config, Pcg32::from_seed([7; 16])).unwrap();
        let piece = spawner.spawn();
        assert_eq!(piece.occupied_positions().collect::<Vec<_>>(), [(2, 0)]);
        assert_eq!(piece.color(), ColorTag::new(9, 9, 9));
    }

    #[test]
    fn test_rejects_empty_tables() {
        let no_shapes = GameConfig::default().with_shape_catalog(vec![]);
        assert_eq!(
            PieceSpawner::with_seed(&no_shapes, SEED).unwrap_err(),
            ConfigError::EmptyShapeCatalog
        );
        let no_colors = GameConfig::default().with_color_palette(vec![]);
        assert_eq!(
            PieceSpawner::with_seed(&no_colors, SEED).unwrap_err(),
            ConfigError::EmptyColorPalette
        );
    }
}
