use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{color::ColorTag, shape::Shape},
};

/// Width of the play area in display units the default grid is derived from.
pub const PLAY_AREA_WIDTH: usize = 300;
/// Height of the play area in display units the default grid is derived from.
pub const PLAY_AREA_HEIGHT: usize = 600;
/// Edge length of one cell in display units.
pub const CELL_SIZE: usize = 30;

/// Default number of columns.
pub const DEFAULT_COLUMNS: usize = PLAY_AREA_WIDTH / CELL_SIZE;
/// Default number of rows.
pub const DEFAULT_ROWS: usize = PLAY_AREA_HEIGHT / CELL_SIZE;
/// Default time between two gravity steps.
pub const DEFAULT_FALL_INTERVAL: Duration = Duration::from_millis(500);

/// Construction-time settings of a [`Game`](crate::Game).
///
/// All fields have defaults, so a JSON file only needs to name what it
/// changes:
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "rows": 12, "fall_interval": 0.25 }"#).unwrap();
/// assert_eq!(config.rows(), 12);
/// assert_eq!(config.columns(), 10);
/// assert_eq!(config.fall_interval(), Duration::from_millis(250));
/// assert!(config.validate().is_ok());
/// ```
///
/// In JSON the fall interval is given in seconds, shape matrices as nested
/// `0`/`1` arrays and colors as `"#rrggbb"` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    rows: usize,
    columns: usize,
    #[serde(with = "duration_secs")]
    fall_interval: Duration,
    shape_catalog: Vec<Shape>,
    color_palette: Vec<ColorTag>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            fall_interval: DEFAULT_FALL_INTERVAL,
            shape_catalog: Shape::standard_catalog(),
            color_palette: ColorTag::default_palette(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    #[must_use]
    pub fn shape_catalog(&self) -> &[Shape] {
        &self.shape_catalog
    }

    #[must_use]
    pub fn color_palette(&self) -> &[ColorTag] {
        &self.color_palette
    }

    #[must_use]
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_fall_interval(mut self, fall_interval: Duration) -> Self {
        self.fall_interval = fall_interval;
        self
    }

    /// Sets the fall interval in seconds.
    ///
    /// Negative, infinite and NaN values are stored as a zero interval, which
    /// [`GameConfig::validate`] then rejects.
    #[must_use]
    pub fn with_fall_interval_secs(self, secs: f64) -> Self {
        let fall_interval = Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO);
        self.with_fall_interval(fall_interval)
    }

    #[must_use]
    pub fn with_shape_catalog(mut self, shape_catalog: Vec<Shape>) -> Self {
        self.shape_catalog = shape_catalog;
        self
    }

    #[must_use]
    pub fn with_color_palette(mut self, color_palette: Vec<ColorTag>) -> Self {
        self.color_palette = color_palette;
        self
    }

    /// Checks that the configuration describes a playable game.
    ///
    /// Every shape must fit on an empty board, otherwise no spawn could ever
    /// succeed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if self.fall_interval.is_zero() {
            return Err(ConfigError::ZeroFallInterval);
        }
        if self.shape_catalog.is_empty() {
            return Err(ConfigError::EmptyShapeCatalog);
        }
        if self.color_palette.is_empty() {
            return Err(ConfigError::EmptyColorPalette);
        }
        for shape in &self.shape_catalog {
            let matrix = shape.matrix();
            if matrix.width() > self.columns {
                return Err(ConfigError::ShapeTooWide {
                    name: shape.name().to_owned(),
                    width: matrix.width(),
                    columns: self.columns,
                });
            }
            if matrix.height() > self.rows {
                return Err(ConfigError::ShapeTooTall {
                    name: shape.name().to_owned(),
                    height: matrix.height(),
                    rows: self.rows,
                });
            }
        }
        Ok(())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize as _, Deserializer, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|e| serde::de::Error::custom(format!("invalid fall interval {secs}: {e}")))
    }
}
