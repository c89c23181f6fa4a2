//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are pure data with no I/O, making them usable in any context
//! (puzzle generation, snap matching, terminal rendering, JSON protocol).
//!
//! # Shape Sizes
//!
//! Canonical (unrotated) bounding boxes in pixels:
//!
//! | Shape | Width | Height | Notes |
//! |-------|-------|--------|-------|
//! | square | 100 | 100 | |
//! | rectangle | 140 | 70 | |
//! | parallelogram | 140 | 80 | top edge skewed by 20px |
//! | equilateralTriangle | 100 | 87 | base × height |
//! | isoscelesTriangle | 80 | 100 | base × height |
//!
//! # Difficulty Tiers
//!
//! | Tier | Shapes | Rotation | Layout | Allowed types |
//! |------|--------|----------|--------|---------------|
//! | easy | 3 | no | grid | square, rectangle, equilateralTriangle |
//! | normal | 4 | no | template | + parallelogram |
//! | hard | 5 | yes | template | all five |
//!
//! # Examples
//!
//! ```
//! use shape_snap_types::{Difficulty, LayoutStrategy, Rotation, ShapeType, TOTAL_STAGES};
//!
//! let shape: ShapeType = "equilateralTriangle".parse().unwrap();
//! assert_eq!(shape, ShapeType::EquilateralTriangle);
//!
//! assert_eq!(Rotation::Deg270.rotate_cw(), Rotation::Deg0);
//!
//! let hard = Difficulty::Hard.config();
//! assert_eq!(hard.shape_count, 5);
//! assert!(hard.enable_rotation);
//! assert_eq!(hard.layout, LayoutStrategy::Template);
//!
//! assert_eq!(TOTAL_STAGES, 5);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of stages in one game.
pub const TOTAL_STAGES: u32 = 5;

/// Snap distance threshold in pixels.
///
/// Sized generously for small fingers on touch screens.
pub const DEFAULT_SNAP_THRESHOLD: f32 = 50.0;

/// Square edge length (px).
pub const SQUARE_SIZE: f32 = 100.0;

/// Rectangle width × height (px).
pub const RECTANGLE_WIDTH: f32 = 140.0;
pub const RECTANGLE_HEIGHT: f32 = 70.0;

/// Parallelogram bounding box and horizontal skew (px).
pub const PARALLELOGRAM_WIDTH: f32 = 140.0;
pub const PARALLELOGRAM_HEIGHT: f32 = 80.0;
pub const PARALLELOGRAM_SKEW: f32 = 20.0;

/// Equilateral triangle base × height (px).
pub const EQUILATERAL_TRIANGLE_BASE: f32 = 100.0;
pub const EQUILATERAL_TRIANGLE_HEIGHT: f32 = 87.0;

/// Isosceles triangle base × height (px).
pub const ISOSCELES_TRIANGLE_BASE: f32 = 80.0;
pub const ISOSCELES_TRIANGLE_HEIGHT: f32 = 100.0;

/// Upper bound on the target area (px).
pub const TARGET_AREA_MAX_WIDTH: f32 = 500.0;
pub const TARGET_AREA_MAX_HEIGHT: f32 = 400.0;

/// The target area is centered this many pixels above the screen center.
pub const TARGET_AREA_LIFT: f32 = 50.0;

/// Distance of the draggable band from the bottom edge (px).
pub const TRAY_BOTTOM_MARGIN: f32 = 100.0;

/// Pixels covered by one terminal column / row.
///
/// Terminal glyphs are roughly twice as tall as they are wide, so a row covers
/// twice the pixels of a column.
pub const TERM_PX_PER_COL: f32 = 10.0;
pub const TERM_PX_PER_ROW: f32 = 20.0;

/// Error returned when parsing a type from its string name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown shape type: {0}")]
    ShapeType(String),
    #[error("invalid rotation (expected 0, 90, 180 or 270): {0}")]
    Rotation(String),
    #[error("unknown difficulty: {0}")]
    Difficulty(String),
}

/// The five puzzle shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeType {
    Square,
    Rectangle,
    Parallelogram,
    EquilateralTriangle,
    IsoscelesTriangle,
}

impl ShapeType {
    pub const ALL: [ShapeType; 5] = [
        ShapeType::Square,
        ShapeType::Rectangle,
        ShapeType::Parallelogram,
        ShapeType::EquilateralTriangle,
        ShapeType::IsoscelesTriangle,
    ];

    /// Protocol name (camelCase).
    ///
    /// ```
    /// use shape_snap_types::ShapeType;
    ///
    /// assert_eq!(ShapeType::IsoscelesTriangle.as_str(), "isoscelesTriangle");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Square => "square",
            ShapeType::Rectangle => "rectangle",
            ShapeType::Parallelogram => "parallelogram",
            ShapeType::EquilateralTriangle => "equilateralTriangle",
            ShapeType::IsoscelesTriangle => "isoscelesTriangle",
        }
    }

    pub fn is_triangle(&self) -> bool {
        matches!(
            self,
            ShapeType::EquilateralTriangle | ShapeType::IsoscelesTriangle
        )
    }
}

impl FromStr for ShapeType {
    type Err = ParseError;

    /// Parse from the protocol name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::ShapeType(s.to_string()))
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation in 90° steps, clockwise.
///
/// The cycle goes: 0 → 90 → 180 → 270 → 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use shape_snap_types::Rotation;
    ///
    /// assert_eq!(Rotation::Deg0.rotate_cw(), Rotation::Deg90);
    /// assert_eq!(Rotation::Deg270.rotate_cw(), Rotation::Deg0);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg0,
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// True for 90° and 270°, where width and height swap.
    pub fn is_quarter_turn(&self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl FromStr for Rotation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .ok()
            .and_then(Rotation::from_degrees)
            .ok_or_else(|| ParseError::Rotation(s.to_string()))
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

impl Serialize for Rotation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.degrees())
    }
}

impl<'de> Deserialize<'de> for Rotation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let degrees = u16::deserialize(deserializer)?;
        Rotation::from_degrees(degrees)
            .ok_or_else(|| serde::de::Error::custom("rotation must be 0, 90, 180 or 270"))
    }
}

/// The fixed shape palette.
///
/// Bright, saturated colors that read well against both light and dark
/// backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeColor {
    Pink,
    Rose,
    Yellow,
    Amber,
    Lime,
    Cyan,
    Sky,
    Purple,
}

impl ShapeColor {
    pub const ALL: [ShapeColor; 8] = [
        ShapeColor::Pink,
        ShapeColor::Rose,
        ShapeColor::Yellow,
        ShapeColor::Amber,
        ShapeColor::Lime,
        ShapeColor::Cyan,
        ShapeColor::Sky,
        ShapeColor::Purple,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            ShapeColor::Pink => "#ec4899",
            ShapeColor::Rose => "#f43f5e",
            ShapeColor::Yellow => "#facc15",
            ShapeColor::Amber => "#f59e0b",
            ShapeColor::Lime => "#84cc16",
            ShapeColor::Cyan => "#06b6d4",
            ShapeColor::Sky => "#0ea5e9",
            ShapeColor::Purple => "#a855f7",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            ShapeColor::Pink => (0xec, 0x48, 0x99),
            ShapeColor::Rose => (0xf4, 0x3f, 0x5e),
            ShapeColor::Yellow => (0xfa, 0xcc, 0x15),
            ShapeColor::Amber => (0xf5, 0x9e, 0x0b),
            ShapeColor::Lime => (0x84, 0xcc, 0x16),
            ShapeColor::Cyan => (0x06, 0xb6, 0xd4),
            ShapeColor::Sky => (0x0e, 0xa5, 0xe9),
            ShapeColor::Purple => (0xa8, 0x55, 0xf7),
        }
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        ShapeColor::ALL
            .iter()
            .copied()
            .find(|c| c.hex().eq_ignore_ascii_case(s))
    }
}

impl Serialize for ShapeColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.hex())
    }
}

impl<'de> Deserialize<'de> for ShapeColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        ShapeColor::from_hex(&s).ok_or_else(|| serde::de::Error::custom("color not in palette"))
    }
}

/// How target slots are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutStrategy {
    /// Targets centered in the cells of a grid.
    Grid,
    /// Targets arranged as a pre-authored silhouette.
    Template,
}

/// Per-tier gameplay settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyConfig {
    /// Number of shapes (and targets) per puzzle
    pub shape_count: usize,
    /// Draw grid lines in the target area
    pub show_grid_lines: bool,
    /// Targets require a specific rotation
    pub enable_rotation: bool,
    /// Shape types a puzzle may contain
    pub available_shapes: &'static [ShapeType],
    pub layout: LayoutStrategy,
    /// Display name
    pub label: &'static str,
}

impl DifficultyConfig {
    pub fn allows(&self, shape_type: ShapeType) -> bool {
        self.available_shapes.contains(&shape_type)
    }
}

const EASY_SHAPES: [ShapeType; 3] = [
    ShapeType::Square,
    ShapeType::Rectangle,
    ShapeType::EquilateralTriangle,
];

const NORMAL_SHAPES: [ShapeType; 4] = [
    ShapeType::Square,
    ShapeType::Rectangle,
    ShapeType::Parallelogram,
    ShapeType::EquilateralTriangle,
];

pub const EASY_CONFIG: DifficultyConfig = DifficultyConfig {
    shape_count: 3,
    show_grid_lines: true,
    enable_rotation: false,
    available_shapes: &EASY_SHAPES,
    layout: LayoutStrategy::Grid,
    label: "Easy",
};

pub const NORMAL_CONFIG: DifficultyConfig = DifficultyConfig {
    shape_count: 4,
    show_grid_lines: false,
    enable_rotation: false,
    available_shapes: &NORMAL_SHAPES,
    layout: LayoutStrategy::Template,
    label: "Normal",
};

pub const HARD_CONFIG: DifficultyConfig = DifficultyConfig {
    shape_count: 5,
    show_grid_lines: false,
    enable_rotation: true,
    available_shapes: &ShapeType::ALL,
    layout: LayoutStrategy::Template,
    label: "Hard",
};

/// Difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn config(&self) -> &'static DifficultyConfig {
        match self {
            Difficulty::Easy => &EASY_CONFIG,
            Difficulty::Normal => &NORMAL_CONFIG,
            Difficulty::Hard => &HARD_CONFIG,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::Difficulty(s.to_string()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    StageClear,
    GameClear,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::StageClear => "stageClear",
            GamePhase::GameClear => "gameClear",
        }
    }
}

/// Identifier of a shape, unique within one puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape-{:08x}", self.0)
    }
}

/// Identifier of a target slot.
///
/// Shares its numeric value with the shape the slot was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u32);

impl From<ShapeId> for TargetId {
    fn from(id: ShapeId) -> Self {
        TargetId(id.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target-{:08x}", self.0)
    }
}

/// Commands accepted by the game state machine.
///
/// `puzzleReady` is not listed: it is issued internally by the generator
/// collaborator, never by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum GameCommand {
    SetDifficulty { difficulty: Difficulty },
    Start,
    Place { shape_id: ShapeId },
    Next,
    Reset,
}

impl GameCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::SetDifficulty { .. } => "setDifficulty",
            GameCommand::Start => "start",
            GameCommand::Place { .. } => "place",
            GameCommand::Next => "next",
            GameCommand::Reset => "reset",
        }
    }
}

/// Screen size handed to the puzzle generator, in pixels.
///
/// Both dimensions must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Pixel plane covered by a terminal of `cols` × `rows` cells.
    pub fn from_terminal(cols: u16, rows: u16) -> Self {
        Self {
            width: cols as f32 * TERM_PX_PER_COL,
            height: rows as f32 * TERM_PX_PER_ROW,
        }
    }
}
