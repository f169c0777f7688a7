use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

use super::common;

/// Horizontal alignment of a text object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Font and layout attributes of a text object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub family: String,
    pub size: f32,
    pub weight: u16,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: common::DEFAULT_FONT_FAMILY.to_string(),
            size: common::DEFAULT_FONT_SIZE,
            weight: common::DEFAULT_FONT_WEIGHT,
            align: TextAlign::Left,
        }
    }
}

/// One shadow layer of a text effect. Effects like "Outline" stack
/// several layers, so text objects carry a `Vec<Shadow>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color32,
    pub offset: Vec2,
    pub blur: f32,
}

impl Shadow {
    pub fn new(color: Color32, dx: f32, dy: f32, blur: f32) -> Self {
        Self {
            color,
            offset: Vec2::new(dx, dy),
            blur,
        }
    }
}

/// Kind-specific attributes of a text object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    pub content: String,
    pub style: TextStyle,
    /// Empty means no effect applied.
    #[serde(default)]
    pub shadow: Vec<Shadow>,
}

impl TextProps {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            style: TextStyle::default(),
            shadow: Vec::new(),
        }
    }
}

/// Names of the predefined text effects, in sidebar order.
pub const TEXT_EFFECT_NAMES: &[&str] = &[
    "None",
    "Soft Shadow",
    "Hard Shadow",
    "Drop Shadow",
    "Glow",
    "Strong Glow",
    "Outline",
    "Bold Outline",
    "Neon",
];

/// Resolve a predefined text effect by name. "None" yields an empty
/// shadow stack; unknown names yield `None`.
pub fn text_effect(name: &str) -> Option<Vec<Shadow>> {
    let black = |a: u8| Color32::from_rgba_unmultiplied(0, 0, 0, a);
    let white = |a: u8| Color32::from_rgba_unmultiplied(255, 255, 255, a);

    let shadows = match name {
        "None" => Vec::new(),
        "Soft Shadow" => vec![Shadow::new(black(77), 2.0, 2.0, 4.0)],
        "Hard Shadow" => vec![Shadow::new(black(204), 4.0, 4.0, 0.0)],
        "Drop Shadow" => vec![Shadow::new(black(128), 3.0, 3.0, 6.0)],
        "Glow" => vec![Shadow::new(white(204), 0.0, 0.0, 10.0)],
        "Strong Glow" => vec![Shadow::new(white(255), 0.0, 0.0, 20.0)],
        "Outline" => vec![
            Shadow::new(black(255), -1.0, -1.0, 0.0),
            Shadow::new(black(255), 1.0, -1.0, 0.0),
            Shadow::new(black(255), -1.0, 1.0, 0.0),
            Shadow::new(black(255), 1.0, 1.0, 0.0),
        ],
        "Bold Outline" => vec![
            Shadow::new(black(255), -2.0, -2.0, 0.0),
            Shadow::new(black(255), 2.0, -2.0, 0.0),
            Shadow::new(black(255), -2.0, 2.0, 0.0),
            Shadow::new(black(255), 2.0, 2.0, 0.0),
        ],
        "Neon" => vec![
            Shadow::new(Color32::from_rgba_unmultiplied(255, 0, 255, 204), 0.0, 0.0, 15.0),
            Shadow::new(Color32::from_rgba_unmultiplied(0, 255, 255, 204), 0.0, 0.0, 25.0),
        ],
        _ => return None,
    };
    Some(shadows)
}
