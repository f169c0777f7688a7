use std::collections::BTreeMap;

use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) mod common;
pub(crate) mod image;
pub(crate) mod text;

pub use common::{
    DEFAULT_FILL_COLOR, DEFAULT_SHAPE_SIZE, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH,
    MIN_OBJECT_SIZE, PASTE_OFFSET,
};
pub use image::{ImageFilter, ImageProps, PixelData};
pub use text::{Shadow, TextAlign, TextProps, TextStyle, text_effect, TEXT_EFFECT_NAMES};

/// Fill of an object or of the workspace background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Fill {
    Solid { color: Color32 },
    /// Linear gradient with coordinates relative to the object's box
    Linear {
        start: Pos2,
        end: Pos2,
        stops: Vec<GradientStop>,
    },
}

impl Fill {
    pub fn solid(color: Color32) -> Self {
        Fill::Solid { color }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color32,
}

/// Stroke attributes shared by all object kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color32,
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: common::DEFAULT_STROKE_COLOR,
            width: common::DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Shapes the shape sidebar can insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    InverseTriangle,
    Diamond,
}

/// Fill and stroke applied to a newly inserted shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub fill: Fill,
    pub stroke: StrokeStyle,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Fill::solid(common::DEFAULT_FILL_COLOR),
            stroke: StrokeStyle::default(),
        }
    }
}

/// Enumeration of all object kinds in the document.
///
/// `Polygon` and `Path` points are in object-local coordinates; `Group`
/// children keep canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectKind {
    Rect,
    Circle,
    Triangle,
    Polygon { points: Vec<Pos2> },
    Path { points: Vec<Pos2> },
    Text(TextProps),
    Image(ImageProps),
    Group { children: Vec<SceneObject> },
}

impl ObjectKind {
    /// Display name used by the layers sidebar
    pub fn display_name(&self) -> &'static str {
        match self {
            ObjectKind::Rect => "Rectangle",
            ObjectKind::Circle => "Circle",
            ObjectKind::Triangle => "Triangle",
            ObjectKind::Polygon { .. } => "Polygon",
            ObjectKind::Path { .. } => "Path",
            ObjectKind::Text(_) => "Text",
            ObjectKind::Image(_) => "Image",
            ObjectKind::Group { .. } => "Group",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ObjectKind::Text(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ObjectKind::Image(_))
    }
}

/// A single placeable entity on the canvas.
///
/// Z-order is implicit: it is the object's position in the scene's
/// sequence, not an attribute stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: Uuid,
    pub name: String,
    pub position: Pos2,
    pub size: Vec2,
    /// Rotation in degrees, clockwise
    pub rotation: f32,
    /// Opacity in [0, 1]
    pub opacity: f32,
    pub fill: Fill,
    pub stroke: StrokeStyle,
    pub visible: bool,
    /// Locked objects cannot become selection targets
    pub locked: bool,
    /// Free-form attributes that must survive serialization
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn new(kind: ObjectKind, position: Pos2, size: Vec2) -> Self {
        let name = kind.display_name().to_string();
        Self {
            id: Uuid::new_v4(),
            name,
            position,
            size,
            rotation: 0.0,
            opacity: 1.0,
            fill: Fill::solid(common::DEFAULT_FILL_COLOR),
            stroke: StrokeStyle::default(),
            visible: true,
            locked: false,
            metadata: BTreeMap::new(),
            kind,
        }
    }

    /// Build a shape object of the given kind with the sidebar's
    /// default geometry, centered later by the insert command.
    pub fn shape(kind: ShapeKind, style: ShapeStyle) -> Self {
        let s = common::DEFAULT_SHAPE_SIZE;
        let object_kind = match kind {
            ShapeKind::Rectangle => ObjectKind::Rect,
            ShapeKind::Circle => ObjectKind::Circle,
            ShapeKind::Triangle => ObjectKind::Triangle,
            ShapeKind::InverseTriangle => ObjectKind::Polygon {
                points: vec![Pos2::new(0.0, 0.0), Pos2::new(s, 0.0), Pos2::new(s / 2.0, s)],
            },
            ShapeKind::Diamond => ObjectKind::Polygon {
                points: vec![
                    Pos2::new(s / 2.0, 0.0),
                    Pos2::new(s, s / 2.0),
                    Pos2::new(s / 2.0, s),
                    Pos2::new(0.0, s / 2.0),
                ],
            },
        };
        let mut object = Self::new(object_kind, Pos2::ZERO, Vec2::splat(s));
        object.fill = style.fill;
        object.stroke = style.stroke;
        object
    }

    /// Build a text object with default styling
    pub fn text(content: &str) -> Self {
        let props = TextProps::new(content);
        let width = (props.style.size * 0.6 * content.chars().count() as f32).max(MIN_OBJECT_SIZE);
        let height = props.style.size * 1.2;
        Self::new(ObjectKind::Text(props), Pos2::ZERO, Vec2::new(width, height))
    }

    /// Build an image object for a resolved asset
    pub fn image(src: &str, pixels: Option<PixelData>, size: Vec2) -> Self {
        let props = match pixels {
            Some(pixels) => ImageProps::with_pixels(src, pixels),
            None => ImageProps::new(src),
        };
        Self::new(ObjectKind::Image(props), Pos2::ZERO, size)
    }

    /// Bounding rectangle in canvas coordinates
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        if let ObjectKind::Group { children } = &mut self.kind {
            for child in children {
                child.translate(delta);
            }
        }
    }

    pub fn resize(&mut self, size: Vec2) -> Result<(), String> {
        common::validate_size(size.x, size.y)?;
        self.size = size;
        Ok(())
    }

    pub fn as_text(&self) -> Option<&TextProps> {
        match &self.kind {
            ObjectKind::Text(props) => Some(props),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextProps> {
        match &mut self.kind {
            ObjectKind::Text(props) => Some(props),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageProps> {
        match &self.kind {
            ObjectKind::Image(props) => Some(props),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageProps> {
        match &mut self.kind {
            ObjectKind::Image(props) => Some(props),
            _ => None,
        }
    }

    /// Clone for the clipboard: fresh identity, offset position
    pub fn clone_for_paste(&self) -> Self {
        let mut clone = self.clone();
        clone.assign_fresh_ids();
        clone.translate(Vec2::splat(common::PASTE_OFFSET));
        clone
    }

    fn assign_fresh_ids(&mut self) {
        self.id = Uuid::new_v4();
        if let ObjectKind::Group { children } = &mut self.kind {
            for child in children {
                child.assign_fresh_ids();
            }
        }
    }
}
