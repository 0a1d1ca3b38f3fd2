//! 2D drawing surface abstraction
//!
//! Games draw through the `Surface` trait. The browser backend forwards to a
//! canvas 2D context; `DrawList` records commands for headless runs and tests.

pub mod palette;
pub mod scene;

use glam::Vec2;

pub use palette::Palette;
pub use scene::{draw_dodger, draw_platformer, SceneOptions};

/// RGBA color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                self.a.clamp(0.0, 1.0)
            )
        }
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Minimal 2D drawing surface
pub trait Surface {
    /// Current width/height in surface pixels
    fn size(&self) -> Vec2;
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    /// Fill a rectangle with a top-to-bottom two-stop gradient
    fn fill_vertical_gradient(&mut self, x: f32, y: f32, w: f32, h: f32, top: Color, bottom: Color);
    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: Color);
    /// Axis-aligned square of side `size` rotated about its center
    fn fill_rotated_rect(&mut self, center: Vec2, size: f32, rotation: f32, color: Color);
    /// Map later drawing through `p * scale + offset`; `(1.0, ZERO)` is identity
    fn set_view(&mut self, scale: f32, offset: Vec2);
}

/// Uniform scale and centring offset that fit `view` inside `surface`
pub fn letterbox(view: Vec2, surface: Vec2) -> (f32, Vec2) {
    let scale = (surface.x / view.x).min(surface.y / view.y);
    if !scale.is_finite() || scale <= 0.0 {
        return (1.0, Vec2::ZERO);
    }
    (scale, (surface - view * scale) / 2.0)
}

/// One recorded drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Line { from: Vec2, to: Vec2, width: f32, color: Color },
    Gradient { x: f32, y: f32, w: f32, h: f32, top: Color, bottom: Color },
    Text { text: String, pos: Vec2, size_px: f32, align: TextAlign, color: Color },
    RotatedRect { center: Vec2, size: f32, rotation: f32, color: Color },
    View { scale: f32, offset: Vec2 },
}

/// Recording surface with a fixed size
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub size: Vec2,
    pub commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every text string drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count_rects_with(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Rect { color: c, .. } if *c == color))
            .count()
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCmd::Rect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCmd::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_vertical_gradient(&mut self, x: f32, y: f32, w: f32, h: f32, top: Color, bottom: Color) {
        self.commands.push(DrawCmd::Gradient {
            x,
            y,
            w,
            h,
            top,
            bottom,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: Color) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            pos,
            size_px,
            align,
            color,
        });
    }

    fn fill_rotated_rect(&mut self, center: Vec2, size: f32, rotation: f32, color: Color) {
        self.commands.push(DrawCmd::RotatedRect {
            center,
            size,
            rotation,
            color,
        });
    }

    fn set_view(&mut self, scale: f32, offset: Vec2) {
        self.commands.push(DrawCmd::View { scale, offset });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse() {
        let c = Color::from_hex("#ff7b2f").unwrap();
        assert_eq!(c.to_css(), "#ff7b2f");
        assert!(Color::from_hex("ff7b2f").is_none());
        assert!(Color::from_hex("#ff7b").is_none());
        assert!(Color::from_hex("#gg0000").is_none());
    }

    #[test]
    fn test_translucent_css() {
        let c = Color::rgb(255, 0, 0).with_alpha(0.5);
        assert_eq!(c.to_css(), "rgba(255, 0, 0, 0.500)");
        assert_eq!(Color::rgb(0, 0, 0).with_alpha(7.0).a, 1.0);
    }

    #[test]
    fn test_draw_list_records() {
        let mut list = DrawList::new(100.0, 50.0);
        let white = Color::rgb(255, 255, 255);
        list.fill_rect(0.0, 0.0, 10.0, 10.0, white);
        list.fill_text("hi", Vec2::ZERO, 12.0, TextAlign::Left, white);
        assert_eq!(list.size(), Vec2::new(100.0, 50.0));
        assert_eq!(list.len(), 2);
        assert_eq!(list.texts(), vec!["hi"]);
        assert_eq!(list.count_rects_with(white), 1);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_letterbox_fits_and_centres() {
        let view = Vec2::new(960.0, 540.0);
        assert_eq!(letterbox(view, view), (1.0, Vec2::ZERO));
        assert_eq!(letterbox(view, Vec2::new(1920.0, 1200.0)), (2.0, Vec2::new(0.0, 60.0)));
        assert_eq!(letterbox(view, Vec2::new(480.0, 540.0)), (0.5, Vec2::new(0.0, 135.0)));
        // A collapsed canvas falls back to identity
        assert_eq!(letterbox(view, Vec2::ZERO), (1.0, Vec2::ZERO));
    }
}
