//! Frame description for an external rasterizer
//!
//! `scene::build` turns the world into an ordered `DrawList`; a `Renderer`
//! backend owns the pixels. Sprites can also be exported as a flat
//! `SpriteInstance` batch for direct GPU upload.

pub mod scene;
pub mod vertex;

use glam::Vec2;

pub use scene::build;
pub use vertex::{SpriteInstance, colors};

/// Text style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Decorative heading face
    Title,
    Body,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear([f32; 4]),
    /// Image at `position`; `frame` selects a cell of width `frame_size.x`
    /// from a horizontal sheet, or the whole image when `frame_size` is zero
    Sprite {
        image: &'static str,
        position: Vec2,
        frame: u32,
        frame_size: Vec2,
    },
    Rect {
        position: Vec2,
        size: Vec2,
        color: [f32; 4],
    },
    /// Centered text
    Text {
        text: String,
        position: Vec2,
        size_pt: f32,
        font: Font,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self, color: [f32; 4]) {
        self.commands.push(DrawCommand::Clear(color));
    }

    pub fn image(&mut self, image: &'static str, position: Vec2) {
        self.sprite(image, position, 0, Vec2::ZERO);
    }

    pub fn sprite(&mut self, image: &'static str, position: Vec2, frame: u32, frame_size: Vec2) {
        self.commands.push(DrawCommand::Sprite {
            image,
            position,
            frame,
            frame_size,
        });
    }

    pub fn rect(&mut self, position: Vec2, size: Vec2, color: [f32; 4]) {
        self.commands.push(DrawCommand::Rect { position, size, color });
    }

    pub fn text(&mut self, text: impl Into<String>, position: Vec2, size_pt: f32, font: Font) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            position,
            size_pt,
            font,
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn sprites_of<'a>(&'a self, image: &'a str) -> impl Iterator<Item = &'a DrawCommand> + 'a {
        self.commands
            .iter()
            .filter(move |c| matches!(c, DrawCommand::Sprite { image: i, .. } if *i == image))
    }

    /// Flatten the sprite commands into GPU instances. `texture_of` maps an
    /// image name to the host's texture index; unknown images are skipped.
    pub fn sprite_instances(&self, texture_of: impl Fn(&str) -> Option<(u32, Vec2)>) -> Vec<SpriteInstance> {
        self.commands
            .iter()
            .filter_map(|c| {
                let DrawCommand::Sprite {
                    image,
                    position,
                    frame,
                    frame_size,
                } = c
                else {
                    return None;
                };
                let (texture, image_size) = texture_of(image)?;
                let size = if *frame_size == Vec2::ZERO { image_size } else { *frame_size };
                let src_x = *frame as f32 * frame_size.x;
                Some(SpriteInstance::new(
                    [position.x, position.y, size.x, size.y],
                    [src_x, 0.0, size.x, size.y],
                    colors::WHITE,
                    texture,
                ))
            })
            .collect()
    }
}

/// Backend that presents a finished frame
pub trait Renderer {
    fn render(&mut self, list: &DrawList);
}

/// Discards frames; counts them for diagnostics
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
    pub last_len: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, list: &DrawList) {
        self.frames += 1;
        self.last_len = list.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_instances() {
        let mut list = DrawList::new();
        list.clear(colors::SCREEN);
        list.sprite("paladinRun.png", Vec2::new(10.0, 20.0), 3, Vec2::new(130.0, 176.0));
        list.image("arrow.png", Vec2::new(5.0, 5.0));
        list.image("missing.png", Vec2::ZERO);
        list.text("Paused", Vec2::ZERO, 30.0, Font::Body);

        let batch = list.sprite_instances(|name| match name {
            "paladinRun.png" => Some((0, Vec2::new(3640.0, 176.0))),
            "arrow.png" => Some((1, Vec2::new(45.0, 13.0))),
            _ => None,
        });
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].src, [390.0, 0.0, 130.0, 176.0]);
        assert_eq!(batch[1].dest, [5.0, 5.0, 45.0, 13.0]);
        assert_eq!(batch[1].texture, 1);
    }

    #[test]
    fn test_null_renderer() {
        let mut list = DrawList::new();
        list.clear(colors::SCREEN);
        let mut renderer = NullRenderer::default();
        renderer.render(&list);
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.last_len, 1);
        assert_eq!(list.texts().count(), 0);
    }
}
