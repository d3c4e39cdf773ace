//! Camera-relative, depth-sorted compositing.
//!
//! The gameplay core never touches a graphics API. Each frame the world
//! collects [`RenderItem`]s and [`RenderGroup::draw`] hands them, in paint
//! order and already offset by the camera, to a [`RenderSink`].

use hunter_common::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::content::Frame;

/// Paint layers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldLayer {
    /// Animated water
    Water,
    /// Terrain, coast, sand patches
    Background,
    /// Reserved for shadows
    Shadow,
    /// Entities and props, depth sorted
    Main,
    /// Tree tops, dialog bubbles
    Top,
}

/// One image to draw this frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderItem<'a> {
    /// Image to blit
    pub image: &'a Frame,
    /// Bounding box in world space
    pub rect: Rect,
    /// Ordering key within [`WorldLayer::Main`]
    pub depth_key: f32,
    /// Paint layer
    pub layer: WorldLayer,
    /// Draw the entity shadow underneath
    pub casts_shadow: bool,
}

/// Consumer of composited blits (a window, a recorder, a log).
pub trait RenderSink {
    /// Draw `image` with its top-left corner at `screen_pos`.
    fn blit(&mut self, image: &Frame, screen_pos: Vec2);
}

impl RenderSink for Vec<(String, Vec2)> {
    fn blit(&mut self, image: &Frame, screen_pos: Vec2) {
        self.push((image.id.clone(), screen_pos));
    }
}

/// Camera and paint-order policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderGroup {
    window_size: Vec2,
    shadow_offset: Vec2,
    shadow: Option<Frame>,
}

impl RenderGroup {
    /// Create a render group for a window of `window_size` pixels.
    #[must_use]
    pub fn new(window_size: Vec2, shadow_offset: Vec2, shadow: Option<Frame>) -> Self {
        Self {
            window_size,
            shadow_offset,
            shadow,
        }
    }

    /// Screen offset that puts `center` in the middle of the window.
    #[must_use]
    pub fn camera_offset(&self, center: Vec2) -> Vec2 {
        -(center - self.window_size / 2.0)
    }

    /// Draw `items` centred on `center`.
    ///
    /// Layers below [`WorldLayer::Main`] come first in insertion order, then
    /// main items sorted by depth key (stable), then layers above main.
    /// Shadow-casting items get the shadow blitted before their own image.
    /// Returns the number of blits issued.
    pub fn draw<'a>(
        &self,
        center: Vec2,
        items: impl IntoIterator<Item = RenderItem<'a>>,
        sink: &mut impl RenderSink,
    ) -> usize {
        let offset = self.camera_offset(center);

        let mut background = Vec::new();
        let mut main = Vec::new();
        let mut foreground = Vec::new();
        for item in items {
            match item.layer.cmp(&WorldLayer::Main) {
                std::cmp::Ordering::Less => background.push(item),
                std::cmp::Ordering::Equal => main.push(item),
                std::cmp::Ordering::Greater => foreground.push(item),
            }
        }
        main.sort_by(|a, b| a.depth_key.total_cmp(&b.depth_key));

        let mut blits = 0;
        for item in background.iter().chain(&main).chain(&foreground) {
            let topleft = item.rect.topleft() + offset;
            if item.casts_shadow {
                if let Some(shadow) = &self.shadow {
                    sink.blit(shadow, topleft + self.shadow_offset);
                    blits += 1;
                }
            }
            sink.blit(item.image, topleft);
            blits += 1;
        }
        blits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(image: &Frame, x: f32, y: f32, layer: WorldLayer, shadow: bool) -> RenderItem<'_> {
        let rect = Rect::new(x, y, 10.0, 10.0);
        RenderItem {
            image,
            rect,
            depth_key: rect.center_y(),
            layer,
            casts_shadow: shadow,
        }
    }

    #[test]
    fn test_layer_order() {
        assert!(WorldLayer::Water < WorldLayer::Background);
        assert!(WorldLayer::Background < WorldLayer::Shadow);
        assert!(WorldLayer::Shadow < WorldLayer::Main);
        assert!(WorldLayer::Main < WorldLayer::Top);
    }

    #[test]
    fn test_camera_centres_target() {
        let group = RenderGroup::new(Vec2::new(1280.0, 720.0), Vec2::new(40.0, 110.0), None);
        assert_eq!(group.camera_offset(Vec2::new(640.0, 360.0)), Vec2::ZERO);
        assert_eq!(
            group.camera_offset(Vec2::new(1000.0, 500.0)),
            Vec2::new(-360.0, -140.0)
        );
    }

    #[test]
    fn test_paint_order() {
        let group = RenderGroup::new(Vec2::new(100.0, 100.0), Vec2::ZERO, None);
        let top = Frame::new("top", 10, 10);
        let far = Frame::new("far", 10, 10);
        let near = Frame::new("near", 10, 10);
        let water = Frame::new("water", 10, 10);

        let items = [
            item(&top, 0.0, 0.0, WorldLayer::Top, false),
            item(&near, 0.0, 50.0, WorldLayer::Main, false),
            item(&far, 0.0, 10.0, WorldLayer::Main, false),
            item(&water, 0.0, 0.0, WorldLayer::Water, false),
        ];
        let mut sink: Vec<(String, Vec2)> = Vec::new();
        assert_eq!(group.draw(Vec2::new(50.0, 50.0), items, &mut sink), 4);

        let order: Vec<&str> = sink.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, ["water", "far", "near", "top"]);
    }

    #[test]
    fn test_shadow_drawn_before_entity() {
        let shadow = Frame::new("shadow", 8, 4);
        let group = RenderGroup::new(
            Vec2::new(100.0, 100.0),
            Vec2::new(40.0, 110.0),
            Some(shadow),
        );
        let body = Frame::new("body", 10, 10);
        let mut sink: Vec<(String, Vec2)> = Vec::new();
        group.draw(
            Vec2::new(50.0, 50.0),
            [item(&body, 20.0, 30.0, WorldLayer::Main, true)],
            &mut sink,
        );
        assert_eq!(
            sink,
            vec![
                ("shadow".to_string(), Vec2::new(60.0, 140.0)),
                ("body".to_string(), Vec2::new(20.0, 30.0)),
            ]
        );
    }
}
