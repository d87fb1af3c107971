//! Presentation snapshot
//!
//! The renderer owns sprites and textures. Each frame it asks for one
//! `SpriteFrame` per entity and shows the animation named by `key`.

use serde::Serialize;

use super::context::Camera;
use super::entity::{Entity, EntityId};
use crate::SimError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteFrame {
    pub id: EntityId,
    /// Animation to show; always one of the kind's animations
    pub key: &'static str,
    /// Camera-relative position
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub visible: bool,
    /// Play the animation or hold its current frame
    pub animating: bool,
    pub scale_x: f32,
    pub anchor_x: f32,
}

pub fn sprite_frame(entity: &Entity, camera: &Camera) -> Result<SpriteFrame, SimError> {
    let key = entity.current_animation_key()?;
    let actor = &entity.actor;
    let flipped = actor.physics.last_attempted_velocity.x < 0.0 && actor.look.flips;
    let facing = if flipped {
        actor.look.flipped
    } else {
        actor.look.normal
    };
    Ok(SpriteFrame {
        id: actor.id,
        key,
        x: actor.body.x - camera.x,
        y: actor.body.y - camera.y,
        rotation: actor.look.rotation,
        visible: actor.visible,
        animating: actor.look.animating,
        scale_x: facing.scale,
        anchor_x: facing.anchor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn camera() -> Camera {
        Camera {
            x: 40.0,
            y: -8.0,
            w: 256.0,
            h: 240.0,
            scale: 1.0,
        }
    }

    #[test]
    fn test_position_is_camera_relative() {
        let entity = Entity::coin(Vec2::new(100.0, 50.0));
        let frame = sprite_frame(&entity, &camera()).unwrap();
        assert_eq!((frame.x, frame.y), (60.0, 58.0));
        assert_eq!(frame.key, "idle");
        assert!(frame.visible);
    }

    #[test]
    fn test_heading_left_flips() {
        // Goombas start out heading left
        let goomba = Entity::goomba(Vec2::new(100.0, 50.0));
        let frame = sprite_frame(&goomba, &camera()).unwrap();
        assert_eq!((frame.scale_x, frame.anchor_x), (-1.0, 1.0));

        // Mushrooms never flip
        let mut mushroom = Entity::mushroom(Vec2::new(100.0, 50.0));
        mushroom.actor.physics.last_attempted_velocity.x = -100.0;
        let frame = sprite_frame(&mushroom, &camera()).unwrap();
        assert_eq!((frame.scale_x, frame.anchor_x), (1.0, 0.0));
    }

    #[test]
    fn test_missing_animation_is_fatal() {
        let vacant = Entity::vacant(EntityId(0));
        assert!(matches!(
            sprite_frame(&vacant, &camera()),
            Err(SimError::AnimationKeyMissing { .. })
        ));
    }
}
