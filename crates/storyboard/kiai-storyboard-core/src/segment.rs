//! Authoring containers and the transform they apply to exported sprites.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::sprite::{Animation, LoopType, Origin, Sample, Sprite};
use crate::value::{Position, Scale};

/// A 2D affine transform composed down a container chain and applied to
/// positions, rotations and scales as they are written.
///
/// The matrix is row-major with translation:
/// `x' = m[0] x + m[1] y + m[2]`, `y' = m[3] x + m[4] y + m[5]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryboardTransform {
    matrix: [f64; 6],
    angle: f64,
    scale: f64,
}

impl StoryboardTransform {
    pub fn identity() -> Self {
        Self {
            matrix: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            angle: 0.0,
            scale: 1.0,
        }
    }

    /// Translate to `position`, rotate, scale uniformly, then shift by the
    /// negated `origin`, composed under `parent`.
    pub fn new(
        parent: Option<&StoryboardTransform>,
        origin: Position,
        position: Position,
        rotation: f64,
        scale: f64,
    ) -> Self {
        let (sin, cos) = rotation.sin_cos();
        let m00 = cos * scale;
        let m01 = -sin * scale;
        let m10 = sin * scale;
        let m11 = cos * scale;
        let local = [
            m00,
            m01,
            position.x - (m00 * origin.x + m01 * origin.y),
            m10,
            m11,
            position.y - (m10 * origin.x + m11 * origin.y),
        ];
        match parent {
            Some(parent) => Self {
                matrix: compose(parent.matrix, local),
                angle: parent.angle + rotation,
                scale: parent.scale * scale,
            },
            None => Self {
                matrix: local,
                angle: rotation,
                scale,
            },
        }
    }

    #[inline]
    pub fn apply_to_position(&self, value: Position) -> Position {
        Position::new(
            self.matrix[0] * value.x + self.matrix[1] * value.y + self.matrix[2],
            self.matrix[3] * value.x + self.matrix[4] * value.y + self.matrix[5],
        )
    }

    /// X-only moves cannot carry the cross terms of a rotated transform; the
    /// other axis contributes nothing.
    #[inline]
    pub fn apply_to_position_x(&self, value: f64) -> f64 {
        self.matrix[0] * value + self.matrix[2]
    }

    #[inline]
    pub fn apply_to_position_y(&self, value: f64) -> f64 {
        self.matrix[4] * value + self.matrix[5]
    }

    #[inline]
    pub fn apply_to_rotation(&self, value: f64) -> f64 {
        value + self.angle
    }

    #[inline]
    pub fn apply_to_scale(&self, value: f64) -> f64 {
        value * self.scale
    }

    #[inline]
    pub fn apply_to_scale_vec(&self, value: Scale) -> Scale {
        Scale::new(value.x * self.scale, value.y * self.scale)
    }
}

impl Default for StoryboardTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[inline]
fn compose(a: [f64; 6], b: [f64; 6]) -> [f64; 6] {
    [
        a[0] * b[0] + a[1] * b[3],
        a[0] * b[1] + a[1] * b[4],
        a[0] * b[2] + a[1] * b[5] + a[2],
        a[3] * b[0] + a[4] * b[3],
        a[3] * b[1] + a[4] * b[4],
        a[3] * b[2] + a[4] * b[5] + a[5],
    ]
}

/// One element owned by a segment, in authoring order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Element {
    Sprite(Sprite),
    Animation(Animation),
    Sample(Sample),
    Segment(Segment),
}

/// An authoring container. Child segments carry their own placement,
/// composed onto their parents' at write time; elements keep the order they
/// were created in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub origin: Position,
    pub position: Position,
    /// Radians.
    pub rotation: f64,
    pub scale: f64,
    elements: Vec<Element>,
    named: HashMap<String, usize>,
}

impl Segment {
    pub fn new() -> Self {
        Self {
            origin: Position::new(0.0, 0.0),
            position: Position::new(0.0, 0.0),
            rotation: 0.0,
            scale: 1.0,
            elements: Vec::new(),
            named: HashMap::new(),
        }
    }

    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// This segment's placement composed under `parent`.
    pub fn transform(&self, parent: Option<&StoryboardTransform>) -> StoryboardTransform {
        StoryboardTransform::new(parent, self.origin, self.position, self.rotation, self.scale)
    }

    pub fn create_sprite(
        &mut self,
        texture_path: impl Into<String>,
        origin: Origin,
        initial_position: Position,
    ) -> &mut Sprite {
        self.elements
            .push(Element::Sprite(Sprite::with_origin(texture_path, origin, initial_position)));
        match self.elements.last_mut() {
            Some(Element::Sprite(sprite)) => sprite,
            _ => unreachable!(),
        }
    }

    pub fn create_animation(
        &mut self,
        texture_path: impl Into<String>,
        frame_count: u32,
        frame_delay: f64,
        loop_type: LoopType,
        origin: Origin,
        initial_position: Position,
    ) -> &mut Animation {
        self.elements.push(Element::Animation(Animation::new(
            texture_path,
            frame_count,
            frame_delay,
            loop_type,
            origin,
            initial_position,
        )));
        match self.elements.last_mut() {
            Some(Element::Animation(animation)) => animation,
            _ => unreachable!(),
        }
    }

    pub fn create_sample(
        &mut self,
        audio_path: impl Into<String>,
        time: f64,
        volume: f64,
    ) -> &mut Sample {
        self.elements
            .push(Element::Sample(Sample::new(audio_path, time, volume)));
        match self.elements.last_mut() {
            Some(Element::Sample(sample)) => sample,
            _ => unreachable!(),
        }
    }

    /// An anonymous child segment.
    pub fn create_segment(&mut self) -> &mut Segment {
        self.elements.push(Element::Segment(Segment::new()));
        match self.elements.last_mut() {
            Some(Element::Segment(segment)) => segment,
            _ => unreachable!(),
        }
    }

    /// The child segment registered under `name`, created on first use.
    pub fn named_segment(&mut self, name: impl Into<String>) -> &mut Segment {
        let name = name.into();
        let index = match self.named.get(&name) {
            Some(&index) => index,
            None => {
                let index = self.elements.len();
                self.elements.push(Element::Segment(Segment::new()));
                self.named.insert(name, index);
                index
            }
        };
        // Named entries only ever point at segment elements.
        match &mut self.elements[index] {
            Element::Segment(segment) => segment,
            _ => unreachable!(),
        }
    }
}

impl Default for Segment {
    fn default() -> Self {
        Self::new()
    }
}
