//! RNG module - where the next shape and color come from
//!
//! [`ShapeSource`] is the seam between the game loop and randomness. The game
//! uses [`SimpleRng`] (uniform choice from a seeded LCG); tests plug in a
//! [`ScriptedSource`] to replay a fixed sequence.
//!
//! [`Lookahead`] keeps the current and the queued shape/color apart from the
//! piece itself so a renderer can preview the next piece.

use arrayvec::ArrayVec;

use crate::types::{BlockColor, ShapeKind};

/// Supplier of shapes and colors for newly spawned pieces
pub trait ShapeSource {
    /// Pick one of `candidates`, which is never empty
    fn next_shape(&mut self, candidates: &[ShapeKind]) -> ShapeKind;

    fn next_color(&mut self) -> BlockColor;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by the high bits; the low bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

impl ShapeSource for SimpleRng {
    fn next_shape(&mut self, candidates: &[ShapeKind]) -> ShapeKind {
        assert!(!candidates.is_empty(), "no shape to choose from");
        candidates[self.next_range(candidates.len() as u32) as usize]
    }

    fn next_color(&mut self) -> BlockColor {
        BlockColor::ALL[self.next_range(BlockColor::ALL.len() as u32) as usize]
    }
}

/// Replays fixed shape and color sequences, cycling when they run out
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    shapes: Vec<ShapeKind>,
    colors: Vec<BlockColor>,
    shape_index: usize,
    color_index: usize,
}

impl ScriptedSource {
    /// # Panics
    ///
    /// Panics if either sequence is empty.
    pub fn new(shapes: Vec<ShapeKind>, colors: Vec<BlockColor>) -> Self {
        assert!(!shapes.is_empty(), "scripted shapes must not be empty");
        assert!(!colors.is_empty(), "scripted colors must not be empty");
        Self {
            shapes,
            colors,
            shape_index: 0,
            color_index: 0,
        }
    }
}

impl ShapeSource for ScriptedSource {
    /// Next scripted shape that is a candidate; non-candidates are skipped.
    fn next_shape(&mut self, candidates: &[ShapeKind]) -> ShapeKind {
        for _ in 0..self.shapes.len() {
            let shape = self.shapes[self.shape_index];
            self.shape_index = (self.shape_index + 1) % self.shapes.len();
            if candidates.contains(&shape) {
                return shape;
            }
        }
        panic!("scripted shapes {:?} contain none of {:?}", self.shapes, candidates);
    }

    fn next_color(&mut self) -> BlockColor {
        let color = self.colors[self.color_index];
        self.color_index = (self.color_index + 1) % self.colors.len();
        color
    }
}

/// Current and upcoming shape/color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lookahead {
    current: Option<(ShapeKind, BlockColor)>,
    next: Option<(ShapeKind, BlockColor)>,
}

impl Lookahead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<(ShapeKind, BlockColor)> {
        self.current
    }

    pub fn next(&self) -> Option<(ShapeKind, BlockColor)> {
        self.next
    }

    /// Promote the queued shape to current and queue a new one.
    ///
    /// The first call draws both fresh. The queued shape is always different
    /// from the current one; colors are drawn independently.
    pub fn advance(&mut self, source: &mut impl ShapeSource) -> (ShapeKind, BlockColor) {
        let current = match (self.current, self.next) {
            (Some(_), Some(next)) => next,
            _ => (source.next_shape(&ShapeKind::ALL), source.next_color()),
        };

        let others: ArrayVec<ShapeKind, 7> = ShapeKind::ALL
            .iter()
            .copied()
            .filter(|&kind| kind != current.0)
            .collect();
        let next = (source.next_shape(&others), source.next_color());

        self.current = Some(current);
        self.next = Some(next);
        current
    }

    /// Forget both entries; the next advance draws fresh.
    pub fn reset(&mut self) {
        self.current = None;
        self.next = None;
    }
}
