//! Chunked broad-phase
//!
//! The world is cut into fixed-width vertical slices. A collidable object is
//! filed under the chunk holding its left edge and the chunk holding its right
//! edge only; a body wider than a chunk is not filed under the chunks between
//! them. The grid is rebuilt from scratch every frame and stores references,
//! not bodies, so narrow-phase checks always read positions as they are at
//! query time.

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::geometry::Rect;
use crate::SimError;

/// What a chunk entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectRef {
    /// Index into the level's static tiles
    Tile(usize),
    Entity(EntityId),
}

/// Which x-coordinate of a body selects its chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Center,
}

impl Edge {
    pub fn x_of(self, body: &Rect) -> f32 {
        match self {
            Edge::Left => body.left(),
            Edge::Right => body.right(),
            Edge::Center => body.center_x(),
        }
    }
}

impl FromStr for Edge {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Edge::Left),
            "right" => Ok(Edge::Right),
            "center" => Ok(Edge::Center),
            other => Err(SimError::InvalidEdgeSelector(other.to_string())),
        }
    }
}

/// One vertical slice of the world and what was filed under it this frame
#[derive(Debug, Clone)]
pub struct Chunk {
    pub bounds: Rect,
    pub objects: Vec<ObjectRef>,
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    chunk_width: f32,
    chunks: Vec<Chunk>,
}

impl SpatialGrid {
    /// Covers `world.x` with chunks of `tile_width * chunk_length`, plus one
    /// trailing chunk so a body flush against the right wall still has a home.
    pub fn new(world: Vec2, tile_width: f32, chunk_length: u32) -> Self {
        let chunk_width = tile_width * chunk_length as f32;
        let count = (world.x / chunk_width).ceil().max(0.0) as usize + 1;
        let chunks = (0..count)
            .map(|i| Chunk {
                bounds: Rect::new(i as f32 * chunk_width, 0.0, chunk_width, world.y.max(0.0)),
                objects: Vec::new(),
            })
            .collect();
        Self {
            chunk_width,
            chunks,
        }
    }

    pub fn chunk_width(&self) -> f32 {
        self.chunk_width
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Chunk holding `x`. Leaving the world is a fault, not a miss.
    pub fn chunk_index(&self, x: f32) -> Result<usize, SimError> {
        let out_of_bounds = |index: i64| SimError::OutOfWorldBounds {
            x,
            index,
            chunk_count: self.chunks.len(),
        };
        if !x.is_finite() {
            return Err(out_of_bounds(i64::MIN));
        }
        let index = (x / self.chunk_width).trunc() as i64;
        if index < 0 || index >= self.chunks.len() as i64 {
            return Err(out_of_bounds(index));
        }
        Ok(index as usize)
    }

    /// File `object` under the chunks of its left and right edges
    pub fn insert(&mut self, object: ObjectRef, body: &Rect) -> Result<(), SimError> {
        let left = self.chunk_index(body.left())?;
        let right = self.chunk_index(body.right())?;
        self.chunks[left].objects.push(object);
        if right != left {
            self.chunks[right].objects.push(object);
        }
        Ok(())
    }

    /// Broad-phase candidates for `body`: everything filed under the chunk at
    /// the chosen edge, in insertion order, not yet overlap-tested.
    pub fn query(&self, body: &Rect, edge: Edge) -> Result<&[ObjectRef], SimError> {
        let index = self.chunk_index(edge.x_of(body))?;
        Ok(&self.chunks[index].objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid() -> SpatialGrid {
        // 200 wide, 64-unit chunks -> ceil(3.125) + 1 = 5 chunks
        SpatialGrid::new(Vec2::new(200.0, 240.0), 16.0, 4)
    }

    fn members(grid: &SpatialGrid, object: ObjectRef) -> Vec<usize> {
        grid.chunks()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.objects.contains(&object))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_chunk_layout() {
        let grid = grid();
        assert_eq!(grid.chunk_width(), 64.0);
        assert_eq!(grid.chunk_count(), 5);
        assert_eq!(grid.chunks()[2].bounds, Rect::new(128.0, 0.0, 64.0, 240.0));

        // Exact multiple still gets the trailing margin chunk
        let exact = SpatialGrid::new(Vec2::new(256.0, 240.0), 16.0, 4);
        assert_eq!(exact.chunk_count(), 5);
    }

    #[test]
    fn test_insert_spanning_two_chunks() {
        let mut grid = grid();
        let object = ObjectRef::Tile(0);
        grid.insert(object, &Rect::new(56.0, 0.0, 16.0, 16.0)).unwrap();
        assert_eq!(members(&grid, object), vec![0, 1]);
    }

    #[test]
    fn test_insert_single_chunk_once() {
        let mut grid = grid();
        let object = ObjectRef::Entity(EntityId(3));
        grid.insert(object, &Rect::new(10.0, 0.0, 16.0, 16.0)).unwrap();
        assert_eq!(grid.chunks()[0].objects, vec![object]);
    }

    #[test]
    fn test_wide_body_skips_middle_chunks() {
        let mut grid = grid();
        let object = ObjectRef::Tile(1);
        grid.insert(object, &Rect::new(10.0, 0.0, 150.0, 16.0)).unwrap();
        assert_eq!(members(&grid, object), vec![0, 2]);
        let probe = Rect::new(70.0, 0.0, 4.0, 4.0);
        assert!(grid.query(&probe, Edge::Left).unwrap().is_empty());
    }

    #[test]
    fn test_query_edges() {
        let mut grid = grid();
        grid.insert(ObjectRef::Tile(0), &Rect::new(0.0, 0.0, 16.0, 16.0)).unwrap();
        grid.insert(ObjectRef::Tile(1), &Rect::new(70.0, 0.0, 16.0, 16.0)).unwrap();

        let body = Rect::new(50.0, 0.0, 20.0, 16.0);
        assert_eq!(grid.query(&body, Edge::Left).unwrap(), &[ObjectRef::Tile(0)]);
        assert_eq!(grid.query(&body, Edge::Right).unwrap(), &[ObjectRef::Tile(1)]);
        assert_eq!(grid.query(&body, Edge::Center).unwrap(), &[ObjectRef::Tile(0)]);
    }

    #[test]
    fn test_out_of_world_is_fatal() {
        let grid = grid();
        let err = grid.query(&Rect::new(400.0, 0.0, 16.0, 16.0), Edge::Left).unwrap_err();
        assert_eq!(
            err,
            SimError::OutOfWorldBounds {
                x: 400.0,
                index: 6,
                chunk_count: 5
            }
        );
        assert!(matches!(
            grid.chunk_index(-100.0),
            Err(SimError::OutOfWorldBounds { index: -1, .. })
        ));
        assert!(grid.chunk_index(f32::NAN).is_err());

        // The trailing chunk ends at 320
        let mut grid = grid;
        assert!(grid.insert(ObjectRef::Tile(0), &Rect::new(304.0, 0.0, 16.0, 16.0)).is_ok());
        assert!(grid.insert(ObjectRef::Tile(1), &Rect::new(330.0, 0.0, 16.0, 16.0)).is_err());
    }

    #[test]
    fn test_edge_selector_parsing() {
        assert_eq!("left".parse::<Edge>().unwrap(), Edge::Left);
        assert_eq!("center".parse::<Edge>().unwrap(), Edge::Center);
        assert_eq!(
            "middle".parse::<Edge>(),
            Err(SimError::InvalidEdgeSelector("middle".into()))
        );
    }

    proptest! {
        #[test]
        fn insert_fills_exactly_edge_chunks(x in 0.0f32..180.0, w in 0.0f32..20.0) {
            let mut grid = grid();
            let body = Rect::new(x, 0.0, w, 16.0);
            let object = ObjectRef::Tile(9);
            grid.insert(object, &body).unwrap();

            let left = grid.chunk_index(body.left()).unwrap();
            let right = grid.chunk_index(body.right()).unwrap();
            let mut expected = vec![left];
            if right != left {
                expected.push(right);
            }
            prop_assert_eq!(members(&grid, object), expected);

            // Any point inside the left chunk surfaces the object
            let probe = Rect::new(left as f32 * 64.0 + 1.0, 0.0, 1.0, 1.0);
            prop_assert!(grid.query(&probe, Edge::Left).unwrap().contains(&object));
        }
    }
}
