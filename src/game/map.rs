//! World map: tiles, coordinates and terrain generation.

// Generation and iteration cast bounded u32/usize values into u16 coordinates
#![allow(clippy::cast_possible_truncation)]

use std::fmt;

use crate::rng::GameRng;

/// Map width in tiles.
pub const MAP_WIDTH: u16 = 80;
/// Map height in tiles.
pub const MAP_HEIGHT: u16 = 64;

/// Number of cells considered for tree placement during generation.
const TREE_ATTEMPTS: u32 = 300;
/// Chance (percent) that a tree attempt actually places a tree.
const TREE_CHANCE: u32 = 60;

/// A coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Coordinate one step in `direction`, or `None` if it would leave `u16` space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        let x = u16::try_from(i32::from(self.x) + dx).ok()?;
        let y = u16::try_from(i32::from(self.y) + dy).ok()?;
        Some(Self::new(x, y))
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }

    /// True iff `other` is exactly one orthogonal step away.
    ///
    /// Standing on the same cell does not count.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

/// One of the four walking directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Offset applied to a coordinate when stepping this way.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Kind of terrain or structure on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tile {
    /// Bare ground.
    Empty = 0,
    /// Meadow; wild creatures hide here.
    Grass = 1,
    /// Source of wood.
    Tree = 2,
    /// Impassable rock.
    Wall = 3,
    /// Impassable lake.
    Water = 4,
    /// Desert; wild creatures hide here too.
    Sand = 5,
    /// Starting camp floor.
    Base = 6,
    /// Defensive tower (built).
    Tower = 7,
    /// Farm, yields wood (built).
    Farm = 8,
    /// Campfire, heals companions (built).
    Fire = 9,
    /// Work post, yields wood or stone (built).
    WorkPost = 10,
}

impl Tile {
    /// Whether walking onto this tile is forbidden.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Tile::Wall | Tile::Water)
    }

    /// Whether a building may replace this tile.
    #[must_use]
    pub const fn is_buildable(self) -> bool {
        matches!(self, Tile::Empty | Tile::Base | Tile::Grass | Tile::Sand)
    }

    /// Whether wild creatures can be flushed out of this tile.
    #[must_use]
    pub const fn hides_creatures(self) -> bool {
        matches!(self, Tile::Grass | Tile::Sand)
    }

    /// Glyph used in the world view.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Grass => 'G',
            Tile::Tree => 'Y',
            Tile::Wall => '#',
            Tile::Water => 'W',
            Tile::Sand => 'S',
            Tile::Base => '=',
            Tile::Tower => 'T',
            Tile::Farm => 'F',
            Tile::Fire => 'H',
            Tile::WorkPost => 'P',
        }
    }

    /// Glyph used in the minimap.
    #[must_use]
    pub const fn minimap_glyph(self) -> char {
        match self {
            Tile::Grass => 'g',
            Tile::Tree => 'y',
            Tile::Water => 'w',
            Tile::Sand => 's',
            Tile::Wall => '#',
            Tile::Base => '=',
            Tile::Tower => 't',
            Tile::Farm => 'f',
            Tile::Fire => 'h',
            Tile::WorkPost => 'p',
            Tile::Empty => '.',
        }
    }

    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Tile::Empty => "ground",
            Tile::Grass => "grass",
            Tile::Tree => "tree",
            Tile::Wall => "wall",
            Tile::Water => "water",
            Tile::Sand => "sand",
            Tile::Base => "base",
            Tile::Tower => "tower",
            Tile::Farm => "farm",
            Tile::Fire => "campfire",
            Tile::WorkPost => "work post",
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The world grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldMap {
    /// Width of the map in tiles.
    width: u16,
    /// Height of the map in tiles.
    height: u16,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
}

impl WorldMap {
    /// Create a map of the given size filled with grass and ringed by walls.
    ///
    /// Returns `None` if either side is shorter than 3 (no interior).
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width < 3 || height < 3 {
            return None;
        }

        Some(Self::ringed(width, height))
    }

    /// Grass interior inside a wall ring. Callers guarantee both sides are at least 3.
    fn ringed(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        let mut map = Self {
            width,
            height,
            tiles: vec![Tile::Grass; size],
        };
        map.fill_rect(Coord::new(0, 0), Coord::new(width - 1, 0), Tile::Wall);
        map.fill_rect(Coord::new(0, height - 1), Coord::new(width - 1, height - 1), Tile::Wall);
        map.fill_rect(Coord::new(0, 0), Coord::new(0, height - 1), Tile::Wall);
        map.fill_rect(Coord::new(width - 1, 0), Coord::new(width - 1, height - 1), Tile::Wall);
        map
    }

    /// Generate the standard 80×64 world.
    ///
    /// Layout: grass interior inside a wall ring, scattered trees, a lake in
    /// the north-east, a desert in the south-west, two mountain ridges and
    /// the starting base in the north-west corner.
    #[must_use]
    pub fn generate(rng: &mut GameRng) -> Self {
        let mut map = Self::ringed(MAP_WIDTH, MAP_HEIGHT);

        // Woods
        let max_x = u32::from(MAP_WIDTH) - 3;
        let max_y = u32::from(MAP_HEIGHT) - 3;
        for _ in 0..TREE_ATTEMPTS {
            let x = rng.range(2, max_x);
            let y = rng.range(2, max_y);
            if rng.chance(TREE_CHANCE) {
                map.set(Coord::new(x as u16, y as u16), Tile::Tree);
            }
        }

        // Lake and desert
        map.fill_rect(Coord::new(50, 6), Coord::new(72, 16), Tile::Water);
        map.fill_rect(Coord::new(8, 36), Coord::new(30, 56), Tile::Sand);

        // Mountain ridges
        map.fill_rect(Coord::new(44, 18), Coord::new(44, 53), Tile::Wall);
        map.fill_rect(Coord::new(20, 28), Coord::new(39, 28), Tile::Wall);

        // Starting base
        map.fill_rect(Coord::new(2, 2), Coord::new(9, 7), Tile::Base);

        map
    }

    /// Get the width of the map.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the map.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Check if a coordinate is within the map bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Check if a coordinate lies strictly inside the border ring.
    #[must_use]
    pub const fn is_interior(&self, coord: Coord) -> bool {
        coord.x >= 1 && coord.y >= 1 && coord.x + 1 < self.width && coord.y + 1 < self.height
    }

    /// Check if a coordinate is on the border ring.
    #[must_use]
    pub const fn is_border(&self, coord: Coord) -> bool {
        self.in_bounds(coord) && !self.is_interior(coord)
    }

    /// Convert a coordinate to an index into the tiles array.
    fn coord_to_index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Tile at the given coordinate, `None` when out of bounds.
    #[must_use]
    pub fn tile_at(&self, coord: Coord) -> Option<Tile> {
        self.coord_to_index(coord).map(|idx| self.tiles[idx])
    }

    /// Set the tile at the given coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, tile: Tile) -> bool {
        if let Some(idx) = self.coord_to_index(coord) {
            self.tiles[idx] = tile;
            true
        } else {
            false
        }
    }

    /// Fill the inclusive rectangle `from..=to` with `tile`, clipped to the map.
    pub fn fill_rect(&mut self, from: Coord, to: Coord, tile: Tile) {
        for y in from.y..=to.y {
            for x in from.x..=to.x {
                self.set(Coord::new(x, y), tile);
            }
        }
    }

    /// Whether the player may stand on `coord`.
    #[must_use]
    pub fn is_walkable(&self, coord: Coord) -> bool {
        self.is_interior(coord) && self.tile_at(coord).is_some_and(|t| !t.is_blocking())
    }

    /// Iterate over all coordinates and tiles.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        let width = usize::from(self.width);
        self.tiles.iter().enumerate().map(move |(idx, tile)| {
            let coord = Coord::new((idx % width) as u16, (idx / width) as u16);
            (coord, *tile)
        })
    }

    /// Number of cells holding `tile`.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }
}
