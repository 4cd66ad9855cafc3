//! Beam directions and mirror reflection
//!
//! Grid space: x grows rightward, y grows downward.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Travel direction of a beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit displacement for one step in this direction
    #[inline]
    pub fn vector(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Diagonal mirror orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorKind {
    /// `/`
    ForwardSlash,
    /// `\`
    BackSlash,
}

impl MirrorKind {
    #[inline]
    fn index(self) -> usize {
        match self {
            MirrorKind::ForwardSlash => 0,
            MirrorKind::BackSlash => 1,
        }
    }

    /// Outgoing direction for a beam entering with `incoming`
    #[inline]
    pub fn reflect(self, incoming: Direction) -> Direction {
        REFLECTIONS[self.index()][incoming.index()]
    }

    pub fn glyph(&self) -> char {
        match self {
            MirrorKind::ForwardSlash => '/',
            MirrorKind::BackSlash => '\\',
        }
    }
}

/// Outgoing direction by [mirror kind][incoming direction], columns ordered up, down, left, right
const REFLECTIONS: [[Direction; 4]; 2] = {
    use Direction::*;
    [
        // `/`
        [Right, Left, Down, Up],
        // `\`
        [Left, Right, Up, Down],
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_slash_table() {
        let m = MirrorKind::ForwardSlash;
        assert_eq!(m.reflect(Direction::Up), Direction::Right);
        assert_eq!(m.reflect(Direction::Down), Direction::Left);
        assert_eq!(m.reflect(Direction::Left), Direction::Down);
        assert_eq!(m.reflect(Direction::Right), Direction::Up);
    }

    #[test]
    fn test_back_slash_table() {
        let m = MirrorKind::BackSlash;
        assert_eq!(m.reflect(Direction::Up), Direction::Left);
        assert_eq!(m.reflect(Direction::Down), Direction::Right);
        assert_eq!(m.reflect(Direction::Left), Direction::Up);
        assert_eq!(m.reflect(Direction::Right), Direction::Down);
    }

    #[test]
    fn test_reflection_is_involution() {
        // Bouncing back through the same mirror retraces the path
        for kind in [MirrorKind::ForwardSlash, MirrorKind::BackSlash] {
            for dir in Direction::ALL {
                let out = kind.reflect(dir);
                let back = kind.reflect(opposite(out));
                assert_eq!(back, opposite(dir), "{kind:?} {dir:?}");
            }
        }
    }

    #[test]
    fn test_vectors_are_unit() {
        for dir in Direction::ALL {
            let v = dir.vector();
            assert_eq!(v.x.abs() + v.y.abs(), 1);
        }
        assert_eq!(Direction::Down.vector(), IVec2::Y);
    }

    #[test]
    fn test_direction_names() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_str(dir.as_str()), Some(dir));
        }
        assert_eq!(Direction::from_str("RIGHT"), Some(Direction::Right));
        assert_eq!(Direction::from_str("north"), None);
    }

    fn opposite(dir: Direction) -> Direction {
        match dir {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
