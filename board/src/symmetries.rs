/// One element of the dihedral group of the square: an optional horizontal flip followed by a
/// number of counter-clockwise quarter turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symmetry {
    pub flip: bool,
    pub rotations: u8,
}

impl Symmetry {
    pub fn identity() -> Self {
        Self {
            flip: false,
            rotations: 0,
        }
    }

    /// All eight symmetries of a square grid, identity first.
    pub fn all() -> [Symmetry; 8] {
        let mut symmetries = [Symmetry::identity(); 8];

        for (i, symmetry) in symmetries.iter_mut().enumerate() {
            symmetry.flip = i >= 4;
            symmetry.rotations = (i % 4) as u8;
        }

        symmetries
    }

    /// Applies the symmetry to a row-major `size` x `size` grid.
    pub fn apply<T: Copy>(&self, grid: &[T], size: usize) -> Vec<T> {
        debug_assert_eq!(grid.len(), size * size);

        let mut transformed = if self.flip {
            flip_horizontal(grid, size)
        } else {
            grid.to_vec()
        };

        for _ in 0..self.rotations % 4 {
            transformed = rotate_ccw(&transformed, size);
        }

        transformed
    }
}

/// Rotates a square grid a quarter turn counter-clockwise.
pub fn rotate_ccw<T: Copy>(grid: &[T], size: usize) -> Vec<T> {
    let mut rotated = Vec::with_capacity(grid.len());

    for row in 0..size {
        for col in 0..size {
            rotated.push(grid[col * size + (size - 1 - row)]);
        }
    }

    rotated
}

/// Mirrors a square grid left to right.
pub fn flip_horizontal<T: Copy>(grid: &[T], size: usize) -> Vec<T> {
    let mut flipped = Vec::with_capacity(grid.len());

    for row in 0..size {
        for col in 0..size {
            flipped.push(grid[row * size + (size - 1 - col)]);
        }
    }

    flipped
}
