//! Item footprints and overlap geometry

use crate::error::ShapeError;
use crate::geometry::{GridPoint, GridRect, GridSize};
use std::collections::HashSet;

/// Immutable per-cell occupancy mask of an item
///
/// A shape need not fill its bounding box, so L-shaped or hollow items can
/// sit flush against each other. Items of one definition share a shape
/// through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u32,
    height: u32,
    /// Row-major occupancy, `width * height` long
    mask: Vec<bool>,
    /// Occupied local cells in x-outer order
    cells: Vec<GridPoint>,
}

impl Shape {
    /// Create a fully occupied rectangle
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn rect(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "shape dimensions must be non-zero");
        Self::build(width, height, vec![true; GridSize::new(width, height).area()])
    }

    /// Create from a row-major occupancy mask
    pub fn new(width: u32, height: u32, mask: Vec<bool>) -> Result<Self, ShapeError> {
        if width == 0 || height == 0 {
            return Err(ShapeError::ZeroSize { width, height });
        }
        let expected = GridSize::new(width, height).area();
        if mask.len() != expected {
            return Err(ShapeError::MaskLength {
                expected,
                actual: mask.len(),
            });
        }
        if !mask.iter().any(|&occupied| occupied) {
            return Err(ShapeError::EmptyMask);
        }
        Ok(Self::build(width, height, mask))
    }

    /// Create from a list of occupied `(x, y)` cells
    pub fn from_cells(
        width: u32,
        height: u32,
        cells: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Self, ShapeError> {
        if width == 0 || height == 0 {
            return Err(ShapeError::ZeroSize { width, height });
        }
        let mut mask = vec![false; GridSize::new(width, height).area()];
        for (x, y) in cells {
            if x >= width || y >= height {
                return Err(ShapeError::CellOutOfBounds { x, y, width, height });
            }
            mask[mask_index(width, x, y)] = true;
        }
        Self::new(width, height, mask)
    }

    /// Parse an ASCII picture, one string per row
    ///
    /// `#` or `X` marks an occupied cell, `.` or a space an empty one.
    ///
    /// ```ignore
    /// let boot = Shape::parse(&["#.", "##"])?;
    /// ```
    pub fn parse(rows: &[&str]) -> Result<Self, ShapeError> {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);

        let mut mask = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(ShapeError::RaggedRow {
                    row,
                    len,
                    expected: width,
                });
            }
            for c in line.chars() {
                match c {
                    '#' | 'X' => mask.push(true),
                    '.' | ' ' => mask.push(false),
                    other => return Err(ShapeError::InvalidChar(other)),
                }
            }
        }

        Self::new(width as u32, height, mask)
    }

    fn build(width: u32, height: u32, mask: Vec<bool>) -> Self {
        let cells = (0..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .filter(|&(x, y)| mask[mask_index(width, x, y)])
            .map(|(x, y)| GridPoint::new(x as i32, y as i32))
            .collect();
        Self {
            width,
            height,
            mask,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    /// Occupied local cells
    pub fn cells(&self) -> &[GridPoint] {
        &self.cells
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True if every cell of the bounding box is occupied
    pub fn is_rectangular(&self) -> bool {
        self.cells.len() == self.mask.len()
    }

    /// Is local cell `(x, y)` part of the footprint
    pub fn contains_local(&self, cell: GridPoint) -> bool {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width as i32 || cell.y >= self.height as i32 {
            return false;
        }
        self.mask[mask_index(self.width, cell.x as u32, cell.y as u32)]
    }

    /// Bounding box when anchored at `position`
    #[inline]
    pub fn bounds_at(&self, position: GridPoint) -> GridRect {
        GridRect::new(position, self.size())
    }

    /// Occupied grid cells when anchored at `position`
    pub fn world_cells(&self, position: GridPoint) -> impl Iterator<Item = GridPoint> + '_ {
        self.cells.iter().map(move |&cell| position + cell)
    }

    /// Occupied grid cells as a set
    pub fn occupied_world_cells(&self, position: GridPoint) -> HashSet<GridPoint> {
        self.world_cells(position).collect()
    }

    /// Would this shape at `position` share a cell with `other` at `other_position`
    ///
    /// Bounding boxes are compared first; only the cells inside the shared
    /// region are tested against both masks.
    pub fn overlaps_at(&self, position: GridPoint, other: &Shape, other_position: GridPoint) -> bool {
        let Some(region) = self
            .bounds_at(position)
            .intersection(&other.bounds_at(other_position))
        else {
            return false;
        };

        region
            .cells()
            .any(|cell| self.contains_local(cell - position) && other.contains_local(cell - other_position))
    }
}

/// Row-major offset of local cell `(x, y)`, computed without u32 overflow
#[inline]
fn mask_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_shape() {
        let shape = Shape::rect(2, 3);
        assert_eq!(shape.size(), GridSize::new(2, 3));
        assert_eq!(shape.cell_count(), 6);
        assert!(shape.is_rectangular());
        assert!(shape.contains_local(GridPoint::new(1, 2)));
        assert!(!shape.contains_local(GridPoint::new(2, 0)));
        assert!(!shape.contains_local(GridPoint::new(-1, 0)));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_mask_index_wide_shapes() {
        assert_eq!(GridSize::new(u32::MAX, 2).area(), 2 * u32::MAX as usize);
        assert_eq!(mask_index(70_000, 5, 70_000), 70_000 * 70_000 + 5);
        assert_eq!(mask_index(3, 2, 1), 5);
    }

    #[test]
    fn test_parse_l_shape() {
        let shape = Shape::parse(&["#.", "#.", "##"]).unwrap();
        assert_eq!(shape.size(), GridSize::new(2, 3));
        assert_eq!(shape.cell_count(), 4);
        assert!(!shape.is_rectangular());
        assert!(shape.contains_local(GridPoint::new(1, 2)));
        assert!(!shape.contains_local(GridPoint::new(1, 0)));
    }

    #[test]
    fn test_malformed_shapes() {
        assert_eq!(
            Shape::new(0, 2, vec![]),
            Err(ShapeError::ZeroSize { width: 0, height: 2 })
        );
        assert_eq!(Shape::new(2, 1, vec![false, false]), Err(ShapeError::EmptyMask));
        assert!(matches!(
            Shape::from_cells(2, 2, [(2, 0)]),
            Err(ShapeError::CellOutOfBounds { x: 2, .. })
        ));
        assert!(matches!(
            Shape::parse(&["##", "#"]),
            Err(ShapeError::RaggedRow { row: 1, .. })
        ));
        assert_eq!(Shape::parse(&["#?"]), Err(ShapeError::InvalidChar('?')));
        assert_eq!(Shape::parse(&[]), Err(ShapeError::ZeroSize { width: 0, height: 0 }));
    }

    #[test]
    #[should_panic]
    fn test_rect_zero_panics() {
        let _ = Shape::rect(0, 1);
    }

    #[test]
    fn test_world_cells() {
        let shape = Shape::from_cells(2, 2, [(0, 0), (1, 1)]).unwrap();
        let cells = shape.occupied_world_cells(GridPoint::new(3, 4));
        assert_eq!(cells.len(), 2);
        assert!(cells.contains(&GridPoint::new(3, 4)));
        assert!(cells.contains(&GridPoint::new(4, 5)));
    }

    #[test]
    fn test_overlap_requires_shared_cell() {
        // #.
        // ##
        let l = Shape::parse(&["#.", "##"]).unwrap();
        let dot = Shape::rect(1, 1);

        // Inside the L's bounding box but on its empty cell
        assert!(!l.overlaps_at(GridPoint::ZERO, &dot, GridPoint::new(1, 0)));
        assert!(l.overlaps_at(GridPoint::ZERO, &dot, GridPoint::new(1, 1)));
        // Disjoint bounding boxes
        assert!(!l.overlaps_at(GridPoint::ZERO, &dot, GridPoint::new(2, 0)));
    }

    #[test]
    fn test_interlocking_shapes() {
        // #.     .#
        // ##  +  ..  -> fit into one 2x2 square
        let l = Shape::parse(&["#.", "##"]).unwrap();
        let corner = Shape::parse(&[".#", ".."]).unwrap();
        assert!(!l.overlaps_at(GridPoint::ZERO, &corner, GridPoint::ZERO));
        assert!(corner.overlaps_at(GridPoint::new(0, 1), &l, GridPoint::ZERO));
    }
}
