// Object extraction: connected components of a grid under a chosen
// adjacency and colour rule, plus the geometry used to compare them.
//
// Objects carry no identity. Two objects are the same object exactly when
// their cell sets are equal, so every constructor canonicalises the cell
// list (sorted, duplicate-free) and derived equality/ordering is set
// equality/ordering.

use serde::{Deserialize, Serialize};

use super::grid::{background_color, validate_grid, Grid};
use crate::core::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: u8,
}

impl Cell {
    pub fn new(value: u8, row: usize, col: usize) -> Self {
        Self { row, col, value }
    }

    pub fn location(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    LeftRight,
    UpDown,
    MainDiagonal,
    AntiDiagonal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Object {
    cells: Vec<Cell>,
    min_r: usize,
    min_c: usize,
    max_r: usize,
    max_c: usize,
}

impl Object {
    pub fn from_cells(mut cells: Vec<Cell>) -> Self {
        cells.sort();
        cells.dedup();
        let min_r = cells.iter().map(|c| c.row).min().unwrap_or(0);
        let min_c = cells.iter().map(|c| c.col).min().unwrap_or(0);
        let max_r = cells.iter().map(|c| c.row).max().unwrap_or(0);
        let max_c = cells.iter().map(|c| c.col).max().unwrap_or(0);
        Self { cells, min_r, min_c, max_r, max_c }
    }

    /// Single-colour object over the given locations.
    pub fn filled(value: u8, locations: &[(usize, usize)]) -> Self {
        Self::from_cells(locations.iter().map(|&(r, c)| Cell::new(value, r, c)).collect())
    }

    pub fn cells(&self) -> &[Cell] { &self.cells }
    pub fn area(&self) -> usize { self.cells.len() }
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }
    pub fn width(&self) -> usize { self.max_c - self.min_c + 1 }
    pub fn height(&self) -> usize { self.max_r - self.min_r + 1 }
    pub fn min_row(&self) -> usize { self.min_r }
    pub fn max_row(&self) -> usize { self.max_r }
    pub fn min_col(&self) -> usize { self.min_c }
    pub fn max_col(&self) -> usize { self.max_c }

    /// (min_r, min_c, max_r, max_c), inclusive.
    pub fn bounding_box(&self) -> (usize, usize, usize, usize) {
        (self.min_r, self.min_c, self.max_r, self.max_c)
    }

    pub fn locations(&self) -> Vec<(usize, usize)> {
        let mut locs: Vec<_> = self.cells.iter().map(Cell::location).collect();
        locs.dedup();
        locs
    }

    pub fn contains_location(&self, r: usize, c: usize) -> bool {
        self.cells.iter().any(|cell| cell.row == r && cell.col == c)
    }

    pub fn colors(&self) -> Vec<u8> {
        let mut colors = self.color_multiset();
        colors.dedup();
        colors
    }

    pub fn color_multiset(&self) -> Vec<u8> {
        let mut colors: Vec<u8> = self.cells.iter().map(|c| c.value).collect();
        colors.sort_unstable();
        colors
    }

    pub fn is_univalued(&self) -> bool {
        self.colors().len() == 1
    }

    /// Translate so the top-left corner of the bounding box sits at (0, 0).
    pub fn normalize(&self) -> Object {
        self.remap(|r, c| (r, c))
    }

    /// Normalized cell locations, ignoring colour.
    pub fn shape(&self) -> Vec<(usize, usize)> {
        self.normalize().locations()
    }

    /// Mean (row, col) of the occupied cells.
    pub fn center_of_mass(&self) -> (f64, f64) {
        if self.cells.is_empty() { return (0.0, 0.0); }
        let n = self.cells.len() as f64;
        let r = self.cells.iter().map(|c| c.row as f64).sum::<f64>() / n;
        let c = self.cells.iter().map(|c| c.col as f64).sum::<f64>() / n;
        (r, c)
    }

    pub fn rotate_cw(&self) -> Object {
        let h = self.height();
        self.remap(|r, c| (c, h - 1 - r))
    }

    pub fn rotate_180(&self) -> Object {
        let (h, w) = (self.height(), self.width());
        self.remap(|r, c| (h - 1 - r, w - 1 - c))
    }

    pub fn rotate_ccw(&self) -> Object {
        let w = self.width();
        self.remap(|r, c| (w - 1 - c, r))
    }

    /// The three non-identity quarter-turn rotations, normalized.
    pub fn rotations(&self) -> [Object; 3] {
        [self.rotate_cw(), self.rotate_180(), self.rotate_ccw()]
    }

    pub fn mirror(&self, axis: Mirror) -> Object {
        let (h, w) = (self.height(), self.width());
        match axis {
            Mirror::LeftRight => self.remap(|r, c| (r, w - 1 - c)),
            Mirror::UpDown => self.remap(|r, c| (h - 1 - r, c)),
            Mirror::MainDiagonal => self.remap(|r, c| (c, r)),
            Mirror::AntiDiagonal => self.remap(|r, c| (w - 1 - c, h - 1 - r)),
        }
    }

    /// True when some non-identity rotation maps the object onto itself.
    pub fn is_rotation_symmetric(&self) -> bool {
        let norm = self.normalize();
        self.rotations().iter().any(|rot| *rot == norm)
    }

    pub fn touches_edge(&self, rows: usize, cols: usize) -> bool {
        self.cells.iter().any(|c| {
            c.row == 0 || c.col == 0 || c.row + 1 >= rows || c.col + 1 >= cols
        })
    }

    /// Some cell of `self` shares an edge with some cell of `other`.
    pub fn is_adjacent(&self, other: &Object) -> bool {
        self.cells.iter().any(|a| {
            other.cells.iter().any(|b| {
                let dr = a.row.abs_diff(b.row);
                let dc = a.col.abs_diff(b.col);
                dr + dc == 1
            })
        })
    }

    pub fn shared_locations(&self, other: &Object) -> usize {
        let theirs = other.locations();
        self.locations()
            .iter()
            .filter(|loc| theirs.binary_search(loc).is_ok())
            .count()
    }

    /// Minimal bounding-box patch; `None` marks cells outside the object.
    pub fn to_patch(&self) -> Vec<Vec<Option<u8>>> {
        if self.cells.is_empty() { return Vec::new(); }
        let mut patch = vec![vec![None; self.width()]; self.height()];
        for cell in &self.cells {
            patch[cell.row - self.min_r][cell.col - self.min_c] = Some(cell.value);
        }
        patch
    }

    // Apply a coordinate map to the normalized cells.
    fn remap(&self, f: impl Fn(usize, usize) -> (usize, usize)) -> Object {
        Object::from_cells(
            self.cells
                .iter()
                .map(|cell| {
                    let (r, c) = f(cell.row - self.min_r, cell.col - self.min_c);
                    Cell::new(cell.value, r, c)
                })
                .collect(),
        )
    }
}

/// All objects of one grid under one extraction configuration, kept in
/// canonical order so equality is set equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSet {
    objects: Vec<Object>,
}

impl ObjectSet {
    pub fn new(mut objects: Vec<Object>) -> Self {
        objects.retain(|o| !o.is_empty());
        objects.sort();
        objects.dedup();
        Self { objects }
    }

    pub fn len(&self) -> usize { self.objects.len() }
    pub fn is_empty(&self) -> bool { self.objects.is_empty() }
    pub fn iter(&self) -> std::slice::Iter<'_, Object> { self.objects.iter() }
    pub fn as_slice(&self) -> &[Object] { &self.objects }

    pub fn contains(&self, obj: &Object) -> bool {
        self.objects.binary_search(obj).is_ok()
    }

    pub fn colors(&self) -> Vec<u8> {
        let mut colors: Vec<u8> = self.objects.iter().flat_map(|o| o.colors()).collect();
        colors.sort_unstable();
        colors.dedup();
        colors
    }
}

impl<'a> IntoIterator for &'a ObjectSet {
    type Item = &'a Object;
    type IntoIter = std::slice::Iter<'a, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Only merge neighbouring cells of equal value.
    pub univalued: bool,
    /// 8-connectivity instead of 4-connectivity.
    pub diagonal: bool,
    /// Drop cells equal to the grid's background colour.
    pub without_bg: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { univalued: true, diagonal: true, without_bg: true }
    }
}

impl ExtractConfig {
    pub const fn new(univalued: bool, diagonal: bool, without_bg: bool) -> Self {
        Self { univalued, diagonal, without_bg }
    }
}

const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const ALL_NEIGHBOURS: [(i32, i32); 8] =
    [(0, 1), (0, -1), (1, 0), (-1, 0), (1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Partition the grid into connected components.
///
/// Fails only on ragged grids; an empty grid yields an empty set.
pub fn extract_objects(grid: &Grid, config: ExtractConfig) -> Result<ObjectSet> {
    validate_grid(grid)?;
    if grid.is_empty() || grid[0].is_empty() { return Ok(ObjectSet::default()); }
    let rows = grid.len();
    let cols = grid[0].len();
    let bg = config.without_bg.then(|| background_color(grid));
    let offsets: &[(i32, i32)] = if config.diagonal { &ALL_NEIGHBOURS } else { &ORTHOGONAL };
    let mut visited = vec![vec![false; cols]; rows];
    let mut objects = Vec::new();

    for r in 0..rows {
        for c in 0..cols {
            if visited[r][c] { continue; }
            let seed = grid[r][c];
            if bg == Some(seed) { continue; }

            let mut cells = Vec::new();
            let mut stack = vec![(r, c)];
            visited[r][c] = true;

            while let Some((cr, cc)) = stack.pop() {
                cells.push(Cell::new(grid[cr][cc], cr, cc));
                for &(dr, dc) in offsets {
                    let nr = cr as i32 + dr;
                    let nc = cc as i32 + dc;
                    if nr < 0 || nr >= rows as i32 || nc < 0 || nc >= cols as i32 { continue; }
                    let (nr, nc) = (nr as usize, nc as usize);
                    if visited[nr][nc] { continue; }
                    let v = grid[nr][nc];
                    if bg == Some(v) { continue; }
                    if config.univalued && v != seed { continue; }
                    visited[nr][nc] = true;
                    stack.push((nr, nc));
                }
            }
            objects.push(Object::from_cells(cells));
        }
    }
    Ok(ObjectSet::new(objects))
}

/// Flag-style entry point mirroring [`extract_objects`].
pub fn objects(grid: &Grid, univalued: bool, diagonal: bool, without_bg: bool) -> Result<ObjectSet> {
    extract_objects(grid, ExtractConfig::new(univalued, diagonal, without_bg))
}
