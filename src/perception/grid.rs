use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ClassifyError, Result};

pub type Grid = Vec<Vec<u8>>;

/// Value used as background when no single colour dominates a grid.
pub const BACKGROUND_SENTINEL: u8 = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcTask {
    #[serde(default)]
    pub id: String,
    pub train: Vec<ArcExample>,
    #[serde(default)]
    pub test: Vec<ArcExample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcExample {
    pub input: Grid,
    #[serde(default)]
    pub output: Grid,
}

impl ArcTask {
    pub fn from_pairs(id: impl Into<String>, pairs: Vec<(Grid, Grid)>) -> Self {
        let train = pairs
            .into_iter()
            .map(|(input, output)| ArcExample { input, output })
            .collect();
        Self { id: id.into(), train, test: Vec::new() }
    }

    pub fn train_pairs(&self) -> impl Iterator<Item = (&Grid, &Grid)> {
        self.train.iter().map(|ex| (&ex.input, &ex.output))
    }
}

pub fn parse_arc_task(id: &str, json: &str) -> Result<ArcTask> {
    let mut task: ArcTask = serde_json::from_str(json)?;
    if task.id.is_empty() {
        task.id = id.to_string();
    }
    Ok(task)
}

pub fn load_arc_task(path: &Path) -> Result<ArcTask> {
    let content = std::fs::read_to_string(path)?;
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    parse_arc_task(id, &content)
}

pub fn grid_to_string(grid: &Grid) -> String {
    grid.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn grid_dimensions(grid: &Grid) -> (usize, usize) {
    if grid.is_empty() { return (0, 0); }
    (grid.len(), grid[0].len())
}

pub fn is_rectangular(grid: &Grid) -> bool {
    match grid.first() {
        None => true,
        Some(first) => grid.iter().all(|row| row.len() == first.len()),
    }
}

/// A grid the predicates can work with: at least one cell and equal row widths.
pub fn is_well_formed(grid: &Grid) -> bool {
    !grid.is_empty() && !grid[0].is_empty() && is_rectangular(grid)
}

pub fn validate_grid(grid: &Grid) -> Result<()> {
    if let Some(first) = grid.first() {
        if let Some((r, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != first.len()) {
            return Err(ClassifyError::MalformedGrid {
                reason: format!("row {} has width {}, expected {}", r, row.len(), first.len()),
            });
        }
    }
    Ok(())
}

pub fn unique_colors(grid: &Grid) -> Vec<u8> {
    let mut seen = [false; 256];
    for row in grid {
        for &c in row {
            seen[c as usize] = true;
        }
    }
    (0..=255u8).filter(|&c| seen[c as usize]).collect()
}

pub fn color_histogram(grid: &Grid) -> [usize; 256] {
    let mut counts = [0usize; 256];
    for row in grid {
        for &c in row {
            counts[c as usize] += 1;
        }
    }
    counts
}

/// Most frequent value, or [`BACKGROUND_SENTINEL`] when the grid is empty or
/// the maximum count is shared.
pub fn background_color(grid: &Grid) -> u8 {
    let counts = color_histogram(grid);
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 { return BACKGROUND_SENTINEL; }
    let mut leaders = (0..=255u8).filter(|&c| counts[c as usize] == max);
    match (leaders.next(), leaders.next()) {
        (Some(c), None) => c,
        _ => BACKGROUND_SENTINEL,
    }
}

pub fn count_cells(grid: &Grid) -> usize {
    grid.iter().map(|row| row.len()).sum()
}

pub fn count_non_background(grid: &Grid, bg: u8) -> usize {
    grid.iter().flatten().filter(|&&c| c != bg).count()
}

pub fn pixel_sum(grid: &Grid) -> u64 {
    grid.iter().flatten().map(|&c| c as u64).sum()
}

pub fn rotate_cw(g: &Grid) -> Grid {
    if g.is_empty() { return g.clone(); }
    let rows = g.len();
    let cols = g[0].len();
    (0..cols).map(|c| (0..rows).rev().map(|r| g[r][c]).collect()).collect()
}

pub fn rotate_180(g: &Grid) -> Grid {
    g.iter().rev().map(|row| row.iter().rev().copied().collect()).collect()
}

pub fn rotate_ccw(g: &Grid) -> Grid {
    if g.is_empty() { return g.clone(); }
    let rows = g.len();
    let cols = g[0].len();
    (0..cols).rev().map(|c| (0..rows).map(|r| g[r][c]).collect()).collect()
}

/// Mirror left-right.
pub fn flip_h(g: &Grid) -> Grid {
    g.iter().map(|row| row.iter().rev().copied().collect()).collect()
}

/// Mirror top-bottom.
pub fn flip_v(g: &Grid) -> Grid {
    g.iter().rev().cloned().collect()
}

pub fn replace_color(g: &Grid, from: u8, to: u8) -> Grid {
    g.iter()
        .map(|row| row.iter().map(|&c| if c == from { to } else { c }).collect())
        .collect()
}

pub fn swap_colors(g: &Grid, a: u8, b: u8) -> Grid {
    g.iter()
        .map(|row| {
            row.iter()
                .map(|&c| if c == a { b } else if c == b { a } else { c })
                .collect()
        })
        .collect()
}

/// Smallest block containing every non-background cell, if any.
pub fn crop_to_content(g: &Grid, bg: u8) -> Option<Grid> {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for (r, row) in g.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            if v == bg { continue; }
            bounds = Some(match bounds {
                None => (r, c, r, c),
                Some((r0, c0, r1, c1)) => (r0.min(r), c0.min(c), r1.max(r), c1.max(c)),
            });
        }
    }
    let (r0, c0, r1, c1) = bounds?;
    Some(g[r0..=r1].iter().map(|row| row[c0..=c1].to_vec()).collect())
}

/// Number of positions where `block` appears verbatim inside `g`.
pub fn count_block_occurrences(g: &Grid, block: &Grid) -> usize {
    let (rows, cols) = grid_dimensions(g);
    let (bh, bw) = grid_dimensions(block);
    if bh == 0 || bw == 0 || bh > rows || bw > cols { return 0; }
    let mut count = 0;
    for r in 0..=(rows - bh) {
        for c in 0..=(cols - bw) {
            let hit = (0..bh).all(|dr| g[r + dr][c..c + bw] == block[dr][..]);
            if hit { count += 1; }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_most_frequent() {
        let g = vec![vec![3, 3, 3], vec![3, 1, 2]];
        assert_eq!(background_color(&g), 3);
    }

    #[test]
    fn background_tie_falls_back_to_sentinel() {
        let g = vec![vec![1, 1], vec![4, 4]];
        assert_eq!(background_color(&g), BACKGROUND_SENTINEL);
        assert_eq!(background_color(&Vec::new()), BACKGROUND_SENTINEL);
    }

    #[test]
    fn ragged_grid_rejected() {
        let g = vec![vec![1, 2], vec![3]];
        assert!(!is_rectangular(&g));
        assert!(matches!(validate_grid(&g), Err(ClassifyError::MalformedGrid { .. })));
    }

    #[test]
    fn rotations_compose() {
        let g = vec![vec![1, 2, 3], vec![4, 5, 6]];
        assert_eq!(rotate_cw(&g), vec![vec![4, 1], vec![5, 2], vec![6, 3]]);
        assert_eq!(rotate_ccw(&rotate_cw(&g)), g);
        assert_eq!(rotate_cw(&rotate_cw(&g)), rotate_180(&g));
    }

    #[test]
    fn flips() {
        let g = vec![vec![1, 2], vec![3, 4]];
        assert_eq!(flip_h(&g), vec![vec![2, 1], vec![4, 3]]);
        assert_eq!(flip_v(&g), vec![vec![3, 4], vec![1, 2]]);
    }

    #[test]
    fn crop_and_count_blocks() {
        let g = vec![vec![0, 0, 0], vec![0, 7, 8], vec![0, 0, 0]];
        let block = crop_to_content(&g, 0).unwrap();
        assert_eq!(block, vec![vec![7, 8]]);
        let out = vec![vec![7, 8, 7, 8], vec![0, 7, 8, 0]];
        assert_eq!(count_block_occurrences(&out, &block), 3);
        assert!(crop_to_content(&vec![vec![0, 0]], 0).is_none());
    }

    #[test]
    fn swap_exchanges_two_colours() {
        let g = vec![vec![1, 2, 3]];
        assert_eq!(swap_colors(&g, 1, 3), vec![vec![3, 2, 1]]);
    }

    #[test]
    fn parse_task_json() {
        let json = r#"{"train":[{"input":[[1,0]],"output":[[0,1]]}],"test":[{"input":[[2]]}]}"#;
        let task = parse_arc_task("abc", json).unwrap();
        assert_eq!(task.id, "abc");
        assert_eq!(task.train.len(), 1);
        assert_eq!(task.train[0].output, vec![vec![0, 1]]);
        assert!(task.test[0].output.is_empty());
    }
}
