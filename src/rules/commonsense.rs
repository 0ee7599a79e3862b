// Physically motivated rules: falling, filling, stacking.

use super::{both, same_shape, Rule};
use crate::perception::grid::{background_color, grid_dimensions, pixel_sum, Grid};
use crate::perception::matching::{match_by_overlap, match_by_shape_and_position};
use crate::perception::objects::ObjectSet;

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("gravity_down", gravity_down, 1.0, 4),
        Rule::new("containment_change", containment_change, 1.0, 3),
        Rule::new("ring_filling", ring_filling, 1.0, 6),
        Rule::new("checkerboard_pattern", checkerboard_pattern, 1.0, 4),
        Rule::new("tetris_relationship", tetris_relationship, 1.0, 9),
    ]
}

/// No matched object ends higher than it started.
/// Without objects: the pixel sum grew.
pub fn gravity_down(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else {
        return pixel_sum(inp) < pixel_sum(out);
    };
    let pairs = match_by_shape_and_position(io, oo);
    if pairs.is_empty() { return false; }
    pairs.iter().all(|(a, b)| b.max_row() >= a.max_row())
}

/// Some matched object occupies a different set of cells.
/// Without objects: same shape, different content.
pub fn containment_change(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else {
        return same_shape(inp, out) && inp != out;
    };
    match_by_overlap(io, oo)
        .iter()
        .any(|(a, b)| a.locations() != b.locations())
}

/// A background cell inside some input object's bounding box is painted in
/// the output.
pub fn ring_filling(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    let Some(io) = io else { return false };
    if !same_shape(inp, out) { return false; }
    let bg = background_color(inp);
    io.iter().any(|obj| {
        let (r0, c0, r1, c1) = obj.bounding_box();
        (r0..=r1).any(|r| (c0..=c1).any(|c| inp[r][c] == bg && out[r][c] != bg))
    })
}

/// Output cells alternate strictly between two colours by (row + col) parity.
pub fn checkerboard_pattern(_: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    let (rows, cols) = grid_dimensions(out);
    if rows * cols < 2 { return false; }
    let even = out[0][0];
    let odd = if cols > 1 { out[0][1] } else { out[1][0] };
    if odd == even { return false; }
    (0..rows).all(|r| {
        (0..cols).all(|c| out[r][c] == if (r + c) % 2 == 0 { even } else { odd })
    })
}

/// A full input row is cleared and everything above it drops by one row,
/// or matched objects only move straight down and come to rest on
/// something.
pub fn tetris_relationship(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    if !same_shape(inp, out) { return false; }
    if row_cleared(inp, out) { return true; }
    let Some((io, oo)) = both(io, oo) else { return false };
    let bg = background_color(out);
    let (rows, _) = grid_dimensions(out);
    let pairs = match_by_shape_and_position(io, oo);
    if pairs.is_empty() { return false; }
    let straight_down = pairs
        .iter()
        .all(|(a, b)| b.min_col() == a.min_col() && b.min_row() >= a.min_row());
    let moved: Vec<_> = pairs.iter().filter(|(a, b)| b.min_row() > a.min_row()).collect();
    straight_down
        && !moved.is_empty()
        && moved.iter().all(|(_, b)| {
            b.cells().iter().any(|cell| {
                let below = cell.row + 1;
                below >= rows || (out[below][cell.col] != bg && !b.contains_location(below, cell.col))
            })
        })
}

fn row_cleared(inp: &Grid, out: &Grid) -> bool {
    let bg = background_color(inp);
    let rows = inp.len();
    (0..rows).any(|r| {
        inp[r].iter().all(|&v| v != bg)
            && out[0].iter().all(|&v| v == bg)
            && (1..=r).all(|k| out[k] == inp[k - 1])
            && (r + 1..rows).all(|k| out[k] == inp[k])
    })
}
