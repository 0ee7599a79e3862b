// Number rules: counts and sizes.

use rustc_hash::FxHashMap;

use super::{both, Rule};
use crate::perception::grid::{
    background_color, count_block_occurrences, count_non_background, crop_to_content, unique_colors, Grid,
};
use crate::perception::matching::match_by_overlap;
use crate::perception::objects::ObjectSet;

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("pixel_count_change", pixel_count_change, 1.0, 2),
        Rule::new("object_count_change", object_count_change, 1.0, 2),
        Rule::new("size_scaling", size_scaling, 1.0, 5),
        Rule::new("shape_duplicated_in_output_only", shape_duplicated_in_output_only, 1.0, 5),
        Rule::new("replication_pattern", replication_pattern, 1.0, 8),
    ]
}

/// The number of non-background cells changed. The input's background is
/// the reference for both grids.
pub fn pixel_count_change(inp: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    let bg = background_color(inp);
    count_non_background(inp, bg) != count_non_background(out, bg)
}

/// The number of objects changed.
/// Without objects: the number of distinct colours changed.
pub fn object_count_change(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    match both(io, oo) {
        Some((io, oo)) => io.len() != oo.len(),
        None => unique_colors(inp).len() != unique_colors(out).len(),
    }
}

/// Equal object counts, and every matched pair shares one output/input size
/// ratio. A ratio of 1 counts.
pub fn size_scaling(_: &Grid, _: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else { return false };
    if io.is_empty() || io.len() != oo.len() { return false; }
    let pairs = match_by_overlap(io, oo);
    let Some(&(first_in, first_out)) = pairs.first() else { return false };
    let (a0, b0) = (first_in.area(), first_out.area());
    if a0 == 0 { return false; }
    // Compare ratios by cross-multiplication to stay exact.
    pairs.iter().all(|(a, b)| a.area() != 0 && b.area() * a0 == b0 * a.area())
}

/// Some shape shows up more than once among the output objects while the
/// input has it at most once.
pub fn shape_duplicated_in_output_only(_: &Grid, _: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else { return false };
    let mut in_counts: FxHashMap<Vec<(usize, usize)>, usize> = FxHashMap::default();
    for obj in io {
        *in_counts.entry(obj.shape()).or_default() += 1;
    }
    let mut out_counts: FxHashMap<Vec<(usize, usize)>, usize> = FxHashMap::default();
    for obj in oo {
        *out_counts.entry(obj.shape()).or_default() += 1;
    }
    out_counts
        .iter()
        .any(|(shape, &n)| n > 1 && in_counts.get(shape).copied().unwrap_or(0) <= 1)
}

/// The block spanned by the input's content appears at least twice in the
/// output.
pub fn replication_pattern(inp: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    let Some(block) = crop_to_content(inp, background_color(inp)) else { return false };
    count_block_occurrences(out, &block) >= 2
}
