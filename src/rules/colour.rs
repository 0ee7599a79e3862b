// Colour rules: the palette changed, not the positions.

use super::{both, object, same_shape, Rule};
use crate::perception::grid::{replace_color, swap_colors, unique_colors, Grid};
use crate::perception::matching::{match_by_location, match_by_overlap, match_by_shape_and_position};
use crate::perception::objects::ObjectSet;

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("colour_mapping", colour_mapping, 1.0, 3),
        Rule::new("palette_swap", palette_swap, 1.0, 2),
        Rule::new("uniform_colouring", uniform_colouring, 1.0, 3),
        Rule::new("object_colours_unique", object_colours_unique, 1.0, 4),
        Rule::new("colour_substitution", colour_substitution, 1.0, 6),
        Rule::new("colour_switch", colour_switch, 1.0, 7),
        Rule::new("all_objects_change_colour", all_objects_change_colour, 1.0, 5),
        Rule::new("mimic_colour_scheme", mimic_colour_scheme, 1.0, 6),
        Rule::new("partial_internal_colour_change", partial_internal_colour_change, 1.0, 8),
    ]
}

/// Matched objects use a different number of distinct colours.
pub fn colour_mapping(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else {
        return unique_colors(inp).len() != unique_colors(out).len();
    };
    let pairs = match_by_overlap(io, oo);
    if pairs.is_empty() { return false; }
    let mut in_colors: Vec<u8> = pairs.iter().flat_map(|(a, _)| a.colors()).collect();
    let mut out_colors: Vec<u8> = pairs.iter().flat_map(|(_, b)| b.colors()).collect();
    in_colors.sort_unstable();
    in_colors.dedup();
    out_colors.sort_unstable();
    out_colors.dedup();
    in_colors.len() != out_colors.len()
}

/// The set of colours present anywhere in the grid changed.
pub fn palette_swap(inp: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    unique_colors(inp) != unique_colors(out)
}

/// All output objects are painted in one single colour.
pub fn uniform_colouring(_: &Grid, _: &Grid, _: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    match oo {
        Some(oo) if !oo.is_empty() => oo.colors().len() == 1,
        _ => false,
    }
}

/// Every output object has its own colour, shared with no other object.
/// A lone object qualifies; an empty output does not.
pub fn object_colours_unique(_: &Grid, _: &Grid, _: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some(oo) = oo else { return false };
    if oo.is_empty() || !oo.iter().all(|o| o.is_univalued()) { return false; }
    let mut colors: Vec<u8> = oo.iter().flat_map(|o| o.colors()).collect();
    colors.sort_unstable();
    colors.dedup();
    colors.len() == oo.len()
}

/// Replacing one input colour with one other colour reproduces the output.
pub fn colour_substitution(inp: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    if !same_shape(inp, out) || inp == out { return false; }
    let targets = unique_colors(out);
    unique_colors(inp).into_iter().any(|from| {
        targets
            .iter()
            .any(|&to| to != from && replace_color(inp, from, to) == *out)
    })
}

/// Exchanging exactly two input colours reproduces the output.
pub fn colour_switch(inp: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    if !same_shape(inp, out) || inp == out { return false; }
    let palette = unique_colors(inp);
    for (i, &a) in palette.iter().enumerate() {
        for &b in &palette[i + 1..] {
            if swap_colors(inp, a, b) == *out { return true; }
        }
    }
    false
}

/// Every input object reappears at the same cells but in another colour.
pub fn all_objects_change_colour(_: &Grid, _: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else { return false };
    if io.is_empty() { return false; }
    let pairs = match_by_location(io, oo);
    pairs.len() == io.len() && pairs.iter().all(|(a, b)| a.colors() != b.colors())
}

/// Rich palettes where every object keeps its colours through the transform.
pub fn mimic_colour_scheme(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else { return false };
    let mut total = unique_colors(inp);
    total.extend(unique_colors(out));
    total.sort_unstable();
    total.dedup();
    if total.len() <= 3 || io.len() != oo.len() || io.is_empty() { return false; }
    let pairs = match_by_shape_and_position(io, oo);
    pairs.len() == io.len() && pairs.iter().all(|(a, b)| a.colors() == b.colors())
}

/// Objects lose cells while a new neighbour grows next to them, i.e. part of
/// an object was repainted.
pub fn partial_internal_colour_change(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    if both(io, oo).is_none() { return false; }
    object::objects_get_smaller(inp, out, io, oo) && object::neighbour_object_appears(inp, out, io, oo)
}
