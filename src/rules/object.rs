// Object rules: creation, deletion, growth and merging.

use super::{both, colour, Rule};
use crate::perception::grid::{count_cells, Grid};
use crate::perception::matching::{match_by_overlap, MatchPair};
use crate::perception::objects::{Object, ObjectSet};

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("new_object_created", new_object_created, 1.0, 2),
        Rule::new("object_transformed", object_transformed, 1.0, 4),
        Rule::new("objects_get_larger", objects_get_larger, 1.0, 5),
        Rule::new("objects_get_smaller", objects_get_smaller, 1.0, 5),
        Rule::new("objects_all_grow", objects_all_grow, 1.0, 5),
        Rule::new("objects_all_shrink", objects_all_shrink, 1.0, 5),
        Rule::new("neighbour_object_disappears", neighbour_object_disappears, 1.0, 6),
        Rule::new("neighbour_object_appears", neighbour_object_appears, 1.0, 6),
        Rule::new("object_duplication", object_duplication, 1.0, 5),
        Rule::new("object_merging", object_merging, 1.0, 5),
    ]
}

/// The output holds more objects than the input.
/// Without objects: the output grid has more cells.
pub fn new_object_created(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    match both(io, oo) {
        Some((io, oo)) => oo.len() > io.len(),
        None => count_cells(out) > count_cells(inp),
    }
}

/// Some input object's colour multiset has no counterpart among the output
/// objects. Without objects: the grids differ.
pub fn object_transformed(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else { return inp != out };
    let out_sigs: Vec<Vec<u8>> = oo.iter().map(Object::color_multiset).collect();
    io.iter().any(|obj| !out_sigs.contains(&obj.color_multiset()))
}

// Overlap-matched pairs, unless a plain recolouring already explains the pair.
fn size_pairs<'a>(
    inp: &Grid,
    out: &Grid,
    io: Option<&'a ObjectSet>,
    oo: Option<&'a ObjectSet>,
) -> Vec<MatchPair<'a>> {
    let Some((io, oo)) = both(io, oo) else { return Vec::new() };
    if colour::colour_substitution(inp, out, None, None) || colour::colour_switch(inp, out, None, None) {
        return Vec::new();
    }
    match_by_overlap(io, oo)
}

/// At least one matched object gains cells.
pub fn objects_get_larger(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    size_pairs(inp, out, io, oo).iter().any(|(a, b)| b.area() > a.area())
}

/// At least one matched object loses cells.
pub fn objects_get_smaller(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    size_pairs(inp, out, io, oo).iter().any(|(a, b)| b.area() < a.area())
}

/// Every matched object gains cells.
pub fn objects_all_grow(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let pairs = size_pairs(inp, out, io, oo);
    !pairs.is_empty() && pairs.iter().all(|(a, b)| b.area() > a.area())
}

/// Every matched object loses cells.
pub fn objects_all_shrink(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let pairs = size_pairs(inp, out, io, oo);
    !pairs.is_empty() && pairs.iter().all(|(a, b)| b.area() < a.area())
}

// Some object found only in `from` touches an object present in both sets.
fn lone_neighbour(from: &ObjectSet, other: &ObjectSet) -> bool {
    let (kept, lone): (Vec<&Object>, Vec<&Object>) = from.iter().partition(|o| other.contains(o));
    lone.iter().any(|l| kept.iter().any(|k| l.is_adjacent(k)))
}

/// An object vanishes from beside an object that stays put.
pub fn neighbour_object_disappears(_: &Grid, _: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    both(io, oo).is_some_and(|(io, oo)| lone_neighbour(io, oo))
}

/// An object appears beside an object that stays put.
pub fn neighbour_object_appears(_: &Grid, _: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    both(io, oo).is_some_and(|(io, oo)| lone_neighbour(oo, io))
}

fn shapes_differ(a: &ObjectSet, b: &ObjectSet) -> bool {
    let b_shapes: Vec<_> = b.iter().map(Object::shape).collect();
    a.iter().any(|x| {
        let shape = x.shape();
        b_shapes.iter().any(|s| *s != shape)
    })
}

/// More objects in the output, and not all of them share the input shapes.
pub fn object_duplication(_: &Grid, _: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    both(io, oo).is_some_and(|(io, oo)| oo.len() > io.len() && shapes_differ(oo, io))
}

/// Fewer objects in the output, and not all of them share the input shapes.
pub fn object_merging(_: &Grid, _: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    both(io, oo).is_some_and(|(io, oo)| io.len() > oo.len() && shapes_differ(io, oo))
}
