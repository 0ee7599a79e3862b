// Movement rules: translation, rotation and swaps of the grid or its objects.

use std::cmp::Ordering;

use super::{both, geometry, object, same_shape, Rule};
use crate::perception::grid::{rotate_180, rotate_ccw, rotate_cw, Grid};
use crate::perception::matching::{match_by_centroid, match_by_shape_and_position};
use crate::perception::objects::{Object, ObjectSet};

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("translation", translation, 1.0, 3),
        Rule::new("rotation", rotation, 1.0, 4),
        Rule::new("object_swapping", object_swapping, 1.0, 6),
        Rule::new("objects_fall_downward", objects_fall_downward, 1.0, 7),
    ]
}

fn by_center(a: &&Object, b: &&Object) -> Ordering {
    let (ar, ac) = a.center_of_mass();
    let (br, bc) = b.center_of_mass();
    ar.total_cmp(&br).then(ac.total_cmp(&bc))
}

/// A matched object changed its center of mass.
/// Without objects: same shape, different content.
pub fn translation(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else {
        return same_shape(inp, out) && inp != out;
    };
    match_by_shape_and_position(io, oo)
        .iter()
        .any(|(a, b)| a.center_of_mass() != b.center_of_mass())
}

/// The whole output is a rotation of the whole input, or some object
/// reappears rotated.
pub fn rotation(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    if inp != out && (*out == rotate_cw(inp) || *out == rotate_180(inp) || *out == rotate_ccw(inp)) {
        return true;
    }
    both(io, oo).is_some_and(|(io, oo)| geometry::rotated_object_exists(io, oo))
}

/// Two distinct objects trade places.
pub fn object_swapping(_: &Grid, _: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else { return false };
    if io.len() != 2 || oo.len() != 2 { return false; }
    let mut ins: Vec<&Object> = io.iter().collect();
    let mut outs: Vec<&Object> = oo.iter().collect();
    ins.sort_by(by_center);
    outs.sort_by(by_center);
    let (first, second) = (ins[0].normalize(), ins[1].normalize());
    first != second && outs[1].normalize() == first && outs[0].normalize() == second
}

/// Every object, paired with its nearest output object, stays level or
/// moves down. Rotations and resizes are excluded.
pub fn objects_fall_downward(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    if both(io, oo).is_none() { return false; }
    if rotation(inp, out, io, oo)
        || object::objects_get_larger(inp, out, io, oo)
        || object::objects_get_smaller(inp, out, io, oo)
    {
        return false;
    }
    let Some((io, oo)) = both(io, oo) else { return false };
    let pairs = match_by_centroid(io, oo);
    if pairs.is_empty() { return false; }
    pairs.iter().all(|(a, b)| b.center_of_mass().0 >= a.center_of_mass().0)
}
