// Symmetry and rotation rules.
//
// Three readings of "horizontal symmetry" exist and are kept apart:
// the input is the left-right mirror of the output, the output is
// self-symmetric, and both grids are self-symmetric.

use super::{both, commonsense, object, same_shape, Rule};
use crate::perception::grid::{flip_h, flip_v, grid_dimensions, Grid};
use crate::perception::matching::match_by_overlap;
use crate::perception::objects::ObjectSet;

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("mirrored_horizontally", mirrored_horizontally, 1.0, 2),
        Rule::new("mirrored_vertically", mirrored_vertically, 1.0, 2),
        Rule::new("horizontal_symmetry", horizontal_symmetry, 1.0, 2),
        Rule::new("vertical_symmetry", vertical_symmetry, 1.0, 2),
        Rule::new("paired_horizontal_symmetry", paired_horizontal_symmetry, 1.0, 3),
        Rule::new("object_has_rotated", object_has_rotated, 1.0, 9),
        Rule::new("objects_stretch_to_edges", objects_stretch_to_edges, 1.0, 6),
    ]
}

/// The input equals the output flipped left-right.
pub fn mirrored_horizontally(inp: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    same_shape(inp, out) && *inp == flip_h(out)
}

/// The input equals the output flipped top-bottom.
pub fn mirrored_vertically(inp: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    same_shape(inp, out) && *inp == flip_v(out)
}

/// The output reads the same left-right.
pub fn horizontal_symmetry(_: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    *out == flip_h(out)
}

/// The output reads the same top-bottom.
pub fn vertical_symmetry(_: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    *out == flip_v(out)
}

/// Input and output are both left-right self-symmetric.
pub fn paired_horizontal_symmetry(inp: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
    *inp == flip_h(inp) && *out == flip_h(out)
}

/// Some non-trivial input object reappears rotated by a quarter, half or
/// three-quarter turn. Filling and growth take precedence.
pub fn object_has_rotated(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    if both(io, oo).is_none() { return false; }
    if explained_by_filling(inp, out, io, oo) || object::objects_get_larger(inp, out, io, oo) {
        return false;
    }
    both(io, oo).is_some_and(|(io, oo)| rotated_object_exists(io, oo))
}

// Background inside an object's box was painted while every input object
// kept its cells.
fn explained_by_filling(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    commonsense::ring_filling(inp, out, io, oo)
        && io.is_some_and(|io| {
            io.iter()
                .flat_map(|o| o.cells())
                .all(|cell| out[cell.row][cell.col] == cell.value)
        })
}

/// An input object and an output object whose normalized forms differ but
/// are related by a rotation. Single cells and rotation-symmetric objects
/// never count.
pub fn rotated_object_exists(io: &ObjectSet, oo: &ObjectSet) -> bool {
    io.iter()
        .filter(|a| a.area() > 1 && !a.is_rotation_symmetric())
        .any(|a| {
            let a_norm = a.normalize();
            oo.iter().any(|b| {
                let b_norm = b.normalize();
                b_norm != a_norm && b.rotations().contains(&a_norm)
            })
        })
}

/// An interior input object grows until its match touches the border.
pub fn objects_stretch_to_edges(inp: &Grid, out: &Grid, io: Option<&ObjectSet>, oo: Option<&ObjectSet>) -> bool {
    let Some((io, oo)) = both(io, oo) else { return false };
    let (ir, ic) = grid_dimensions(inp);
    let (or, oc) = grid_dimensions(out);
    match_by_overlap(io, oo)
        .iter()
        .any(|(a, b)| !a.touches_edge(ir, ic) && b.touches_edge(or, oc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::objs;

    #[test]
    fn input_mirrors_output() {
        let inp = vec![vec![1, 2], vec![3, 4]];
        let out = vec![vec![2, 1], vec![4, 3]];
        assert!(mirrored_horizontally(&inp, &out, None, None));
        assert!(!mirrored_vertically(&inp, &out, None, None));
        assert!(!horizontal_symmetry(&inp, &out, None, None));
    }

    #[test]
    fn self_symmetric_output() {
        let inp = vec![vec![1, 0, 0]];
        let out = vec![vec![1, 0, 1]];
        assert!(horizontal_symmetry(&inp, &out, None, None));
        assert!(vertical_symmetry(&inp, &out, None, None));
        assert!(!paired_horizontal_symmetry(&inp, &out, None, None));
        assert!(paired_horizontal_symmetry(&out, &out, None, None));
    }

    #[test]
    fn rotated_l_shape() {
        let inp = vec![
            vec![0, 0, 0, 0],
            vec![0, 3, 0, 0],
            vec![0, 3, 3, 0],
            vec![0, 0, 0, 0],
        ];
        let out = vec![
            vec![0, 0, 0, 0],
            vec![0, 3, 3, 0],
            vec![0, 3, 0, 0],
            vec![0, 0, 0, 0],
        ];
        let (io, oo) = (objs(&inp), objs(&out));
        assert!(object_has_rotated(&inp, &out, Some(&io), Some(&oo)));
        assert!(!object_has_rotated(&inp, &inp, Some(&io), Some(&io)));
    }

    #[test]
    fn filling_is_not_rotation() {
        let inp = vec![
            vec![0, 0, 0, 0],
            vec![0, 3, 0, 0],
            vec![0, 3, 3, 0],
            vec![0, 0, 0, 0],
        ];
        let mut out = inp.clone();
        out[1][2] = 5;
        let (io, oo) = (objs(&inp), objs(&out));
        assert!(!object_has_rotated(&inp, &out, Some(&io), Some(&oo)));
    }

    #[test]
    fn symmetric_objects_never_rotate() {
        let inp = vec![vec![0, 0, 0], vec![0, 6, 0], vec![0, 0, 0]];
        let out = vec![vec![6, 0, 0], vec![0, 0, 0], vec![0, 0, 0]];
        let (io, oo) = (objs(&inp), objs(&out));
        assert!(!object_has_rotated(&inp, &out, Some(&io), Some(&oo)));
    }

    #[test]
    fn stretch_reaches_border() {
        let inp = vec![vec![0, 0, 0], vec![0, 2, 0], vec![0, 0, 0]];
        let out = vec![vec![0, 0, 0], vec![2, 2, 2], vec![0, 0, 0]];
        let (io, oo) = (objs(&inp), objs(&out));
        assert!(objects_stretch_to_edges(&inp, &out, Some(&io), Some(&oo)));
        assert!(!objects_stretch_to_edges(&inp, &inp, Some(&io), Some(&io)));
    }
}
