// Best-effort object correspondence between an input and an output set.
//
// All matchers are greedy: input objects are scanned in canonical order,
// each output object is claimed at most once, and ties go to the first
// candidate seen. No global assignment is attempted; several predicates
// depend on exactly this behaviour.

use super::objects::{Object, ObjectSet};

pub type MatchPair<'a> = (&'a Object, &'a Object);

fn squared_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dr = a.0 - b.0;
    let dc = a.1 - b.1;
    dr * dr + dc * dc
}

// Greedy one-to-one pass. `score` returns None for ineligible candidates,
// otherwise a key where larger is better.
fn greedy_match<'a, F>(inputs: &'a ObjectSet, outputs: &'a ObjectSet, score: F) -> Vec<MatchPair<'a>>
where
    F: Fn(&Object, &Object) -> Option<f64>,
{
    let mut used = vec![false; outputs.len()];
    let mut pairs = Vec::new();
    for inp in inputs {
        let mut best: Option<(usize, f64)> = None;
        for (j, out) in outputs.iter().enumerate() {
            if used[j] { continue; }
            let Some(s) = score(inp, out) else { continue };
            if best.map_or(true, |(_, b)| s > b) {
                best = Some((j, s));
            }
        }
        if let Some((j, _)) = best {
            used[j] = true;
            pairs.push((inp, &outputs.as_slice()[j]));
        }
    }
    pairs
}

/// Pair each input object with the unused output object sharing the most
/// cell locations. Objects without any overlap are left out.
pub fn match_by_overlap<'a>(inputs: &'a ObjectSet, outputs: &'a ObjectSet) -> Vec<MatchPair<'a>> {
    greedy_match(inputs, outputs, |a, b| {
        let shared = a.shared_locations(b);
        (shared > 0).then_some(shared as f64)
    })
}

/// Pair objects with identical normalized location sets, preferring the
/// candidate whose center of mass is closest.
pub fn match_by_shape_and_position<'a>(inputs: &'a ObjectSet, outputs: &'a ObjectSet) -> Vec<MatchPair<'a>> {
    greedy_match(inputs, outputs, |a, b| {
        (a.shape() == b.shape())
            .then(|| -squared_distance(a.center_of_mass(), b.center_of_mass()))
    })
}

/// Pair each input object with the nearest unused output object by center
/// of mass, whatever its shape.
pub fn match_by_centroid<'a>(inputs: &'a ObjectSet, outputs: &'a ObjectSet) -> Vec<MatchPair<'a>> {
    greedy_match(inputs, outputs, |a, b| {
        Some(-squared_distance(a.center_of_mass(), b.center_of_mass()))
    })
}

/// Pair objects occupying exactly the same cell locations.
pub fn match_by_location<'a>(inputs: &'a ObjectSet, outputs: &'a ObjectSet) -> Vec<MatchPair<'a>> {
    greedy_match(inputs, outputs, |a, b| (a.locations() == b.locations()).then_some(0.0))
}
