use arc_categorize::core::{Category, ClassifyError};
use arc_categorize::perception::grid::Grid;
use arc_categorize::perception::objects::{extract_objects, ExtractConfig, ObjectSet};
use arc_categorize::rules::{colour, geometry, movement, number, object, CategoryRules, Rule};
use arc_categorize::scoring::{evaluate_category, Normalization};
use arc_categorize::{ArcTask, Classifier, ScoringConfig};

fn objs(grid: &Grid) -> ObjectSet {
    extract_objects(grid, ExtractConfig::default()).unwrap()
}

#[test]
fn horizontal_mirror_task_is_geometry() {
    let inp = vec![vec![1, 2], vec![3, 4]];
    let out = vec![vec![2, 1], vec![4, 3]];
    assert!(geometry::mirrored_horizontally(&inp, &out, None, None));

    let task = ArcTask::from_pairs("mirror", vec![(inp, out)]);
    let clf = Classifier::standard().unwrap();
    let result = clf.classify(&task);
    let geometry = result.score(Category::Geometry);
    assert!(geometry > result.score(Category::Colour));
    assert!(geometry > result.score(Category::Number));
    assert_eq!(result.predicted, Category::Geometry);
}

#[test]
fn mirror_task_raw_scores() {
    let task = ArcTask::from_pairs("mirror", vec![(vec![vec![1, 2], vec![3, 4]], vec![vec![2, 1], vec![4, 3]])]);
    let config = ScoringConfig { normalization: Normalization::None, ..ScoringConfig::default() };
    let clf = Classifier::with_config(config).unwrap();
    let geometry = evaluate_category(&task, clf.rules().get(Category::Geometry).unwrap(), clf.config());
    let number = evaluate_category(&task, clf.rules().get(Category::Number).unwrap(), clf.config());
    // Only the mirror rule passes among seven geometry rules. Among the
    // number rules only size_scaling passes, with every object at ratio 1.
    assert!((geometry - (1.0 / 14.0 + 6.0 * 0.01)).abs() < 1e-12);
    assert!((number - (1.0 / 25.0 + 4.0 * 0.01)).abs() < 1e-12);
}

#[test]
fn pure_translation() {
    let inp = vec![vec![5, 5], vec![0, 0], vec![0, 0]];
    let out = vec![vec![0, 0], vec![0, 0], vec![5, 5]];
    let (io, oo) = (objs(&inp), objs(&out));
    let (io, oo) = (Some(&io), Some(&oo));
    assert!(movement::translation(&inp, &out, io, oo));
    assert!(!colour::colour_mapping(&inp, &out, io, oo));
    assert!(!colour::palette_swap(&inp, &out, io, oo));
    assert!(!object::objects_get_larger(&inp, &out, io, oo));
    assert!(!object::objects_get_smaller(&inp, &out, io, oo));
}

#[test]
fn colour_substitution_only() {
    let inp = vec![vec![1, 1], vec![0, 0]];
    let out = vec![vec![2, 2], vec![0, 0]];
    assert!(colour::colour_substitution(&inp, &out, None, None));
    assert!(!colour::colour_switch(&inp, &out, None, None));
    assert!(!number::pixel_count_change(&inp, &out, None, None));
}

#[test]
fn duplication_raises_object_count() {
    let inp = vec![vec![1, 1, 0, 0, 0], vec![0, 0, 0, 0, 0]];
    let out = vec![vec![1, 1, 0, 1, 1], vec![0, 0, 0, 0, 0]];
    let (io, oo) = (objs(&inp), objs(&out));
    assert_eq!(io.len(), 1);
    assert_eq!(oo.len(), 2);
    let (io, oo) = (Some(&io), Some(&oo));
    assert!(object::new_object_created(&inp, &out, io, oo));
    assert!(number::shape_duplicated_in_output_only(&inp, &out, io, oo));
    assert!(number::object_count_change(&inp, &out, io, oo));
}

#[test]
fn zero_prior_category_is_rejected() {
    fn always(_: &Grid, _: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
        true
    }
    let err = CategoryRules::new(
        Category::Object,
        vec![Rule::new("rule_a", always, 0.0, 1), Rule::new("rule_b", always, 0.0, 1)],
    )
    .unwrap_err();
    assert!(matches!(err, ClassifyError::ZeroPriorSum { category: Category::Object }));
}

#[test]
fn task_json_round_trip_through_classifier() {
    let json = r#"{"train":[{"input":[[1,1],[0,0]],"output":[[2,2],[0,0]]}],"test":[{"input":[[1,0]]}]}"#;
    let task = arc_categorize::perception::grid::parse_arc_task("subst", json).unwrap();
    assert_eq!(task.id, "subst");
    assert_eq!(task.test.len(), 1);
    let explained = Classifier::standard().unwrap().explain(&task);
    let colour = &explained.categories[Category::Colour.index()];
    let subst = colour.rules.iter().find(|r| r.name == "colour_substitution").unwrap();
    assert_eq!(subst.passes, vec![true]);
}
