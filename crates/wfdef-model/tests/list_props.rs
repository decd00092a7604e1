//! Property tests for list and map facets on real shapes

use proptest::prelude::*;
use wfdef_builder::{Def, DefBuilder};
use wfdef_model::{AnnotationDef, ConnectionDef, CoordinateDef, WorkflowDef};
use wfdef_test_utils::failing;

#[derive(Debug, Clone)]
enum Step {
    Add(i32),
    AddFailing,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![any::<i32>().prop_map(Step::Add), Just(Step::AddFailing)]
}

proptest! {
    #[test]
    fn failed_indices_are_exactly_the_failing_adds(steps in prop::collection::vec(step(), 0..24)) {
        let mut builder = ConnectionDef::builder()
            .set_source_id(1)
            .set_source_port(0)
            .set_dest_id(2)
            .set_dest_port(0);
        let mut expected_failed = Vec::new();
        for (i, s) in steps.iter().enumerate() {
            builder = match s {
                Step::Add(v) => builder.add_to_bendpoints(CoordinateDef::new(*v, *v)),
                Step::AddFailing => {
                    expected_failed.push(i);
                    builder.add_to_bendpoints_from(failing("point"), CoordinateDef::new(-1, -1))
                }
            };
        }
        let c = builder.build().unwrap();

        prop_assert_eq!(c.bendpoints().len(), steps.len());
        let failed: Vec<usize> = c
            .bendpoints_exception_tree()
            .map(|t| t.exceptional_children().keys().copied().collect())
            .unwrap_or_default();
        prop_assert_eq!(&failed, &expected_failed);
        prop_assert_eq!(c.has_exceptions(), !expected_failed.is_empty());
        prop_assert_eq!(c.flattened_load_exceptions().len(), expected_failed.len());
    }

    #[test]
    fn map_keeps_one_entry_and_at_most_one_error_per_key(
        ops in prop::collection::vec((0u8..6, any::<bool>()), 0..32)
    ) {
        let mut builder = WorkflowDef::builder().set_name("wf").set_version("1");
        let mut last_failed = std::collections::HashMap::new();
        for (key, fails) in &ops {
            let key = format!("a{key}");
            builder = if *fails {
                builder.put_to_annotations_from(
                    key.clone(),
                    failing("entry"),
                    AnnotationDef::placeholder(),
                )
            } else {
                builder.put_to_annotations(key.clone(), AnnotationDef::placeholder())
            };
            last_failed.insert(key, *fails);
        }
        let wf = builder.build().unwrap();

        prop_assert_eq!(wf.annotations().len(), last_failed.len());
        let failing_keys = last_failed.values().filter(|f| **f).count();
        prop_assert_eq!(wf.flattened_load_exceptions().len(), failing_keys);
    }
}
