//! Engine behaviour through a minimal hand-written shape pair

use std::sync::Arc;

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use wfdef_builder::{
    BuildError, BuildMode, Def, DefBuilder, FieldKind, FieldSlot, FieldSpec, IllegalArgumentError,
    ListSlot, MapSlot, RecordAssembler, Shape,
};
use wfdef_tree::{ExceptionTree, HasLoadExceptionTree, LoadExceptionTree, SupplyError};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Broken(&'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
enum PointAttr {
    X,
    Y,
    Label,
}

#[derive(Debug, Clone)]
struct Point {
    x: i32,
    y: i32,
    label: Option<String>,
    tree: Arc<ExceptionTree<PointAttr>>,
}

impl Shape for Point {
    type Attribute = PointAttr;
    const NAME: &'static str = "Point";
    const FIELDS: &'static [FieldSpec<PointAttr>] = &[
        FieldSpec::required(PointAttr::X, FieldKind::Scalar),
        FieldSpec::required(PointAttr::Y, FieldKind::Scalar),
        FieldSpec::optional(PointAttr::Label, FieldKind::Scalar),
    ];
}

impl HasLoadExceptionTree for Point {
    fn as_load_exception_tree(&self) -> Option<Arc<dyn LoadExceptionTree>> {
        let tree: Arc<dyn LoadExceptionTree> = self.tree.clone();
        Some(tree)
    }
}

impl Def for Point {
    type Shape = Self;
    type Builder = PointBuilder;

    fn load_exception_tree(&self) -> &Arc<ExceptionTree<PointAttr>> {
        &self.tree
    }
}

#[derive(Debug, Default)]
struct PointBuilder {
    mode: BuildMode,
    x: FieldSlot<i32>,
    y: FieldSlot<i32>,
    label: FieldSlot<String>,
}

impl PointBuilder {
    fn x(mut self, v: i32) -> Self {
        self.x.set(v);
        self
    }

    fn y(mut self, v: i32) -> Self {
        self.y.set(v);
        self
    }

    fn y_from(mut self, f: impl FnOnce() -> Result<i32, Broken>) -> Self {
        self.y.set_from(f);
        self
    }

    fn label_from(mut self, f: impl FnOnce() -> Result<String, Broken>) -> Self {
        self.label.set_from(f);
        self
    }
}

impl DefBuilder for PointBuilder {
    type Def = Point;

    fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    fn build(self) -> Result<Point, BuildError> {
        let mut a = RecordAssembler::<Point>::new(self.mode);
        let x = a.required(PointAttr::X, self.x, || 0);
        let y = a.required(PointAttr::Y, self.y, || 0);
        let label = a.optional(PointAttr::Label, self.label);
        let tree = Arc::new(a.finish()?);
        Ok(Point { x, y, label, tree })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
enum PathAttr {
    Origin,
    Points,
    Tags,
}

struct PathShape;

impl Shape for PathShape {
    type Attribute = PathAttr;
    const NAME: &'static str = "Path";
    const FIELDS: &'static [FieldSpec<PathAttr>] = &[
        FieldSpec::required(PathAttr::Origin, FieldKind::Record),
        FieldSpec::optional(PathAttr::Points, FieldKind::List),
        FieldSpec::optional(PathAttr::Tags, FieldKind::Map),
    ];
}

fn point(x: i32, y: i32) -> Point {
    Point::builder().x(x).y(y).build().unwrap()
}

fn assemble_path(
    origin: FieldSlot<Point>,
    points: ListSlot<Point>,
    tags: MapSlot<String, String>,
) -> ExceptionTree<PathAttr> {
    let mut a = RecordAssembler::<PathShape>::new(BuildMode::Lenient);
    a.required(PathAttr::Origin, origin, || point(0, 0));
    a.list(PathAttr::Points, points);
    a.map(PathAttr::Tags, tags);
    a.finish().unwrap()
}

#[test]
fn lenient_build_substitutes_placeholder_and_records_failure() {
    let p = Point::builder().x(1).y_from(|| Err(Broken("y?"))).build().unwrap();
    assert_eq!((p.x, p.y), (1, 0));
    assert!(p.has_exceptions());
    assert_eq!(p.supply_exception(PointAttr::Y).unwrap().to_string(), "y?");
    assert!(p.supply_exception(PointAttr::X).is_none());
}

#[test]
fn lenient_build_records_unset_required_fields() {
    let p = Point::builder().x(1).build().unwrap();
    assert_eq!(p.y, 0);
    assert!(p.has_exceptions());
    assert!(!p.has_exceptions_at(PointAttr::X));
    let cause = p.supply_exception(PointAttr::Y).unwrap();
    let arg = cause.downcast_ref::<IllegalArgumentError>().unwrap();
    assert_eq!(arg.fields(), &["y"]);
    assert_eq!(cause.to_string(), "required field(s) without a value: y");
}

#[test]
fn lenient_build_leaves_unset_optional_fields_unflagged() {
    let p = point(1, 2);
    assert!(p.label.is_none());
    assert!(!p.has_exceptions());
}

#[test]
fn strict_build_names_every_missing_field() {
    let err = Point::builder().strict().build().unwrap_err();
    assert_eq!(err.shape(), "Point");
    assert_eq!(err.missing_fields(), &["x", "y"]);
}

#[test]
fn strict_build_rejects_failed_required_supplier() {
    let err = Point::builder()
        .strict()
        .x(1)
        .y_from(|| Err(Broken("corrupt")))
        .build()
        .unwrap_err();
    assert_eq!(err.missing_fields(), &["y"]);
}

#[test]
fn strict_build_tolerates_failed_optional_supplier() {
    let p = Point::builder()
        .strict()
        .x(1)
        .y(2)
        .label_from(|| Err(Broken("no label")))
        .build()
        .unwrap();
    assert!(p.label.is_none());
    assert!(p.has_exceptions_at(PointAttr::Label));
}

#[test]
fn nested_record_failures_propagate_to_parent() {
    let broken = Point::builder().x(1).y_from(|| Err(Broken("y"))).build().unwrap();
    let mut origin = FieldSlot::new();
    origin.set(broken);

    let tree = assemble_path(origin, ListSlot::new(), MapSlot::new());
    assert!(tree.has_exceptions());
    assert!(tree.supply_exception_at(&PathAttr::Origin).is_none());
    let child = tree.exception_tree_as::<PointAttr>(&PathAttr::Origin).unwrap();
    assert!(child.has_exceptions_at(&PointAttr::Y));
}

#[test]
fn nested_record_missing_field_propagates_to_parent() {
    let mut origin = FieldSlot::new();
    origin.set(Point::builder().y(4).build().unwrap());

    let tree = assemble_path(origin, ListSlot::new(), MapSlot::new());
    assert!(tree.has_exceptions_at(&PathAttr::Origin));
    let paths: Vec<String> = tree
        .flattened_with_paths()
        .into_iter()
        .map(|(p, _)| p.to_string())
        .collect();
    assert_eq!(paths, vec!["origin.x"]);
}

#[test]
fn list_children_cover_failed_indices_and_failing_elements() {
    let mut points = ListSlot::new();
    points.add(point(1, 1));
    points.add_from(|| Err::<Point, _>(Broken("elem")), point(0, 0));
    points.add(Point::builder().x(5).y_from(|| Err(Broken("deep"))).build().unwrap());
    let mut origin = FieldSlot::new();
    origin.set(point(0, 0));

    let tree = assemble_path(origin, points, MapSlot::new());
    let list = tree.exception_tree_as::<usize>(&PathAttr::Points).unwrap();
    assert!(list.supply_exception().is_none());
    assert_eq!(list.exceptional_children().keys().copied().collect::<Vec<_>>(), vec![1, 2]);

    let paths: Vec<String> = tree
        .flattened_with_paths()
        .into_iter()
        .map(|(p, e)| format!("{p}: {e}"))
        .collect();
    assert_eq!(paths, vec!["points.1: elem", "points.2.y: deep"]);
}

#[test]
fn map_bulk_failure_is_independent_of_entry_failures() {
    let mut tags = MapSlot::new();
    tags.put("a".to_string(), "1".to_string());
    tags.set_from(|| Err::<IndexMap<String, String>, _>(Broken("bulk")));
    tags.put_from("b".to_string(), || Err::<String, _>(Broken("entry")), String::new());
    let mut origin = FieldSlot::new();
    origin.set(point(0, 0));

    let tree = assemble_path(origin, ListSlot::new(), tags);
    let map = tree.exception_tree_as::<String>(&PathAttr::Tags).unwrap();
    assert_eq!(map.supply_exception().map(ToString::to_string).as_deref(), Some("bulk"));
    assert_eq!(map.exceptional_children().len(), 1);
    assert!(map.has_exceptions_at(&"b".to_string()));
    let flat: Vec<String> = tree
        .flattened_load_exceptions()
        .iter()
        .map(SupplyError::to_string)
        .collect();
    assert_eq!(flat, vec!["bulk", "entry"]);
}

#[test]
fn untouched_composites_leave_no_trace() {
    let mut origin = FieldSlot::new();
    origin.set(point(3, 4));
    let mut points = ListSlot::new();
    points.add(point(1, 2));
    let tree = assemble_path(origin, points, MapSlot::new());
    assert!(!tree.has_exceptions());
    assert!(tree.exceptional_children().is_empty());
}
