use egui::{Pos2, Vec2};
use placard::object::{ObjectKind, SceneObject, ShapeKind, ShapeStyle};
use placard::scene::Scene;
use placard::selection::SelectionTracker;

fn group_of_two() -> SceneObject {
    let mut a = SceneObject::shape(ShapeKind::Rectangle, ShapeStyle::default());
    a.position = Pos2::new(10.0, 10.0);
    let mut b = SceneObject::shape(ShapeKind::Circle, ShapeStyle::default());
    b.position = Pos2::new(100.0, 100.0);
    SceneObject::new(
        ObjectKind::Group {
            children: vec![a, b],
        },
        Pos2::new(10.0, 10.0),
        Vec2::new(490.0, 490.0),
    )
}

#[test]
fn translating_a_group_moves_its_children() {
    let mut group = group_of_two();
    group.translate(Vec2::new(5.0, -5.0));

    assert_eq!(group.position, Pos2::new(15.0, 5.0));
    if let ObjectKind::Group { children } = &group.kind {
        assert_eq!(children[0].position, Pos2::new(15.0, 5.0));
        assert_eq!(children[1].position, Pos2::new(105.0, 95.0));
    } else {
        panic!("group lost its children");
    }
}

#[test]
fn paste_clones_get_fresh_ids_recursively() {
    let group = group_of_two();
    let clone = group.clone_for_paste();

    assert_ne!(clone.id, group.id);
    assert_eq!(clone.position, group.position + Vec2::splat(10.0));
    let (ObjectKind::Group { children: original }, ObjectKind::Group { children: cloned }) =
        (&group.kind, &clone.kind)
    else {
        panic!("expected groups");
    };
    for (a, b) in original.iter().zip(cloned) {
        assert_ne!(a.id, b.id);
        assert_eq!(b.position, a.position + Vec2::splat(10.0));
    }
}

#[test]
fn resize_enforces_the_minimum_dimensions() {
    let mut rect = SceneObject::shape(ShapeKind::Rectangle, ShapeStyle::default());

    assert!(rect.resize(Vec2::new(1.0, 50.0)).is_err());
    assert_eq!(rect.size, Vec2::splat(400.0));

    rect.resize(Vec2::new(50.0, 60.0)).unwrap();
    assert_eq!(rect.size, Vec2::new(50.0, 60.0));
}

#[test]
fn display_names_follow_the_object_kind() {
    let rect = SceneObject::shape(ShapeKind::Rectangle, ShapeStyle::default());
    assert_eq!(rect.name, "Rectangle");

    let diamond = SceneObject::shape(ShapeKind::Diamond, ShapeStyle::default());
    assert_eq!(diamond.name, "Polygon");

    let text = SceneObject::text("hello");
    assert_eq!(text.name, "Text");
}

#[test]
fn selection_filters_locked_and_unknown_ids() {
    let mut scene = Scene::new(900, 1200);
    let free = scene.add(SceneObject::shape(ShapeKind::Circle, ShapeStyle::default()));
    let mut locked_object = SceneObject::shape(ShapeKind::Circle, ShapeStyle::default());
    locked_object.locked = true;
    let locked = scene.add(locked_object);
    let ghost = uuid::Uuid::new_v4();

    let mut selection = SelectionTracker::new();
    selection.set(&[free, locked, ghost], &scene);

    assert_eq!(selection.current(), &[free]);
    assert!(!selection.contains(locked));
}

#[test]
fn retain_existing_drops_removed_objects() {
    let mut scene = Scene::new(900, 1200);
    let a = scene.add(SceneObject::shape(ShapeKind::Circle, ShapeStyle::default()));
    let b = scene.add(SceneObject::shape(ShapeKind::Circle, ShapeStyle::default()));

    let mut selection = SelectionTracker::new();
    selection.set(&[a, b], &scene);

    scene.remove(a).unwrap();
    selection.retain_existing(&scene);
    assert_eq!(selection.current(), &[b]);
}

#[test]
fn reorder_clamps_at_the_stack_boundaries() {
    let mut scene = Scene::new(900, 1200);
    let a = scene.add(SceneObject::shape(ShapeKind::Circle, ShapeStyle::default()));
    let b = scene.add(SceneObject::shape(ShapeKind::Circle, ShapeStyle::default()));

    use placard::scene::ReorderTarget;
    assert!(!scene.reorder(a, ReorderTarget::Backwards));
    assert!(scene.reorder(a, ReorderTarget::Forward));
    assert_eq!(scene.index_of(a), Some(1));
    assert!(!scene.reorder(a, ReorderTarget::Front));
    assert_eq!(scene.index_of(b), Some(0));
}
