use egui::{Color32, Pos2, Vec2};
use placard::editor::{Editor, EditorOptions};
use placard::object::{Fill, SceneObject, ShapeKind, ShapeStyle};
use placard::scene::Scene;
use placard::{CommandError, EditorError};
use uuid::Uuid;

fn open() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    Editor::new(EditorOptions::default()).unwrap()
}

fn add_rect(editor: &mut Editor) -> Uuid {
    let style = ShapeStyle {
        fill: Fill::solid(Color32::RED),
        ..Default::default()
    };
    editor.add_shape(ShapeKind::Rectangle, style).unwrap()
}

// Object ids in stack order, bottom first
fn order(editor: &Editor) -> Vec<Uuid> {
    editor.objects().iter().map(|o| o.id).collect()
}

// Opens an editor whose document already contains one image object
fn open_with_image() -> (Editor, Uuid) {
    let mut scene = Scene::new(900, 1200);
    let image = SceneObject::image("https://example.com/a.png", None, Vec2::new(300.0, 200.0));
    let id = scene.add(image);
    let json = placard::serializer::serialize_scene(&scene).unwrap();
    let editor = Editor::new(EditorOptions {
        initial_json: Some(json),
        ..Default::default()
    })
    .unwrap();
    (editor, id)
}

#[test]
fn adding_a_shape_centers_and_selects_it() {
    let mut editor = open();
    let id = add_rect(&mut editor);

    assert_eq!(editor.objects().len(), 1);
    assert!(editor.selection().contains(id));

    // 400x400 default shape centered on a 900x1200 workspace
    let object = editor.objects().first().unwrap();
    assert_eq!(object.position, Pos2::new(250.0, 400.0));
    assert_eq!(object.size, Vec2::new(400.0, 400.0));
}

#[test]
fn adding_text_uses_the_content_and_selects_it() {
    let mut editor = open();
    let id = editor.add_text("Vote!").unwrap();

    let object = editor.objects().first().unwrap();
    assert_eq!(object.as_text().unwrap().content, "Vote!");
    assert!(editor.selection().contains(id));
}

#[test]
fn undo_walks_back_to_the_initial_scene() {
    let mut editor = open();
    add_rect(&mut editor);
    add_rect(&mut editor);
    add_rect(&mut editor);

    assert!(editor.undo().unwrap());
    assert!(editor.undo().unwrap());
    assert!(editor.undo().unwrap());
    assert!(editor.objects().is_empty());

    // At the start of history undo reports false
    assert!(!editor.undo().unwrap());
}

#[test]
fn redo_reapplies_undone_mutations() {
    let mut editor = open();
    let a = add_rect(&mut editor);
    let b = add_rect(&mut editor);

    editor.undo().unwrap();
    assert_eq!(order(&editor), vec![a]);

    assert!(editor.redo().unwrap());
    assert_eq!(order(&editor), vec![a, b]);
    assert!(!editor.redo().unwrap());
}

#[test]
fn a_new_command_after_undo_discards_the_redo_branch() {
    let mut editor = open();
    let a = add_rect(&mut editor);
    add_rect(&mut editor);

    editor.undo().unwrap();
    let c = add_rect(&mut editor);

    assert!(!editor.can_redo());
    assert!(!editor.redo().unwrap());
    assert_eq!(order(&editor), vec![a, c]);
}

#[test]
fn undo_drops_objects_from_the_selection_when_they_disappear() {
    let mut editor = open();
    add_rect(&mut editor);
    let b = add_rect(&mut editor);

    editor.select(&[b]);
    editor.undo().unwrap();

    // b no longer exists in the restored snapshot
    assert!(editor.selection().is_empty());
}

#[test]
fn reorder_moves_a_selected_object_through_the_stack() {
    let mut editor = open();
    let a = add_rect(&mut editor);
    let b = add_rect(&mut editor);
    let c = add_rect(&mut editor);

    editor.select(&[a]);
    editor.bring_to_front().unwrap();
    assert_eq!(order(&editor), vec![b, c, a]);

    editor.send_to_back().unwrap();
    assert_eq!(order(&editor), vec![a, b, c]);

    editor.bring_forward().unwrap();
    assert_eq!(order(&editor), vec![b, a, c]);

    editor.send_backwards().unwrap();
    assert_eq!(order(&editor), vec![a, b, c]);
}

#[test]
fn reorder_preserves_the_relative_order_of_a_multi_selection() {
    let mut editor = open();
    let a = add_rect(&mut editor);
    let b = add_rect(&mut editor);
    let c = add_rect(&mut editor);
    let d = add_rect(&mut editor);

    editor.select(&[b, d]);
    editor.bring_to_front().unwrap();
    assert_eq!(order(&editor), vec![a, c, b, d]);

    editor.send_to_back().unwrap();
    assert_eq!(order(&editor), vec![b, d, a, c]);
}

#[test]
fn reorder_at_a_boundary_changes_nothing_and_records_no_history() {
    let mut editor = open();
    let a = add_rect(&mut editor);

    editor.select(&[a]);
    editor.bring_to_front().unwrap();
    assert_eq!(order(&editor), vec![a]);

    // The clamped move pushed nothing, so one undo removes the add
    assert!(editor.undo().unwrap());
    assert!(editor.objects().is_empty());
    assert!(!editor.can_undo());
}

#[test]
fn style_commands_require_a_selection() {
    let mut editor = open();
    add_rect(&mut editor);
    editor.clear_selection();

    let err = editor.change_fill_color(Color32::BLUE).unwrap_err();
    assert!(matches!(
        err,
        EditorError::Command(CommandError::IneligibleSelection(_))
    ));
    // Nothing was recorded for the failed command
    assert!(editor.can_undo());
    editor.undo().unwrap();
    assert!(editor.objects().is_empty());
}

#[test]
fn fill_color_applies_to_every_selected_object() {
    let mut editor = open();
    let a = add_rect(&mut editor);
    let b = add_rect(&mut editor);

    editor.select(&[a, b]);
    editor.change_fill_color(Color32::GREEN).unwrap();

    for object in editor.objects() {
        assert_eq!(object.fill, Fill::solid(Color32::GREEN));
    }
}

#[test]
fn opacity_outside_the_unit_range_is_rejected() {
    let mut editor = open();
    add_rect(&mut editor);

    let err = editor.change_opacity(1.5).unwrap_err();
    assert!(matches!(
        err,
        EditorError::Command(CommandError::InvalidParameters(_))
    ));
    assert_eq!(editor.objects()[0].opacity, 1.0);

    editor.change_opacity(0.4).unwrap();
    assert_eq!(editor.objects()[0].opacity, 0.4);
}

#[test]
fn negative_stroke_width_is_rejected() {
    let mut editor = open();
    add_rect(&mut editor);

    let err = editor.change_stroke_width(-1.0).unwrap_err();
    assert!(matches!(
        err,
        EditorError::Command(CommandError::InvalidParameters(_))
    ));
}

#[test]
fn font_commands_only_touch_text_objects() {
    let mut editor = open();
    let rect = add_rect(&mut editor);
    let text = editor.add_text("Hello").unwrap();

    editor.select(&[rect, text]);
    editor.change_font_size(48.0).unwrap();

    let props = editor.objects()[1].as_text().unwrap();
    assert_eq!(props.style.size, 48.0);

    // A selection with no text at all is ineligible
    editor.select(&[rect]);
    let err = editor.change_font_family("Georgia").unwrap_err();
    assert!(matches!(
        err,
        EditorError::Command(CommandError::IneligibleSelection(_))
    ));
}

#[test]
fn text_effect_presets_set_the_shadow_stack() {
    let mut editor = open();
    editor.add_text("Headline").unwrap();

    editor.change_text_effect("Soft Shadow").unwrap();
    let shadows = editor.active_text_shadow().unwrap();
    assert_eq!(shadows.len(), 1);
    assert_eq!(shadows[0].blur, 4.0);

    editor.change_text_effect("None").unwrap();
    assert!(editor.active_text_shadow().unwrap().is_empty());

    let err = editor.change_text_effect("Sparkle").unwrap_err();
    assert!(matches!(
        err,
        EditorError::Command(CommandError::UnknownEffect(_))
    ));
}

#[test]
fn image_filter_requires_exactly_one_selected_image() {
    let (mut editor, image) = open_with_image();
    let rect = add_rect(&mut editor);

    editor.select(&[image]);
    editor.change_image_filter("sepia").unwrap();
    assert_eq!(editor.active_image_filter(), Some("sepia"));

    // "none" clears the filter list
    editor.change_image_filter("none").unwrap();
    assert_eq!(editor.active_image_filter(), None);

    let err = editor.change_image_filter("vortex").unwrap_err();
    assert!(matches!(
        err,
        EditorError::Command(CommandError::UnknownFilter(_))
    ));

    editor.select(&[rect, image]);
    let err = editor.change_image_filter("sepia").unwrap_err();
    assert!(matches!(
        err,
        EditorError::Command(CommandError::IneligibleSelection(_))
    ));
}

#[test]
fn applied_filter_survives_undo_and_redo() {
    let (mut editor, image) = open_with_image();

    editor.select(&[image]);
    editor.change_image_filter("grayscale").unwrap();

    editor.undo().unwrap();
    editor.select(&[image]);
    assert_eq!(editor.active_image_filter(), None);

    editor.redo().unwrap();
    editor.select(&[image]);
    assert_eq!(editor.active_image_filter(), Some("grayscale"));
}

#[test]
fn canvas_resize_validates_and_is_undoable() {
    let mut editor = open();

    let err = editor.change_size(0, 1080).unwrap_err();
    assert!(matches!(
        err,
        EditorError::Command(CommandError::InvalidParameters(_))
    ));
    assert_eq!(editor.workspace().width, 900);

    editor.change_size(1080, 1080).unwrap();
    assert_eq!(editor.workspace().width, 1080);
    assert_eq!(editor.workspace().height, 1080);

    editor.undo().unwrap();
    assert_eq!(editor.workspace().width, 900);
    assert_eq!(editor.workspace().height, 1200);
}

#[test]
fn background_change_swaps_the_workspace_fill() {
    let mut editor = open();
    editor.change_background(Color32::BLACK).unwrap();
    assert_eq!(editor.workspace().fill, Fill::solid(Color32::BLACK));
}

#[test]
fn locking_an_object_removes_it_from_the_selection() {
    let mut editor = open();
    let id = add_rect(&mut editor);
    assert!(editor.selection().contains(id));

    editor.toggle_lock(id).unwrap();
    assert!(!editor.selection().contains(id));

    // Locked objects are skipped by selection
    editor.select(&[id]);
    assert!(editor.selection().is_empty());

    editor.toggle_lock(id).unwrap();
    editor.select(&[id]);
    assert!(editor.selection().contains(id));
}

#[test]
fn visibility_toggle_keeps_the_object_in_the_sequence() {
    let mut editor = open();
    let id = add_rect(&mut editor);

    editor.toggle_visibility(id).unwrap();
    assert_eq!(editor.objects().len(), 1);
    assert!(!editor.objects()[0].visible);
}

#[test]
fn rename_updates_the_display_name() {
    let mut editor = open();
    let id = add_rect(&mut editor);

    editor.rename(id, "Campaign banner").unwrap();
    assert_eq!(editor.objects()[0].name, "Campaign banner");
}

#[test]
fn delete_removes_the_selection_and_clears_it() {
    let mut editor = open();
    let a = add_rect(&mut editor);
    let b = add_rect(&mut editor);
    let c = add_rect(&mut editor);

    editor.select(&[a, c]);
    editor.delete_selected().unwrap();

    assert_eq!(order(&editor), vec![b]);
    assert!(editor.selection().is_empty());

    let err = editor.delete_selected().unwrap_err();
    assert!(matches!(
        err,
        EditorError::Command(CommandError::IneligibleSelection(_))
    ));
}

#[test]
fn paste_inserts_offset_clones_with_fresh_ids() {
    let mut editor = open();
    let id = add_rect(&mut editor);
    let original_position = editor.objects()[0].position;

    editor.on_copy();
    editor.on_paste().unwrap();

    assert_eq!(editor.objects().len(), 2);
    let pasted = editor.objects().last().unwrap();
    assert_ne!(pasted.id, id);
    assert_eq!(pasted.position, original_position + Vec2::splat(10.0));
    assert!(editor.selection().contains(pasted.id));

    // The clipboard survives, so pasting again adds a third copy
    editor.on_paste().unwrap();
    assert_eq!(editor.objects().len(), 3);
}

#[test]
fn paste_without_a_prior_copy_is_a_no_op() {
    let mut editor = open();
    editor.on_paste().unwrap();
    assert!(editor.objects().is_empty());
    assert!(!editor.can_undo());
}

#[test]
fn history_truncates_the_future_on_push() {
    use placard::{History, Snapshot};

    let snap = |tag: &str| Snapshot {
        json: tag.to_string(),
        width: 900,
        height: 1200,
    };

    let mut history = History::new(snap("s0"));
    history.push(snap("s1"));
    history.push(snap("s2"));
    assert_eq!(history.depth(), 3);

    assert_eq!(history.undo().unwrap().json, "s1");
    history.push(snap("s3"));

    // s2 is gone; the future was discarded
    assert_eq!(history.depth(), 3);
    assert!(!history.can_redo());
    assert_eq!(history.undo().unwrap().json, "s1");
    assert_eq!(history.redo().unwrap().json, "s3");
}

#[test]
fn shadow_presets_apply_across_a_multi_text_selection() {
    let mut editor = open();
    let rect = add_rect(&mut editor);
    let heading = editor.add_text("Heading").unwrap();
    let body = editor.add_text("Body copy").unwrap();

    editor.select(&[rect, heading, body]);
    editor.change_text_effect("Hard Shadow").unwrap();

    // Both text objects got the same stack
    for id in [heading, body] {
        let object = editor.objects().iter().find(|o| o.id == id).unwrap();
        let shadows = &object.as_text().unwrap().shadow;
        assert_eq!(shadows.len(), 1);
        assert_eq!(shadows[0].offset, Vec2::new(4.0, 4.0));
        assert_eq!(shadows[0].blur, 0.0);
    }

    // The shape in the selection is untouched by a text command
    let shape = editor.objects().iter().find(|o| o.id == rect).unwrap();
    assert!(shape.as_text().is_none());
}
