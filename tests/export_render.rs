use egui::{Color32, Pos2, Vec2};
use placard::export;
use placard::object::{Fill, SceneObject, ShapeKind, ShapeStyle};
use placard::scene::Scene;

fn full_canvas_rect(scene: &Scene, color: Color32) -> SceneObject {
    let workspace = scene.workspace();
    let mut rect = SceneObject::shape(
        ShapeKind::Rectangle,
        ShapeStyle {
            fill: Fill::solid(color),
            ..Default::default()
        },
    );
    rect.position = Pos2::new(0.0, 0.0);
    rect.size = Vec2::new(workspace.width as f32, workspace.height as f32);
    rect
}

#[test]
fn the_rendered_canvas_matches_the_workspace() {
    let mut scene = Scene::new(100, 80);
    scene.workspace_mut().fill = Fill::solid(Color32::RED);

    let rendered = export::render(&scene);
    assert_eq!(rendered.dimensions(), (100, 80));
    assert_eq!(rendered.get_pixel(50, 40).0, [255, 0, 0, 255]);
}

#[test]
fn objects_paint_over_the_background_in_stack_order() {
    let mut scene = Scene::new(64, 64);
    scene.workspace_mut().fill = Fill::solid(Color32::RED);
    scene.add(full_canvas_rect(&scene, Color32::BLUE));

    let rendered = export::render(&scene);
    assert_eq!(rendered.get_pixel(32, 32).0, [0, 0, 255, 255]);
}

#[test]
fn hidden_objects_are_not_rendered() {
    let mut scene = Scene::new(64, 64);
    scene.workspace_mut().fill = Fill::solid(Color32::RED);
    let mut rect = full_canvas_rect(&scene, Color32::BLUE);
    rect.visible = false;
    scene.add(rect);

    let rendered = export::render(&scene);
    assert_eq!(rendered.get_pixel(32, 32).0, [255, 0, 0, 255]);
}

#[test]
fn png_export_round_trips_through_a_decoder() {
    let mut scene = Scene::new(32, 48);
    scene.workspace_mut().fill = Fill::solid(Color32::from_rgb(0, 128, 0));

    let bytes = export::export_png(&scene).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 32);
    assert_eq!(decoded.height(), 48);
    assert_eq!(decoded.to_rgba8().get_pixel(10, 10).0, [0, 128, 0, 255]);
}

#[test]
fn jpeg_export_produces_a_decodable_image() {
    let mut scene = Scene::new(32, 32);
    scene.workspace_mut().fill = Fill::solid(Color32::WHITE);

    let bytes = export::export_jpeg(&scene).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 32);
    assert_eq!(decoded.height(), 32);
}
