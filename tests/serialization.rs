use egui::{Color32, Pos2, Vec2};
use placard::object::{
    Fill, GradientStop, ImageFilter, SceneObject, Shadow, ShapeKind, ShapeStyle, StrokeStyle,
    TextAlign,
};
use placard::scene::Scene;
use placard::serializer::{self, PersistenceError};

// A scene touching every attribute the document format carries
fn busy_scene() -> Scene {
    let mut scene = Scene::new(1080, 1350);
    scene.workspace_mut().fill = Fill::Linear {
        start: Pos2::new(0.0, 0.0),
        end: Pos2::new(0.0, 1350.0),
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: Color32::from_rgb(230, 30, 30),
            },
            GradientStop {
                offset: 1.0,
                color: Color32::WHITE,
            },
        ],
    };

    let mut rect = SceneObject::shape(
        ShapeKind::Rectangle,
        ShapeStyle {
            fill: Fill::solid(Color32::from_rgb(20, 40, 200)),
            stroke: StrokeStyle {
                color: Color32::BLACK,
                width: 3.0,
            },
        },
    );
    rect.opacity = 0.8;
    rect.rotation = 15.0;
    rect.name = "Backdrop".to_string();
    rect.locked = true;
    scene.add(rect);

    let mut text = SceneObject::text("Vote on Tuesday");
    if let Some(props) = text.as_text_mut() {
        props.style.family = "Georgia".to_string();
        props.style.size = 64.0;
        props.style.align = TextAlign::Center;
        props.shadow = vec![Shadow::new(
            Color32::from_rgba_unmultiplied(0, 0, 0, 77),
            2.0,
            2.0,
            4.0,
        )];
    }
    scene.add(text);

    let mut image = SceneObject::image("https://example.com/candidate.png", None, Vec2::new(400.0, 300.0));
    if let Some(props) = image.as_image_mut() {
        props.filters = vec![ImageFilter::Sepia];
    }
    image.visible = false;
    scene.add(image);

    scene
}

#[test]
fn a_scene_survives_the_round_trip() {
    let scene = busy_scene();
    let json = serializer::serialize_scene(&scene).unwrap();
    let restored = serializer::deserialize_scene(&json).unwrap();
    assert_eq!(scene, restored);
}

#[test]
fn the_document_keeps_stack_order() {
    let scene = busy_scene();
    let json = serializer::serialize_scene(&scene).unwrap();
    let restored = serializer::deserialize_scene(&json).unwrap();

    let names: Vec<&str> = restored.objects().iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names[0], "Backdrop");
    assert_eq!(restored.objects().len(), 3);
}

#[test]
fn filters_visibility_and_locks_are_persisted() {
    let scene = busy_scene();
    let json = serializer::serialize_scene(&scene).unwrap();
    let restored = serializer::deserialize_scene(&json).unwrap();

    let rect = &restored.objects()[0];
    assert!(rect.locked);

    let image = &restored.objects()[2];
    assert!(!image.visible);
    assert_eq!(image.as_image().unwrap().applied_filter(), Some("sepia"));
}

#[test]
fn snapshot_carries_the_canvas_dimensions() {
    let scene = busy_scene();
    let snapshot = serializer::snapshot(&scene).unwrap();
    assert_eq!(snapshot.width, 1080);
    assert_eq!(snapshot.height, 1350);
    assert!(snapshot.json.contains("\"canvasWidth\":1080"));
}

#[test]
fn malformed_json_is_rejected() {
    let err = serializer::deserialize_scene("this is not a document").unwrap_err();
    assert!(matches!(err, PersistenceError::Serialization(_)));
}

#[test]
fn degenerate_dimensions_fail_fast() {
    // A syntactically valid document with a zero-width workspace
    let json = r#"{
        "objects": [],
        "workspace": { "width": 0, "height": 1200, "fill": { "type": "solid", "color": [255, 255, 255, 255] } },
        "canvasWidth": 0,
        "canvasHeight": 1200
    }"#;
    let err = serializer::deserialize_scene(json).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidDocument(_)));
}

#[test]
fn pixel_caches_are_not_part_of_the_document() {
    let mut scene = Scene::new(900, 1200);
    let pixels = placard::object::PixelData {
        rgba: std::sync::Arc::new(vec![255; 4 * 4 * 4]),
        width: 4,
        height: 4,
    };
    scene.add(SceneObject::image(
        "https://example.com/p.png",
        Some(pixels),
        Vec2::new(4.0, 4.0),
    ));

    let json = serializer::serialize_scene(&scene).unwrap();
    let restored = serializer::deserialize_scene(&json).unwrap();

    // The cache is dropped on the wire; the source URL is what persists
    let props = restored.objects()[0].as_image().unwrap();
    assert!(props.pixels.is_none());
    assert_eq!(props.src, "https://example.com/p.png");
}
