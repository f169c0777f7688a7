use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use egui::{Color32, Vec2};
use log::{error, info, warn};
use uuid::Uuid;

use crate::autosave::{AutosaveScheduler, DEFAULT_QUIET_INTERVAL, SavePayload};
use crate::command::{Command, CommandContext, CommandError, History};
use crate::error::EditorError;
use crate::event::{EditorEvent, EventBus};
use crate::export;
use crate::object::{
    Fill, ObjectKind, PixelData, SceneObject, Shadow, ShapeKind, ShapeStyle, TextAlign,
    text_effect,
};
use crate::scene::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Scene, Workspace};
use crate::selection::SelectionTracker;
use crate::serializer;
use crate::services::{AssetError, AssetStore, BackgroundRemoval, ProjectData, ProjectStore};
use crate::task::TaskRunner;
use crate::tool::ActiveTool;

/// Parameters for opening an editing session
#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub project_id: String,
    pub width: u32,
    pub height: u32,
    /// Serialized document to restore; a fresh scene when absent
    pub initial_json: Option<String>,
    pub autosave_quiet: Duration,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            initial_json: None,
            autosave_quiet: DEFAULT_QUIET_INTERVAL,
        }
    }
}

/// One active editing session, exclusively owning its scene model,
/// selection, and history.
///
/// Every document-mutating method follows the same sequence:
/// synchronous scene update, change notification, history push,
/// autosave mark. Methods that only touch transient UI state (tool
/// activation, selection) skip history and autosave.
///
/// All mutation happens on the caller's thread; async collaborator
/// results re-enter through [`Editor::pump`].
pub struct Editor {
    project_id: String,
    scene: Scene,
    selection: SelectionTracker,
    history: History,
    autosave: AutosaveScheduler,
    event_bus: EventBus,
    active_tool: ActiveTool,
    clipboard: Option<Vec<SceneObject>>,
    /// Decoded pixels by source, session-lifetime. Snapshots drop the
    /// caches on the wire, so restores reattach them from here.
    pixel_caches: HashMap<String, PixelData>,
    tasks: TaskRunner,
    project_store: Option<Arc<dyn ProjectStore>>,
    asset_store: Option<Arc<dyn AssetStore>>,
    background_removal: Option<Arc<dyn BackgroundRemoval>>,
    disposed: bool,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("project_id", &self.project_id)
            .field("objects", &self.scene.len())
            .field("selection", &self.selection.len())
            .field("pending_completions", &self.tasks.has_queued())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl Editor {
    pub fn new(options: EditorOptions) -> Result<Self, EditorError> {
        let scene = match options.initial_json.as_deref() {
            Some(json) if !json.is_empty() => serializer::deserialize_scene(json)?,
            _ => Scene::new(options.width, options.height),
        };
        let initial = serializer::snapshot(&scene)?;
        info!(
            "opening editor session for project {:?} ({}x{})",
            options.project_id,
            scene.workspace().width,
            scene.workspace().height
        );
        Ok(Self {
            project_id: options.project_id,
            scene,
            selection: SelectionTracker::new(),
            history: History::new(initial),
            autosave: AutosaveScheduler::new(options.autosave_quiet),
            event_bus: EventBus::new(),
            active_tool: ActiveTool::Select,
            clipboard: None,
            pixel_caches: HashMap::new(),
            tasks: TaskRunner::new()?,
            project_store: None,
            asset_store: None,
            background_removal: None,
            disposed: false,
        })
    }

    pub fn set_project_store(&mut self, store: Arc<dyn ProjectStore>) {
        self.project_store = Some(store);
    }

    pub fn set_asset_store(&mut self, store: Arc<dyn AssetStore>) {
        self.asset_store = Some(store);
    }

    pub fn set_background_removal(&mut self, service: Arc<dyn BackgroundRemoval>) {
        self.background_removal = Some(service);
    }

    // --- queries ---------------------------------------------------

    pub fn events(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Ordered object sequence, workspace excluded
    pub fn objects(&self) -> &[SceneObject] {
        self.scene.objects()
    }

    pub fn workspace(&self) -> &Workspace {
        self.scene.workspace()
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn selected_objects(&self) -> Vec<&SceneObject> {
        self.selection
            .current()
            .iter()
            .filter_map(|id| self.scene.find(*id))
            .collect()
    }

    pub fn active_tool(&self) -> ActiveTool {
        self.active_tool
    }

    /// Name of the filter on the single selected image, for the filter
    /// sidebar to reflect current state
    pub fn active_image_filter(&self) -> Option<&'static str> {
        let selected = self.selected_objects();
        match selected.as_slice() {
            [object] => object.as_image().and_then(|props| props.applied_filter()),
            _ => None,
        }
    }

    /// Shadow stack of the first selected text object
    pub fn active_text_shadow(&self) -> Option<Vec<Shadow>> {
        self.selected_objects()
            .iter()
            .find_map(|object| object.as_text())
            .map(|props| props.shadow.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // --- transient state (no history, no autosave) -----------------

    pub fn set_active_tool(&mut self, tool: ActiveTool) {
        if tool == self.active_tool {
            return;
        }
        let old = self.active_tool;
        self.active_tool = tool;
        self.event_bus.emit(EditorEvent::ToolChanged { old, new: tool });
    }

    /// Replace the selection wholesale; locked objects are excluded
    /// from the candidates
    pub fn select(&mut self, candidates: &[Uuid]) {
        let mut ctx = self.context();
        ctx.select(candidates.to_vec());
    }

    pub fn clear_selection(&mut self) {
        let mut ctx = self.context();
        ctx.clear_selection();
    }

    // --- mutation commands -----------------------------------------

    pub fn add_shape(&mut self, kind: ShapeKind, style: ShapeStyle) -> Result<Uuid, EditorError> {
        let id = Uuid::new_v4();
        self.apply(Command::AddShape { id, kind, style })?;
        Ok(id)
    }

    pub fn add_text(&mut self, content: &str) -> Result<Uuid, EditorError> {
        let id = Uuid::new_v4();
        self.apply(Command::AddText {
            id,
            content: content.to_string(),
        })?;
        Ok(id)
    }

    pub fn change_fill_color(&mut self, color: Color32) -> Result<(), EditorError> {
        self.apply(Command::ChangeFillColor { color })
    }

    pub fn change_stroke_color(&mut self, color: Color32) -> Result<(), EditorError> {
        self.apply(Command::ChangeStrokeColor { color })
    }

    pub fn change_stroke_width(&mut self, width: f32) -> Result<(), EditorError> {
        self.apply(Command::ChangeStrokeWidth { width })
    }

    pub fn change_opacity(&mut self, opacity: f32) -> Result<(), EditorError> {
        self.apply(Command::ChangeOpacity { opacity })
    }

    pub fn change_font_family(&mut self, family: &str) -> Result<(), EditorError> {
        self.apply(Command::ChangeFontFamily {
            family: family.to_string(),
        })
    }

    pub fn change_font_size(&mut self, size: f32) -> Result<(), EditorError> {
        self.apply(Command::ChangeFontSize { size })
    }

    pub fn change_text_align(&mut self, align: TextAlign) -> Result<(), EditorError> {
        self.apply(Command::ChangeTextAlign { align })
    }

    /// Apply a named filter to the single selected image; "none"
    /// clears filters
    pub fn change_image_filter(&mut self, filter: &str) -> Result<(), EditorError> {
        self.apply(Command::ChangeImageFilter {
            filter: filter.to_string(),
        })
    }

    /// Apply a predefined text effect by name ("None" clears)
    pub fn change_text_effect(&mut self, name: &str) -> Result<(), EditorError> {
        let shadows = text_effect(name)
            .ok_or_else(|| CommandError::UnknownEffect(name.to_string()))?;
        self.change_text_shadow(shadows)
    }

    /// Set the shadow stack uniformly across the selected text objects
    pub fn change_text_shadow(&mut self, shadows: Vec<Shadow>) -> Result<(), EditorError> {
        self.apply(Command::ChangeTextShadow { shadows })
    }

    /// Set the workspace fill; dimensions are untouched
    pub fn change_background(&mut self, color: Color32) -> Result<(), EditorError> {
        self.apply(Command::ChangeBackground {
            fill: Fill::solid(color),
        })
    }

    /// Resize the workspace. Non-positive dimensions are rejected
    /// without mutating state.
    pub fn change_size(&mut self, width: i32, height: i32) -> Result<(), EditorError> {
        self.apply(Command::ChangeSize { width, height })
    }

    pub fn bring_to_front(&mut self) -> Result<(), EditorError> {
        self.apply(Command::BringToFront)
    }

    pub fn bring_forward(&mut self) -> Result<(), EditorError> {
        self.apply(Command::BringForward)
    }

    pub fn send_backwards(&mut self) -> Result<(), EditorError> {
        self.apply(Command::SendBackwards)
    }

    pub fn send_to_back(&mut self) -> Result<(), EditorError> {
        self.apply(Command::SendToBack)
    }

    pub fn toggle_visibility(&mut self, id: Uuid) -> Result<(), EditorError> {
        self.apply(Command::ToggleVisibility { id })
    }

    pub fn toggle_lock(&mut self, id: Uuid) -> Result<(), EditorError> {
        self.apply(Command::ToggleLock { id })
    }

    pub fn rename(&mut self, id: Uuid, name: &str) -> Result<(), EditorError> {
        self.apply(Command::Rename {
            id,
            name: name.to_string(),
        })
    }

    /// Remove all selected objects and clear the selection
    pub fn delete_selected(&mut self) -> Result<(), EditorError> {
        self.apply(Command::DeleteSelected)
    }

    /// Snapshot the current selection for a later paste
    pub fn on_copy(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let objects: Vec<SceneObject> = self
            .selection
            .current()
            .iter()
            .filter_map(|id| self.scene.find(*id))
            .cloned()
            .collect();
        if !objects.is_empty() {
            info!("copied {} object(s)", objects.len());
            self.clipboard = Some(objects);
        }
    }

    /// Insert clones of the copied objects, offset from their source,
    /// and select them. Without a prior copy this is a no-op.
    pub fn on_paste(&mut self) -> Result<(), EditorError> {
        let Some(copied) = &self.clipboard else {
            return Ok(());
        };
        let clones: Vec<SceneObject> = copied.iter().map(SceneObject::clone_for_paste).collect();
        self.apply(Command::Paste { objects: clones })
    }

    // --- async entry points ----------------------------------------

    /// Insert an image once the external resource resolves. On failure
    /// the scene is left unchanged and a `TaskFailed` event is emitted.
    pub fn add_image(&mut self, url: &str) -> Result<(), EditorError> {
        if self.disposed {
            return Err(EditorError::Disposed);
        }
        let store = self
            .asset_store
            .clone()
            .ok_or(EditorError::MissingCollaborator("asset store"))?;
        let src = url.to_string();
        let fetch = store.fetch(url);
        info!("loading image {url}");
        self.tasks.spawn(
            async move {
                let bytes = fetch.await?;
                decode_image(&bytes).map_err(AssetError::Decode)
            },
            move |editor, result: Result<PixelData, AssetError>| match result {
                Ok(pixels) => {
                    if let Err(err) = editor.insert_loaded_image(&src, pixels) {
                        editor.report_task_failure("image insert", &err.to_string());
                    }
                }
                Err(err) => editor.report_task_failure("image load", &err.to_string()),
            },
        );
        Ok(())
    }

    /// Upload image bytes to the asset store, then insert the
    /// resulting asset
    pub fn upload_image(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), EditorError> {
        if self.disposed {
            return Err(EditorError::Disposed);
        }
        let store = self
            .asset_store
            .clone()
            .ok_or(EditorError::MissingCollaborator("asset store"))?;
        let name = name.to_string();
        info!("uploading image {name} ({} bytes)", bytes.len());
        self.tasks.spawn(
            async move {
                let pixels = decode_image(&bytes).map_err(AssetError::Decode)?;
                let url = store.upload(&name, bytes).await?;
                Ok((url, pixels))
            },
            |editor, result: Result<(String, PixelData), AssetError>| match result {
                Ok((url, pixels)) => {
                    if let Err(err) = editor.insert_loaded_image(&url, pixels) {
                        editor.report_task_failure("image insert", &err.to_string());
                    }
                }
                Err(err) => editor.report_task_failure("image upload", &err.to_string()),
            },
        );
        Ok(())
    }

    /// Run background removal on the single selected image. The
    /// processed output is inserted as a new image object, matching
    /// the sidebar flow.
    pub fn remove_background(&mut self) -> Result<(), EditorError> {
        if self.disposed {
            return Err(EditorError::Disposed);
        }
        let service = self
            .background_removal
            .clone()
            .ok_or(EditorError::MissingCollaborator("background removal"))?;
        let selected = self.selected_objects();
        let src = match selected.as_slice() {
            [object] => object
                .as_image()
                .map(|props| props.src.clone())
                .ok_or(CommandError::IneligibleSelection(
                    "background removal requires an image",
                ))?,
            _ => {
                return Err(CommandError::IneligibleSelection(
                    "background removal requires exactly one selected image",
                )
                .into());
            }
        };
        info!("removing background of {src}");
        let process = service.remove_background(&src);
        self.tasks.spawn(
            async move {
                let bytes = process.await?;
                decode_image(&bytes)
            },
            |editor, result: Result<PixelData, String>| match result {
                Ok(pixels) => {
                    let src = format!("bg-removed://{}", Uuid::new_v4());
                    if let Err(err) = editor.insert_loaded_image(&src, pixels) {
                        editor.report_task_failure("image insert", &err.to_string());
                    }
                }
                Err(err) => editor.report_task_failure("background removal", &err),
            },
        );
        Ok(())
    }

    // --- history ---------------------------------------------------

    /// Restore the previous snapshot. Returns false at the start of
    /// history.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        if self.disposed {
            return Err(EditorError::Disposed);
        }
        let json = match self.history.undo() {
            Some(snapshot) => snapshot.json.clone(),
            None => return Ok(false),
        };
        self.restore(&json)?;
        Ok(true)
    }

    /// Restore the next snapshot. Returns false at the end of history.
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        if self.disposed {
            return Err(EditorError::Disposed);
        }
        let json = match self.history.redo() {
            Some(snapshot) => snapshot.json.clone(),
            None => return Ok(false),
        };
        self.restore(&json)?;
        Ok(true)
    }

    // --- persistence and export ------------------------------------

    /// Drive async completions and due autosaves. Call regularly from
    /// the UI loop.
    pub fn pump(&mut self) {
        self.pump_at(Instant::now());
    }

    pub fn pump_at(&mut self, now: Instant) {
        for completion in self.tasks.drain() {
            completion(self);
        }
        if self.disposed {
            return;
        }
        if let Some(payload) = self.autosave.poll(now) {
            self.dispatch_save(payload);
        }
    }

    /// Persist immediately, bypassing the debounce
    pub fn save_now(&mut self) -> Result<(), EditorError> {
        if self.disposed {
            return Err(EditorError::Disposed);
        }
        let snapshot = serializer::snapshot(&self.scene)?;
        self.autosave.cancel();
        self.dispatch_save(SavePayload {
            json: snapshot.json,
            width: snapshot.width,
            height: snapshot.height,
        });
        Ok(())
    }

    pub fn export_png(&self) -> Result<Vec<u8>, EditorError> {
        Ok(export::export_png(&self.scene)?)
    }

    pub fn export_jpeg(&self) -> Result<Vec<u8>, EditorError> {
        Ok(export::export_jpeg(&self.scene)?)
    }

    pub fn serialize(&self) -> Result<String, EditorError> {
        Ok(serializer::serialize_scene(&self.scene)?)
    }

    /// Tear down the session. In-flight async work is released and its
    /// completion handlers will never run.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.autosave.cancel();
        self.tasks.dispose();
        info!("editor session disposed for project {:?}", self.project_id);
    }

    // --- internals -------------------------------------------------

    fn context(&mut self) -> CommandContext<'_> {
        CommandContext {
            scene: &mut self.scene,
            selection: &mut self.selection,
            events: &self.event_bus,
            active_tool: &mut self.active_tool,
        }
    }

    fn apply(&mut self, command: Command) -> Result<(), EditorError> {
        if self.disposed {
            return Err(EditorError::Disposed);
        }
        let mut ctx = self.context();
        command.execute(&mut ctx)?;
        self.commit()
    }

    /// Record the committed mutation: history push, then autosave mark.
    /// Commands that left the document unchanged (a reorder clamped at
    /// a boundary) push nothing.
    fn commit(&mut self) -> Result<(), EditorError> {
        let snapshot = serializer::snapshot(&self.scene)?;
        if self.history.current().json == snapshot.json {
            return Ok(());
        }
        self.history.push(snapshot);
        self.mark_autosave();
        Ok(())
    }

    fn mark_autosave(&mut self) {
        let current = self.history.current();
        let payload = SavePayload {
            json: current.json.clone(),
            width: current.width,
            height: current.height,
        };
        self.autosave.mark(payload, Instant::now());
    }

    /// Swap in a snapshot's scene without pushing history. Decode
    /// caches are transplanted from the outgoing scene so images stay
    /// exportable across undo and redo.
    fn restore(&mut self, json: &str) -> Result<(), EditorError> {
        let restored = serializer::deserialize_scene(json)?;
        harvest_pixel_caches(self.scene.objects(), &mut self.pixel_caches);
        self.scene = restored;
        reattach_pixel_caches(self.scene.objects_mut(), &self.pixel_caches);
        self.selection.retain_existing(&self.scene);
        if self.selection.is_empty() && self.active_tool.is_selection_dependent() {
            let old = self.active_tool;
            self.active_tool = ActiveTool::Select;
            self.event_bus.emit(EditorEvent::ToolChanged {
                old,
                new: ActiveTool::Select,
            });
        }
        self.event_bus.emit(EditorEvent::HistoryRestored);
        self.mark_autosave();
        Ok(())
    }

    fn insert_loaded_image(&mut self, src: &str, pixels: PixelData) -> Result<Uuid, EditorError> {
        let size = fit_to_workspace(self.scene.workspace(), pixels.width, pixels.height);
        self.pixel_caches.insert(src.to_string(), pixels.clone());
        let id = Uuid::new_v4();
        self.apply(Command::InsertImage {
            id,
            src: src.to_string(),
            pixels: Some(pixels),
            size,
        })?;
        info!("inserted image {src}");
        Ok(id)
    }

    fn report_task_failure(&mut self, what: &str, message: &str) {
        error!("{what} failed: {message}");
        self.event_bus.emit(EditorEvent::TaskFailed {
            message: message.to_string(),
        });
    }

    fn dispatch_save(&mut self, payload: SavePayload) {
        let Some(store) = self.project_store.clone() else {
            warn!("no project store configured; dropping save");
            return;
        };
        let project_id = self.project_id.clone();
        info!("saving project {project_id:?}");
        let future = store.save(
            &project_id,
            ProjectData {
                json: payload.json,
                width: payload.width,
                height: payload.height,
            },
        );
        self.tasks.spawn(future, |editor, result: Result<(), _>| match result {
            Ok(()) => {
                editor.event_bus.emit(EditorEvent::DocumentSaved { ok: true });
            }
            Err(err) => {
                // Changes may not be saved; editing continues and the
                // next committed mutation schedules another attempt.
                warn!("save failed: {err}");
                editor.event_bus.emit(EditorEvent::DocumentSaved { ok: false });
            }
        });
    }
}

/// Decode encoded image bytes into an RGBA pixel cache
fn decode_image(bytes: &[u8]) -> Result<PixelData, String> {
    let decoded = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelData {
        rgba: Arc::new(rgba.into_raw()),
        width,
        height,
    })
}

/// Collect the decode caches present in a scene, recursing into groups
fn harvest_pixel_caches(objects: &[SceneObject], caches: &mut HashMap<String, PixelData>) {
    for object in objects {
        match &object.kind {
            ObjectKind::Image(props) => {
                if let Some(pixels) = &props.pixels {
                    caches.insert(props.src.clone(), pixels.clone());
                }
            }
            ObjectKind::Group { children } => harvest_pixel_caches(children, caches),
            _ => {}
        }
    }
}

/// Reattach decode caches to a freshly deserialized scene by source
fn reattach_pixel_caches(objects: &mut [SceneObject], caches: &HashMap<String, PixelData>) {
    for object in objects {
        match &mut object.kind {
            ObjectKind::Image(props) => {
                if props.pixels.is_none() {
                    props.pixels = caches.get(&props.src).cloned();
                }
            }
            ObjectKind::Group { children } => reattach_pixel_caches(children, caches),
            _ => {}
        }
    }
}

/// Scale an image down to fit the workspace, keeping aspect ratio;
/// smaller images keep their natural size
fn fit_to_workspace(workspace: &Workspace, width: u32, height: u32) -> Vec2 {
    let natural = Vec2::new(width as f32, height as f32);
    let max = Vec2::new(workspace.width as f32, workspace.height as f32);
    let scale = (max.x / natural.x).min(max.y / natural.y).min(1.0);
    natural * scale
}
