//! umlboard - a headless UML class-diagram editing engine
//!
//! This library provides the diagram state model, pointer interaction state
//! machine, import-time auto-layout, SVG rendering and the XMI 2.1 codec
//! behind a class-diagram editor. It owns no window and no event loop: an
//! embedder feeds pointer/wheel events in screen coordinates and pumps
//! coalesced renders back out.
//!
//! # Example
//!
//! ```rust
//! use umlboard::Editor;
//!
//! let mut editor = Editor::seeded();
//! let xml = editor.export_xmi();
//! assert!(xml.contains("uml:Model"));
//!
//! let svg = editor.pump().expect("seeding leaves a render pending");
//! assert!(svg.contains("<svg"));
//! ```

pub mod config;
pub mod generate;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod view;
pub mod xmi;
pub mod xml;

pub use config::{ConfigError, EditorConfig};
pub use generate::{GenerateClient, GenerateError, GeneratedArchive};
pub use geometry::{Point, Rect};
pub use interaction::{InteractionEngine, LinkService, PointerEvent, WheelEvent};
pub use layout::{arrange, LayoutConfig};
pub use model::{Diagram, EditorState, EntityKind, RelationKind};
pub use render::render_svg;
pub use scheduler::RenderScheduler;
pub use view::ViewTransform;
pub use xmi::{export_xmi, import_xmi, XmiError};

/// One editing session: state, configuration, the interaction engine and
/// the render scheduler, wired together.
#[derive(Debug)]
pub struct Editor {
    pub state: EditorState,
    pub config: EditorConfig,
    engine: InteractionEngine,
    scheduler: RenderScheduler,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            state: EditorState::new(),
            config,
            engine: InteractionEngine::new(),
            scheduler: RenderScheduler::new(),
        }
    }

    /// A session pre-populated with one package and two unpackaged classes,
    /// the package selected.
    pub fn seeded() -> Self {
        let mut editor = Self::new();
        let package_id = editor.state.diagram.add_package(80.0, 80.0, None).id.clone();
        editor.state.diagram.add_class(140.0, 160.0);
        editor.state.diagram.add_class(380.0, 240.0);
        editor
            .state
            .diagram
            .set_selected(EntityKind::Package, &package_id);
        editor.scheduler.request();
        editor
    }

    pub fn pointer_down(&mut self, event: PointerEvent) {
        self.engine
            .pointer_down(&mut self.state, &mut self.scheduler, event);
    }

    pub fn pointer_move(&mut self, event: PointerEvent) {
        self.engine
            .pointer_move(&mut self.state, &self.config, &mut self.scheduler, event);
    }

    pub fn pointer_up(&mut self, event: PointerEvent) {
        self.engine
            .pointer_up(&mut self.state, &mut self.scheduler, event);
    }

    pub fn wheel(&mut self, event: WheelEvent) {
        self.engine.wheel(&mut self.state, &mut self.scheduler, event);
    }

    pub fn toggle_link_mode(&mut self, kind: RelationKind) {
        LinkService::toggle(&mut self.state, kind);
        self.scheduler.request();
    }

    pub fn cancel_link(&mut self) {
        LinkService::cancel(&mut self.state);
        self.scheduler.request();
    }

    /// Replace the session's diagram with an imported document, auto-laid
    /// out and ready to render.
    pub fn import_xmi(&mut self, xml: &str) -> Result<(), XmiError> {
        let mut diagram = import_xmi(xml)?;
        arrange(&mut diagram, &LayoutConfig::default());
        self.state.diagram = diagram;
        self.state.interaction = None;
        LinkService::cancel(&mut self.state);
        self.scheduler.request();
        Ok(())
    }

    pub fn export_xmi(&self) -> String {
        export_xmi(&self.state.diagram, &self.config.model_name)
    }

    /// Render unconditionally, without consuming the dirty flag.
    pub fn render(&self) -> String {
        render_svg(&self.state, self.config.grid_step())
    }

    /// Produce the coalesced render if one is due. Any number of mutations
    /// since the last pump yield at most one document.
    pub fn pump(&mut self) -> Option<String> {
        self.scheduler.take().then(|| self.render())
    }

    pub fn request_render(&mut self) {
        self.scheduler.request();
    }
}
