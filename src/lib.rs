//! Pan/zoom and click-to-navigate for rendered Mermaid diagrams.
//!
//! Loaded as a WebAssembly module by the documentation site. On start it
//! waits for the page and the diagram renderer to settle, then gives every
//! diagram container a [`controller::TransformController`], a reset control
//! and clickable nodes, and keeps doing so as diagrams re-render or the
//! theme changes.

pub mod activator;
pub mod components;
pub mod config;
pub mod controller;
pub mod state;
pub mod supervisor;
pub mod timer;
pub mod util;

use std::rc::Rc;

use log::LevelFilter;
use wasm_bindgen::prelude::*;

use crate::config::PanZoomConfig;
use crate::supervisor::AttachmentContext;

#[wasm_bindgen(start)]
pub fn start() {
    util::install_panic_hook();
    util::init_logging(LevelFilter::Warn);
    let Some(document) = util::document() else {
        return;
    };
    let config = PanZoomConfig::from_document(&document);
    util::init_logging(config.log_level);
    if !config.auto_start {
        log::debug!("auto start disabled");
        return;
    }
    log::info!("attaching to {}", config.container_selector);
    AttachmentContext::new(config).boot();
}

/// Handle for pages that drive attachment themselves, e.g. to rescan as soon
/// as their renderer reports completion instead of relying on the settle delay.
#[wasm_bindgen]
pub struct MermaidPanZoom {
    ctx: Rc<AttachmentContext>,
}

#[wasm_bindgen]
impl MermaidPanZoom {
    /// `options` is a JSON object overriding any subset of the defaults. With
    /// `auto_start` (the default) the handle boots right away and `boot()` is
    /// then a no-op. Graphics and nodes already wired by another context are
    /// left alone.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<MermaidPanZoom, JsValue> {
        let config = match options {
            Some(raw) => {
                PanZoomConfig::from_json(&raw).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => PanZoomConfig::default(),
        };
        util::init_logging(config.log_level);
        let auto_start = config.auto_start;
        let ctx = AttachmentContext::new(config);
        if auto_start {
            ctx.boot();
        }
        Ok(Self { ctx })
    }

    /// Timed start: document ready, settle delay, first pass, then observe.
    pub fn boot(&self) {
        self.ctx.boot();
    }

    /// Runs a discovery pass now. Returns the number of containers seen.
    pub fn rescan(&self) -> usize {
        self.ctx.scan().containers
    }
}
