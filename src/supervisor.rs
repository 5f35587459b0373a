//! Discovery of diagram containers and the rescan loop.
//!
//! [`AttachmentContext`] is created once per page and holds the debounce
//! timer, the mutation observer and the mounted reset controls. Graphics that
//! carry a controller are marked with [`BOUND_ATTRIBUTE`] (nodes with
//! [`ACTIVATED_ATTRIBUTE`](crate::activator::ACTIVATED_ATTRIBUTE)), so the
//! markers live and die with the elements and any second context sees them.
//! Every pass is idempotent; running it on an unchanged document binds and
//! inserts nothing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, Event, MutationObserver, MutationObserverInit, Node,
};
use yew::{AppHandle, Callback};

use crate::activator::NodeActivator;
use crate::components::reset_control::{self, HOST_STYLE, ResetControl, ResetControlProps};
use crate::config::PanZoomConfig;
use crate::controller::{RESET_EVENT, TransformController};
use crate::timer::Debouncer;
use crate::util;

const RESCAN_KEY: &str = "rescan";

/// Marks a graphic that already has a [`TransformController`].
pub const BOUND_ATTRIBUTE: &str = "data-panzoom-bound";

/// Outcome of one discovery pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub containers: usize,
    /// Graphics that received a controller in this pass.
    pub bound: usize,
    /// Nodes made clickable in this pass.
    pub activated: usize,
}

/// A reset control's yew app and the element it renders into.
struct MountedControl {
    host: Element,
    app: AppHandle<ResetControl>,
}

pub struct AttachmentContext {
    config: PanZoomConfig,
    booted: Cell<bool>,
    debouncer: RefCell<Debouncer>,
    observer: RefCell<Option<MutationObserver>>,
    controls: RefCell<Vec<MountedControl>>,
}

impl AttachmentContext {
    pub fn new(config: PanZoomConfig) -> Rc<Self> {
        Rc::new(Self {
            config,
            booted: Cell::new(false),
            debouncer: RefCell::new(Debouncer::default()),
            observer: RefCell::new(None),
            controls: RefCell::new(Vec::new()),
        })
    }

    pub fn is_bound(graphic: &Element) -> bool {
        graphic.has_attribute(BOUND_ATTRIBUTE)
    }

    /// Reset controls this context has mounted and not yet torn down.
    pub fn mounted_controls(&self) -> usize {
        self.controls.borrow().len()
    }

    /// Waits for the document to be parsed plus the settle delay, then runs
    /// the first pass. The renderer gives no completion signal, so a diagram
    /// that renders later is picked up by the mutation-triggered rescan.
    /// Only the first call does anything.
    pub fn boot(self: &Rc<Self>) {
        if self.booted.replace(true) {
            return;
        }
        let Some(document) = util::document() else {
            log::warn!("no document; nothing to attach");
            return;
        };
        if document.ready_state() == "loading" {
            let ctx = self.clone();
            util::warn_on_err(
                "ready listener",
                util::listen(&document, "DOMContentLoaded", true, move |_e: Event| ctx.settle()),
            );
        } else {
            self.settle();
        }
    }

    fn settle(self: &Rc<Self>) {
        let ctx = self.clone();
        let _ = Timeout::new(self.config.settle_delay_ms, move || {
            ctx.scan();
        })
        .forget();
    }

    /// Debounced rescan; a newer request replaces a pending one.
    pub fn schedule_rescan(self: &Rc<Self>) {
        let ctx = self.clone();
        self.debouncer
            .borrow_mut()
            .schedule(RESCAN_KEY, self.config.debounce_ms, move || {
                ctx.scan();
            });
    }

    /// Full discovery and activation pass over the current document.
    pub fn scan(self: &Rc<Self>) -> ScanReport {
        let mut report = ScanReport::default();
        let Some(document) = util::document() else {
            return report;
        };
        let containers = match document.query_selector_all(&self.config.container_selector) {
            Ok(found) => found,
            Err(e) => {
                log::warn!("container query failed: {e:?}");
                return report;
            }
        };
        let released = self.release_detached_controls();
        if released > 0 {
            log::debug!("released {released} detached reset controls");
        }
        let dark = util::is_dark_mode(&self.config.dark_class);
        let activator = NodeActivator::new(&self.config);

        for i in 0..containers.length() {
            let Some(container) = containers.item(i).and_then(|n| n.dyn_into::<Element>().ok())
            else {
                continue;
            };
            report.containers += 1;
            self.observe(&container, false);

            let Some(graphic) = container
                .query_selector(&self.config.graphic_selector)
                .ok()
                .flatten()
            else {
                continue;
            };
            if !Self::is_bound(&graphic) {
                match self.bind(&container, &graphic) {
                    Ok(()) => report.bound += 1,
                    Err(e) => log::warn!("failed to bind graphic: {e:?}"),
                }
            }
            if self.has_reset_control(&container) {
                util::warn_on_err("container theme", self.apply_theme(&container, dark));
            }
            report.activated += activator.activate_all(&graphic);
        }

        if let Some(root) = document.document_element() {
            self.observe(&root, true);
        }
        log::debug!(
            "scan: {} containers, {} bound, {} nodes activated",
            report.containers,
            report.bound,
            report.activated
        );
        report
    }

    fn bind(&self, container: &Element, graphic: &Element) -> Result<(), JsValue> {
        // marked first so a partial attach is never repeated
        graphic.set_attribute(BOUND_ATTRIBUTE, "")?;
        TransformController::new(self.config.zoom_limits()).attach(graphic)?;
        self.ensure_reset_control(container)?;
        Ok(())
    }

    pub fn has_reset_control(&self, container: &Element) -> bool {
        container
            .query_selector(&format!(".{}", self.config.reset_class))
            .ok()
            .flatten()
            .is_some()
    }

    /// Inserts the reset control and sets up the container, unless a
    /// control is already there. Returns whether one was inserted.
    pub fn ensure_reset_control(&self, container: &Element) -> Result<bool, JsValue> {
        if self.has_reset_control(container) {
            return Ok(false);
        }
        let Some(document) = container.owner_document() else {
            return Ok(false);
        };
        self.prepare_container(container)?;

        let host = document.create_element("div")?;
        host.set_class_name(&self.config.reset_class);
        host.set_attribute("style", HOST_STYLE)?;
        container.append_child(&host)?;

        let container_selector = self.config.container_selector.clone();
        let graphic_selector = self.config.graphic_selector.clone();
        let on_reset = Callback::from(move |button: Element| {
            util::warn_on_err(
                "reset",
                request_reset(&button, &container_selector, &graphic_selector),
            );
        });
        let app = reset_control::mount(
            host.clone(),
            ResetControlProps {
                dark_class: self.config.dark_class.clone().into(),
                on_reset,
            },
        );
        self.controls.borrow_mut().push(MountedControl { host, app });
        Ok(true)
    }

    /// Destroys the yew apps whose host has left the document, e.g. when the
    /// renderer rebuilt the container. Returns how many were released.
    fn release_detached_controls(&self) -> usize {
        let detached: Vec<MountedControl> = {
            let mut controls = self.controls.borrow_mut();
            let (live, detached): (Vec<_>, Vec<_>) =
                controls.drain(..).partition(|c| c.host.is_connected());
            *controls = live;
            detached
        };
        let released = detached.len();
        for control in detached {
            control.app.destroy();
        }
        released
    }

    fn prepare_container(&self, container: &Element) -> Result<(), JsValue> {
        let position = web_sys::window()
            .and_then(|w| w.get_computed_style(container).ok().flatten())
            .and_then(|style| style.get_property_value("position").ok());
        if position.as_deref() == Some("static") {
            util::set_styles(container, &[("position", "relative")])?;
        }
        util::set_styles(
            container,
            &[
                ("overflow", "hidden"),
                ("min-height", self.config.container_min_height.as_str()),
                ("border", "1px solid"),
                ("border-radius", "8px"),
                ("padding", "1rem"),
            ],
        )?;
        self.apply_theme(container, util::is_dark_mode(&self.config.dark_class))
    }

    fn apply_theme(&self, container: &Element, dark: bool) -> Result<(), JsValue> {
        let (border, background) = if dark {
            ("#333", "#1a1a1a")
        } else {
            ("#e5e7eb", "#fafafa")
        };
        util::set_styles(
            container,
            &[("border-color", border), ("background", background)],
        )
    }

    fn observer(self: &Rc<Self>) -> Option<MutationObserver> {
        if let Some(observer) = self.observer.borrow().as_ref() {
            return Some(observer.clone());
        }
        // holds the context for the rest of the page's life
        let ctx = self.clone();
        let callback = Closure::wrap(Box::new(move |_records: Array, _observer: MutationObserver| {
            ctx.schedule_rescan();
        }) as Box<dyn FnMut(Array, MutationObserver)>);
        let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(e) => {
                log::warn!("mutation observer unavailable: {e:?}");
                return None;
            }
        };
        callback.forget();
        *self.observer.borrow_mut() = Some(observer.clone());
        Some(observer)
    }

    /// Watches a container's subtree, or the root element's `class` attribute.
    /// Observing a node again only refreshes its options.
    fn observe(self: &Rc<Self>, target: &Node, root: bool) {
        let Some(observer) = self.observer() else {
            return;
        };
        let init = MutationObserverInit::new();
        if root {
            let filter = Array::of1(&JsValue::from_str("class"));
            init.set_attributes(true);
            init.set_attribute_filter(&filter);
        } else {
            init.set_child_list(true);
            init.set_subtree(true);
        }
        util::warn_on_err(
            "observe",
            observer.observe_with_options(target, &init),
        );
    }
}

/// Resets whichever graphic currently sits in the control's container.
fn request_reset(
    control: &Element,
    container_selector: &str,
    graphic_selector: &str,
) -> Result<(), JsValue> {
    let Some(container) = control.closest(container_selector)? else {
        return Ok(());
    };
    let Some(graphic) = container.query_selector(graphic_selector)? else {
        return Ok(());
    };
    graphic.dispatch_event(&Event::new(RESET_EVENT)?)?;
    Ok(())
}
