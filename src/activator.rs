//! Click-to-navigate behaviour on diagram nodes.
//!
//! Each labelled node opens its package page on click, or on a touch
//! sequence that stays a tap (see [`TapCandidate`]). Activated nodes carry
//! [`ACTIVATED_ATTRIBUTE`], so rescans from any context skip them while fresh
//! nodes from a re-render get their own handlers.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, TouchEvent};

use crate::config::PanZoomConfig;
use crate::state::{Point, TapCandidate, first_label};
use crate::util;

/// Marks a node whose navigation handlers are installed.
pub const ACTIVATED_ATTRIBUTE: &str = "data-panzoom-node";

/// Navigation target for a node identifier.
pub fn package_url(base: &str, label: &str) -> String {
    let encoded = String::from(js_sys::encode_uri_component(label));
    format!("{base}{encoded}")
}

/// Label of a node, trying each selector in order.
pub fn extract_label(node: &Element, selectors: &[String]) -> Option<String> {
    first_label(selectors.iter().map(|selector| {
        node.query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.text_content())
    }))
}

fn open_in_new_context(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.open_with_url_and_target(url, "_blank") {
        log::warn!("failed to open {url}: {e:?}");
    }
}

fn first_touch(event: &Event) -> Option<Point> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().item(0)?;
    Some(Point::new(touch.client_x() as f64, touch.client_y() as f64))
}

pub struct NodeActivator<'a> {
    config: &'a PanZoomConfig,
}

impl<'a> NodeActivator<'a> {
    pub fn new(config: &'a PanZoomConfig) -> Self {
        Self { config }
    }

    pub fn is_activated(node: &Element) -> bool {
        node.has_attribute(ACTIVATED_ATTRIBUTE)
    }

    /// Activates every not-yet-activated labelled node under `graphic`.
    /// Returns how many nodes were newly activated.
    pub fn activate_all(&self, graphic: &Element) -> usize {
        let nodes = match graphic.query_selector_all(&self.config.node_selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                log::warn!("node query failed: {e:?}");
                return 0;
            }
        };
        let mut count = 0;
        for i in 0..nodes.length() {
            let Some(node) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if Self::is_activated(&node) {
                continue;
            }
            let Some(label) = extract_label(&node, &self.config.label_selectors) else {
                continue;
            };
            match self
                .activate(&node, &label)
                .and_then(|()| node.set_attribute(ACTIVATED_ATTRIBUTE, ""))
            {
                Ok(()) => count += 1,
                Err(e) => log::warn!("failed to activate node {label:?}: {e:?}"),
            }
        }
        count
    }

    fn activate(&self, node: &Element, label: &str) -> Result<(), JsValue> {
        let url = Rc::new(package_url(&self.config.package_base_url, label));
        util::set_styles(node, &[("cursor", "pointer")])?;

        let target = url.clone();
        util::listen(node, "click", false, move |e: Event| {
            e.stop_propagation();
            e.prevent_default();
            open_in_new_context(&target);
        })?;

        let tap = Rc::new(RefCell::new(TapCandidate::default()));
        let thresholds = self.config.tap_thresholds();

        let tap_start = tap.clone();
        util::listen(node, "touchstart", true, move |e: Event| {
            if let Some(at) = first_touch(&e) {
                tap_start.borrow_mut().begin(util::now_ms(), at);
            }
        })?;

        let tap_move = tap.clone();
        util::listen(node, "touchmove", true, move |e: Event| {
            if let Some(at) = first_touch(&e) {
                tap_move.borrow_mut().track(at, &thresholds);
            }
        })?;

        let target = url;
        util::listen(node, "touchend", false, move |e: Event| {
            if tap.borrow_mut().finish(util::now_ms(), &thresholds) {
                e.stop_propagation();
                e.prevent_default();
                open_in_new_context(&target);
            }
        })?;

        let dimmed = self.config.hover_opacity.to_string();
        util::listen(node, "mouseenter", true, move |e: Event| {
            if let (true, Some(el)) = (util::hover_capable(), util::current_element(&e)) {
                util::warn_on_err("hover", util::set_styles(&el, &[("opacity", dimmed.as_str())]));
            }
        })?;
        util::listen(node, "mouseleave", true, |e: Event| {
            if let (true, Some(el)) = (util::hover_capable(), util::current_element(&e)) {
                util::warn_on_err("hover", util::set_styles(&el, &[("opacity", "1")]));
            }
        })?;

        Ok(())
    }
}
