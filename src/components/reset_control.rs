use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};
use yew::AppHandle;
use yew::prelude::*;

use crate::util;

pub const RESET_LABEL: &str = "Reset zoom and pan";

/// Inline style of the host element the control is mounted into.
pub const HOST_STYLE: &str = "position:absolute; top:8px; right:8px; z-index:10;";

#[derive(Properties, PartialEq, Clone)]
pub struct ResetControlProps {
    /// Root-element class that signals dark mode; re-read on every render.
    pub dark_class: AttrValue,
    /// Receives the control's button element.
    pub on_reset: Callback<Element>,
}

pub fn button_style(dark: bool, hovered: bool) -> String {
    let background = match (dark, hovered) {
        (true, true) => "rgba(50, 50, 50, 0.95)",
        (true, false) => "rgba(40, 40, 40, 0.8)",
        (false, true) => "rgba(255, 255, 255, 0.95)",
        (false, false) => "rgba(255, 255, 255, 0.8)",
    };
    let (border, color) = if dark {
        ("rgba(255, 255, 255, 0.1)", "#fff")
    } else {
        ("rgba(0, 0, 0, 0.1)", "inherit")
    };
    let (opacity, shadow, scale) = if hovered {
        ("1", "0 2px 6px rgba(0,0,0,0.2)", "1.05")
    } else {
        ("0.6", "0 1px 3px rgba(0,0,0,0.1)", "1")
    };
    format!(
        "padding:6px; background:{background}; border:1px solid {border}; color:{color}; \
         border-radius:6px; cursor:pointer; display:flex; align-items:center; \
         justify-content:center; transition:all 0.2s; width:28px; height:28px; \
         opacity:{opacity}; box-shadow:{shadow}; transform:scale({scale});"
    )
}

#[function_component(ResetControl)]
pub fn reset_control(props: &ResetControlProps) -> Html {
    let hovered = use_state(|| false);
    let dark = util::is_dark_mode(&props.dark_class);

    let onmouseover = {
        let hovered = hovered.clone();
        Callback::from(move |_| hovered.set(true))
    };
    let onmouseout = {
        let hovered = hovered.clone();
        Callback::from(move |_| hovered.set(false))
    };
    let onclick = {
        let cb = props.on_reset.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            if let Some(button) = e.current_target().and_then(|t| t.dyn_into::<Element>().ok()) {
                cb.emit(button);
            }
        })
    };

    html! {
        <button type="button" title={RESET_LABEL} aria-label={RESET_LABEL}
            style={button_style(dark, *hovered)} {onclick} {onmouseover} {onmouseout}>
            <svg width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.5">
                <path d="M3 12a9 9 0 0 1 9-9 9.75 9.75 0 0 1 6.74 2.74L21 8" />
                <path d="M21 3v5h-5" />
                <path d="M21 12a9 9 0 0 1-9 9 9.75 9.75 0 0 1-6.74-2.74L3 16" />
                <path d="M3 21v-5h5" />
            </svg>
        </button>
    }
}

/// Renders the control into `host`, which the caller has already placed in the
/// container. The handle must be destroyed once the host is gone.
pub fn mount(host: Element, props: ResetControlProps) -> AppHandle<ResetControl> {
    yew::Renderer::<ResetControl>::with_root_and_props(host, props).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_control_is_translucent() {
        let style = button_style(false, false);
        assert!(style.contains("opacity:0.6;"));
        assert!(style.contains("background:rgba(255, 255, 255, 0.8);"));
        assert!(style.contains("transform:scale(1);"));
    }

    #[test]
    fn hovered_dark_control_is_opaque_and_lifted() {
        let style = button_style(true, true);
        assert!(style.contains("opacity:1;"));
        assert!(style.contains("background:rgba(50, 50, 50, 0.95);"));
        assert!(style.contains("color:#fff;"));
        assert!(style.contains("transform:scale(1.05);"));
    }
}
