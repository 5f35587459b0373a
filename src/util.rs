// Browser helpers shared by the controller, activator and supervisor
use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, CssStyleDeclaration, Document, Element, Event, EventTarget,
    HtmlElement, SvgElement,
};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[mermaid-panzoom] {}", record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

/// Routes `log` records to the browser console. Later calls only adjust the level.
pub fn init_logging(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

pub fn install_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("mermaid-panzoom panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

/// Milliseconds since the epoch, as the browser clock reports it.
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn is_dark_mode(dark_class: &str) -> bool {
    document()
        .and_then(|d| d.document_element())
        .map(|root| root.class_list().contains(dark_class))
        .unwrap_or(false)
}

/// Touch-only devices report `(hover: none)`; everything else can hover.
pub fn hover_capable() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(hover: none)").ok().flatten())
        .map(|query| !query.matches())
        .unwrap_or(false)
}

/// Inline style of an HTML or SVG element.
pub fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(el) = element.dyn_ref::<HtmlElement>() {
        Some(el.style())
    } else {
        element.dyn_ref::<SvgElement>().map(|el| el.style())
    }
}

pub fn set_styles(element: &Element, props: &[(&str, &str)]) -> Result<(), JsValue> {
    let Some(style) = style_of(element) else {
        return Ok(());
    };
    for (name, value) in props {
        style.set_property(name, value)?;
    }
    Ok(())
}

/// Registers `handler` on `target` and hands the closure to the JS side, so it
/// lives exactly as long as the target keeps the listener.
///
/// Handlers must not capture `target` itself; use `Event::current_target`.
pub fn listen<F>(target: &EventTarget, event: &str, passive: bool, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    add_listener(target, event, &options, handler)
}

/// Passive capture-phase listener. It runs before any descendant's handler,
/// so a descendant stopping propagation cannot hide the event from it.
pub fn listen_capture<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    options.set_capture(true);
    add_listener(target, event, &options, handler)
}

fn add_listener<F>(
    target: &EventTarget,
    event: &str,
    options: &AddEventListenerOptions,
    handler: F,
) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>).into_js_value();
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.unchecked_ref(),
        options,
    )
}

pub fn current_element(event: &Event) -> Option<Element> {
    event.current_target()?.dyn_into::<Element>().ok()
}

/// Logs a failed DOM step instead of surfacing it to the page.
pub fn warn_on_err(context: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("{context}: {e:?}");
    }
}
