use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event};

#[derive(Clone, Debug)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
    pub once: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false, once: false }
    }
}

/// Window listener that unsubscribes on `remove` or drop
pub struct WindowEventListenerHandle {
    event_name: String,
    callback: Option<Closure<dyn FnMut(Event)>>,
    capture: bool,
}

impl WindowEventListenerHandle {
    pub fn remove(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback_and_bool(
                &self.event_name,
                callback.as_ref().unchecked_ref(),
                self.capture,
            );
        }
    }
}

impl Drop for WindowEventListenerHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

pub fn window_event_listener_with_options(
    event_name: &str,
    options: &EventOptions,
    mut cb: impl FnMut(Event) + 'static,
) -> Result<WindowEventListenerHandle, wasm_bindgen::JsValue> {
    let opts = AddEventListenerOptions::new();
    opts.set_passive(options.passive);
    opts.set_capture(options.capture);
    opts.set_once(options.once);

    let callback = Closure::wrap(Box::new(move |ev: Event| cb(ev)) as Box<dyn FnMut(Event)>);

    let window = web_sys::window().ok_or_else(|| wasm_bindgen::JsValue::from_str("no window"))?;
    window.add_event_listener_with_callback_and_add_event_listener_options(
        event_name,
        callback.as_ref().unchecked_ref(),
        &opts,
    )?;

    Ok(WindowEventListenerHandle {
        event_name: event_name.to_string(),
        callback: Some(callback),
        capture: options.capture,
    })
}
