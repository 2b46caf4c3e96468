use diagview::Config;
use gloo::events::EventListener;
use wasm_bindgen::prelude::*;

use crate::{error, Enhancer};

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes `log` output to the browser console at `level`
/// (`error`, `warn`, `info`, `debug`, `trace`).
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    crate::logger::init(level);
}

/// Page entry point: reads the optional config element and starts once the
/// document is parsed.
#[wasm_bindgen]
pub fn boot() -> Result<(), JsValue> {
    set_panic_hook();
    let config = Enhancer::rs_page_config(crate::CONFIG_ELEMENT_ID)?;
    let enhancer = Enhancer::rs_new(config)?;
    let page = enhancer.rs_page().clone();
    let document = crate::rs_document()?;
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_| page.start()).forget();
    } else {
        page.start();
    }
    Ok(())
}

#[wasm_bindgen]
impl Enhancer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Enhancer, JsValue> {
        Enhancer::rs_new(Config::default())
    }

    #[wasm_bindgen(js_name = withConfigRes)]
    pub fn with_config_res(config: JsValue) -> JsValue {
        let parsed: Config = if config.is_undefined() || config.is_null() {
            Config::default()
        } else {
            match serde_wasm_bindgen::from_value(config) {
                Ok(c) => c,
                Err(e) => return error::invalid_config(e.to_string()),
            }
        };
        if let Err(e) = parsed.validate() {
            return error::invalid_config(e.to_string());
        }
        match Enhancer::rs_new(parsed) {
            Ok(enhancer) => error::ok(enhancer.into()),
            Err(e) => error::err("no_document", crate::interop::describe(&e), None),
        }
    }

    #[wasm_bindgen(js_name = fromPageConfigRes)]
    pub fn from_page_config_res(element_id: &str) -> JsValue {
        let config = match Enhancer::rs_page_config(element_id) {
            Ok(c) => c,
            Err(e) => return error::invalid_config(crate::interop::describe(&e)),
        };
        match Enhancer::rs_new(config) {
            Ok(enhancer) => error::ok(enhancer.into()),
            Err(e) => error::err("no_document", crate::interop::describe(&e), None),
        }
    }

    pub fn start(&self) {
        self.inner.start();
    }

    /// Renders blocks added since the last pass.
    pub fn render(&self) {
        self.inner.render(false);
    }

    /// Re-renders every diagram with the page's current theme.
    pub fn rerender(&self) {
        self.inner.render(true);
    }

    #[wasm_bindgen(js_name = diagramCount)]
    pub fn diagram_count(&self) -> u32 {
        self.inner.diagram_count() as u32
    }

    #[wasm_bindgen(js_name = statusRes)]
    pub fn status_res(&self, id: u32) -> JsValue {
        match self.inner.status(id as usize) {
            Some(status) => error::ok(JsValue::from_str(status.as_str())),
            None => error::invalid_id("diagram", id),
        }
    }

    #[wasm_bindgen(js_name = viewportStateRes)]
    pub fn viewport_state_res(&self, id: u32) -> JsValue {
        if self.inner.status(id as usize).is_none() {
            return error::invalid_id("diagram", id);
        }
        match self.inner.viewport_state(id as usize) {
            Some(state) => error::ok_serde(&state),
            None => error::not_rendered(id),
        }
    }

    #[wasm_bindgen(js_name = setScaleRes)]
    pub fn set_scale_res(&self, id: u32, scale: f64) -> JsValue {
        if !scale.is_finite() {
            return error::non_finite("scale");
        }
        if self.inner.status(id as usize).is_none() {
            return error::invalid_id("diagram", id);
        }
        let Some(state) = self.inner.viewport_state(id as usize) else {
            return error::not_rendered(id);
        };
        if scale < state.min_scale || scale > state.max_scale {
            return error::out_of_range("scale", state.min_scale, state.max_scale, scale);
        }
        match self.inner.zoom_to(id as usize, scale) {
            Some(state) => error::ok_serde(&state),
            None => error::not_rendered(id),
        }
    }

    /// Releases the theme subscription and every viewport's listeners.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}
