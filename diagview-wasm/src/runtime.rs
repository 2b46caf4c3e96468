//! Loading and driving the external diagram runtime.
//!
//! Each runtime script is requested at most once per page: load promises
//! are memoized by script url, so concurrent callers await the same pending
//! load, and a failed load stays failed (no automatic retry).

use std::cell::RefCell;
use std::collections::HashMap;

use diagview::{RenderError, Theme};
use gloo::events::EventListener;
use js_sys::{Function, Promise};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlScriptElement, Window};

use crate::interop::{describe, get, get_fn, new_obj, set_kv};

thread_local! {
    static LOADS: RefCell<HashMap<String, Promise>> = RefCell::new(HashMap::new());
}

/// A runtime global exposing `initialize(config)` and `render(id, source)`.
#[derive(Clone, Debug)]
pub struct Runtime {
    object: JsValue,
    initialize: Function,
    render: Function,
}

impl Runtime {
    /// Accepts only values with callable `initialize` and `render`.
    pub fn from_js(object: JsValue) -> Result<Runtime, RenderError> {
        let initialize = get_fn(&object, "initialize")
            .ok_or_else(|| RenderError::RuntimeUnavailable("missing initialize()".into()))?;
        let render = get_fn(&object, "render")
            .ok_or_else(|| RenderError::RuntimeUnavailable("missing render()".into()))?;
        Ok(Runtime { object, initialize, render })
    }

    /// Sets the runtime-wide configuration for the next batch of renders.
    pub fn initialize(&self, theme: Theme, security_level: &str) -> Result<(), RenderError> {
        let cfg = new_obj();
        set_kv(&cfg, "startOnLoad", &JsValue::FALSE);
        set_kv(&cfg, "securityLevel", &JsValue::from_str(security_level));
        set_kv(&cfg, "theme", &JsValue::from_str(theme.as_str()));
        self.initialize
            .call1(&self.object, &cfg)
            .map(|_| ())
            .map_err(|e| RenderError::RuntimeUnavailable(describe(&e)))
    }

    /// Renders one definition to svg markup.
    pub async fn render(&self, id: &str, source: &str) -> Result<String, RenderError> {
        let pending = self
            .render
            .call2(&self.object, &JsValue::from_str(id), &JsValue::from_str(source))
            .map_err(|e| RenderError::Render(describe(&e)))?;
        let out = JsFuture::from(Promise::resolve(&pending))
            .await
            .map_err(|e| RenderError::Render(describe(&e)))?;
        get(&out, "svg")
            .and_then(|svg| svg.as_string())
            .ok_or_else(|| RenderError::Render("result has no svg markup".into()))
    }
}

fn global(window: &Window, name: &str) -> Option<JsValue> { get(window.as_ref(), name) }

/// Resolves the runtime, loading `src` if the global `name` is not present yet.
pub async fn load(src: &str, name: &str) -> Result<Runtime, RenderError> {
    let window = web_sys::window().ok_or_else(|| RenderError::RuntimeUnavailable("no window".into()))?;
    if let Some(existing) = global(&window, name) {
        if let Ok(runtime) = Runtime::from_js(existing) {
            return Ok(runtime);
        }
    }
    let promise = LOADS.with(|loads| {
        loads
            .borrow_mut()
            .entry(src.to_string())
            .or_insert_with(|| inject_script(&window, src, name))
            .clone()
    });
    let value = JsFuture::from(promise)
        .await
        .map_err(|e| RenderError::RuntimeUnavailable(describe(&e)))?;
    Runtime::from_js(value)
}

fn inject_script(window: &Window, src: &str, name: &str) -> Promise {
    let Some(document) = window.document() else {
        return Promise::reject(&JsValue::from_str("no document"));
    };
    match append_script(&document, src) {
        Ok(script) => {
            let window = window.clone();
            let name = name.to_string();
            Promise::new(&mut |resolve: Function, reject: Function| {
                let on_load = {
                    let window = window.clone();
                    let name = name.clone();
                    let reject = reject.clone();
                    EventListener::once(&script, "load", move |_| {
                        match global(&window, &name) {
                            Some(runtime) => { let _ = resolve.call1(&JsValue::NULL, &runtime); }
                            None => {
                                let msg = JsValue::from_str("runtime unavailable after script load");
                                let _ = reject.call1(&JsValue::NULL, &msg);
                            }
                        }
                    })
                };
                let on_error = EventListener::once(&script, "error", move |_| {
                    let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("failed to load runtime script"));
                });
                on_load.forget();
                on_error.forget();
            })
        }
        Err(e) => Promise::reject(&e),
    }
}

fn append_script(document: &Document, src: &str) -> Result<HtmlScriptElement, JsValue> {
    let script = document.create_element("script")?.dyn_into::<HtmlScriptElement>()?;
    script.set_src(src);
    script.set_async(true);
    let head = document.head().ok_or_else(|| JsValue::from_str("document has no head"))?;
    head.append_child(&script)?;
    Ok(script)
}
