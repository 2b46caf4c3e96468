use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

pub fn new_obj() -> Object { Object::new() }

pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}

pub fn get(target: &JsValue, k: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(k)).ok().filter(|v| !v.is_undefined() && !v.is_null())
}

pub fn get_fn(target: &JsValue, k: &str) -> Option<Function> {
    get(target, k).and_then(|v| v.dyn_into::<Function>().ok())
}

/// Best-effort human readable text for a thrown JS value.
pub fn describe(value: &JsValue) -> String {
    if let Some(e) = value.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
