use js_sys::Object;
use wasm_bindgen::prelude::*;

use crate::interop::{new_obj, set_kv};

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

fn data_with(k: &str, v: JsValue) -> Object {
    let d = new_obj();
    set_kv(&d, k, &v);
    d
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = data_with("param", JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = data_with("param", JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "max", &JsValue::from_f64(max));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = data_with("kind", JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn invalid_config(message: impl Into<String>) -> JsValue { err("invalid_config", message, None) }

#[inline]
pub fn not_rendered(id: u32) -> JsValue {
    let d = data_with("id", JsValue::from_f64(id as f64));
    err("not_rendered", "diagram has no interactive viewport", Some(d.into()))
}

/// `ok(value)` with `value` converted through serde.
pub fn ok_serde<T: serde::Serialize>(value: &T) -> JsValue {
    match serde_wasm_bindgen::to_value(value) {
        Ok(v) => ok(v),
        Err(e) => err("serialize", e.to_string(), None),
    }
}
