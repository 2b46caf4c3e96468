use diagview::{Config, PageConfig};
use diagview_wasm::Enhancer;
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn field(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap()
}

fn is_ok(v: &JsValue) -> bool {
    field(v, "ok").as_bool() == Some(true)
}

fn is_err(v: &JsValue, code: &str) -> bool {
    !is_ok(v) && field(&field(v, "error"), "code").as_string().as_deref() == Some(code)
}

fn isolated() -> Enhancer {
    let config = Config {
        page: PageConfig { language: "absent-lang".into(), ..PageConfig::default() },
        ..Config::default()
    };
    Enhancer::rs_new(config).unwrap()
}

#[wasm_bindgen_test]
fn invalid_config_is_a_typed_error() {
    let viewport = Object::new();
    Reflect::set(&viewport, &"minScale".into(), &JsValue::from_f64(-1.0)).unwrap();
    let cfg = Object::new();
    Reflect::set(&cfg, &"viewport".into(), &viewport).unwrap();
    assert!(is_err(&Enhancer::with_config_res(cfg.into()), "invalid_config"));

    let wrong_type = Object::new();
    Reflect::set(&wrong_type, &"viewport".into(), &JsValue::from_str("big")).unwrap();
    assert!(is_err(&Enhancer::with_config_res(wrong_type.into()), "invalid_config"));

    assert!(is_ok(&Enhancer::with_config_res(JsValue::UNDEFINED)));
}

#[wasm_bindgen_test]
fn missing_config_element_falls_back_to_defaults() {
    assert!(is_ok(&Enhancer::from_page_config_res("no-such-config-element")));
}

#[wasm_bindgen_test]
fn unknown_diagram_ids_are_rejected() {
    let e = isolated();
    e.start();
    assert_eq!(e.diagram_count(), 0);
    assert!(is_err(&e.status_res(0), "invalid_id"));
    assert!(is_err(&e.viewport_state_res(3), "invalid_id"));
    assert!(is_err(&e.set_scale_res(0, f64::NAN), "non_finite"));
    assert!(is_err(&e.set_scale_res(0, 1.0), "invalid_id"));
    e.dispose();
}
