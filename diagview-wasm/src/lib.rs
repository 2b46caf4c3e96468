//! Browser bindings: mounts interactive viewports on rendered diagrams and
//! drives the page-level render passes.

use std::rc::Rc;

use diagview::Config;
use wasm_bindgen::prelude::*;
use web_sys::Document;

mod api;
pub mod attach;
mod error;
mod frame;
mod interop;
mod logger;
pub mod locate;
pub mod page;
pub mod runtime;

pub use api::{boot, init_logging, set_panic_hook};

pub const CONFIG_ELEMENT_ID: &str = "diagview-config";

#[wasm_bindgen]
pub struct Enhancer { pub(crate) inner: Rc<page::Page> }

impl Enhancer {
    pub fn rs_new(config: Config) -> Result<Enhancer, JsValue> {
        Ok(Enhancer { inner: page::Page::new(rs_document()?, config) })
    }

    /// Config from the JSON text of the element with `element_id`, defaults
    /// when the page has no such element.
    pub fn rs_page_config(element_id: &str) -> Result<Config, JsValue> {
        let text = rs_document()?.get_element_by_id(element_id).and_then(|e| e.text_content());
        match text {
            Some(text) if !text.trim().is_empty() => Config::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string())),
            _ => Ok(Config::default()),
        }
    }

    pub fn rs_page(&self) -> &Rc<page::Page> { &self.inner }
}

pub(crate) fn rs_document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document available"))
}
