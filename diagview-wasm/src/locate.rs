use diagview::locate::source_text;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// A diagram source block found in the page.
#[derive(Clone, Debug)]
pub struct SourceBlock {
    /// The `<pre>` hidden once the diagram renders.
    pub pre: HtmlElement,
    pub code: Element,
    pub source: String,
}

/// Matches for `selector` in document order. Read-only.
pub fn find_blocks(document: &Document, selector: &str) -> Vec<SourceBlock> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        log::warn!("invalid diagram block selector: {selector}");
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter_map(|code| {
            let pre = code.closest("pre").ok().flatten()?.dyn_into::<HtmlElement>().ok()?;
            let source = source_text(&code.text_content().unwrap_or_default()).to_string();
            Some(SourceBlock { pre, code, source })
        })
        .collect()
}

pub fn has_blocks(document: &Document, selector: &str) -> bool {
    matches!(document.query_selector(selector), Ok(Some(_)))
}
