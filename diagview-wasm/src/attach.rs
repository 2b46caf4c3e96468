//! Wraps a rendered svg in a toolbar and a scrollable frame driven by a
//! [`Viewport`].
//!
//! Every listener is a `gloo` [`EventListener`] owned by the returned
//! [`ViewportHandle`]; dropping the handle detaches all of them and cancels a
//! pending initial fit.

use std::cell::RefCell;
use std::rc::Rc;

use diagview::geometry::tolerance::BOUNDS_PADDING;
use diagview::{AttachError, Vec2, ViewBox, Viewport, ViewportConfig};
use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, EventTarget, HtmlButtonElement, HtmlElement, MouseEvent, SvgElement,
    SvgGraphicsElement, TouchEvent, TouchList, WheelEvent,
};

use crate::frame::DomFrame;
use crate::interop::describe;

pub type SharedViewport = Rc<RefCell<Viewport<DomFrame>>>;

pub const TOOLBAR_CLASS: &str = "mermaid-diagram__toolbar";
pub const VIEWPORT_CLASS: &str = "mermaid-diagram__viewport";
pub const ZOOM_VALUE_CLASS: &str = "mermaid-diagram__zoom-value";
pub const DRAGGING_CLASS: &str = "is-dragging";

pub struct ViewportHandle {
    viewport: SharedViewport,
    listeners: Vec<EventListener>,
    _fit_frame: AnimationFrame,
}

impl ViewportHandle {
    pub fn viewport(&self) -> SharedViewport { Rc::clone(&self.viewport) }

    pub fn listener_count(&self) -> usize { self.listeners.len() }

    /// Detaches every listener. Same as dropping the handle.
    pub fn dispose(self) {}
}

struct Chrome {
    toolbar: HtmlElement,
    zoom_out: HtmlButtonElement,
    zoom_in: HtmlButtonElement,
    fit: HtmlButtonElement,
    actual: HtmlButtonElement,
    zoom_label: HtmlElement,
    frame: HtmlElement,
}

/// Attaches zoom/pan controls to the svg inside `container`.
///
/// The viewBox is tightened to the measured content first. Images without a
/// positive size are left as they are, without controls.
pub fn attach(container: &HtmlElement, config: &ViewportConfig) -> Result<ViewportHandle, AttachError> {
    let svg = container
        .query_selector("svg")
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<SvgElement>().ok())
        .ok_or(AttachError::MissingImage)?;
    let mut view_box = svg
        .get_attribute("viewBox")
        .as_deref()
        .and_then(ViewBox::parse)
        .ok_or(AttachError::MissingViewBox)?;
    if let Some(tight) = measure_content(&svg).and_then(|content| view_box.tighten(content, BOUNDS_PADDING)) {
        match svg.set_attribute("viewBox", &tight.to_attribute()) {
            Ok(()) => view_box = tight,
            Err(e) => log::debug!("keeping declared viewBox: {}", describe(&e)),
        }
    }
    let base = view_box.size();
    if !base.is_positive() {
        return Err(AttachError::ZeroDimension { width: base.width, height: base.height });
    }

    let window = web_sys::window().ok_or_else(|| AttachError::Document("no window".into()))?;
    let document = window.document().ok_or_else(|| AttachError::Document("no document".into()))?;
    let chrome = build_chrome(&document, container, &svg).map_err(|e| AttachError::Document(describe(&e)))?;

    let frame = DomFrame {
        window: window.clone(),
        viewport: chrome.frame.clone(),
        svg,
        toolbar: chrome.toolbar.clone(),
        zoom_label: chrome.zoom_label.clone(),
    };
    let viewport: SharedViewport = Rc::new(RefCell::new(Viewport::new(frame, base, config.clone())?));

    let mut listeners = vec![
        on_click(&chrome.zoom_out, &viewport, Viewport::zoom_out),
        on_click(&chrome.zoom_in, &viewport, Viewport::zoom_in),
        on_click(&chrome.fit, &viewport, Viewport::fit),
        on_click(&chrome.actual, &viewport, Viewport::actual_size),
    ];
    listeners.extend(pointer_listeners(&window, &chrome.frame, &viewport));
    listeners.extend(touch_listeners(&chrome.frame, &viewport));

    let v = Rc::clone(&viewport);
    let fit_frame = request_animation_frame(move |_| v.borrow_mut().fit());

    Ok(ViewportHandle { viewport, listeners, _fit_frame: fit_frame })
}

fn measure_content(svg: &SvgElement) -> Option<ViewBox> {
    let graphics = svg.dyn_ref::<SvgGraphicsElement>()?;
    match graphics.get_b_box() {
        Ok(r) => Some(ViewBox::new(r.x() as f64, r.y() as f64, r.width() as f64, r.height() as f64)),
        Err(e) => {
            log::debug!("content bounds unavailable, keeping viewBox: {}", describe(&e));
            None
        }
    }
}

fn html(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(document.create_element(tag)?.dyn_into::<HtmlElement>()?)
}

fn button(document: &Document, label: &str, title: &str) -> Result<HtmlButtonElement, JsValue> {
    let b = document.create_element("button")?.dyn_into::<HtmlButtonElement>()?;
    b.set_type("button");
    b.set_text_content(Some(label));
    b.set_attribute("aria-label", title)?;
    b.set_title(title);
    Ok(b)
}

fn build_chrome(document: &Document, container: &HtmlElement, svg: &SvgElement) -> Result<Chrome, JsValue> {
    let toolbar = html(document, "div")?;
    toolbar.set_class_name(TOOLBAR_CLASS);
    let zoom_out = button(document, "-", "Zoom out")?;
    let zoom_in = button(document, "+", "Zoom in")?;
    let fit = button(document, "Fit", "Fit diagram to viewport")?;
    let actual = button(document, "100%", "Reset diagram zoom")?;
    let zoom_label = html(document, "span")?;
    zoom_label.set_class_name(ZOOM_VALUE_CLASS);
    zoom_label.set_text_content(Some("100%"));
    for child in [&*zoom_out, &*zoom_in, &*fit, &*actual, &zoom_label] {
        toolbar.append_child(child)?;
    }

    let frame = html(document, "div")?;
    frame.set_class_name(VIEWPORT_CLASS);
    frame.set_attribute("role", "region")?;
    frame.set_attribute("aria-label", "Diagram pan and zoom viewport")?;

    container.set_inner_html("");
    container.append_child(&toolbar)?;
    container.append_child(&frame)?;
    frame.append_child(svg)?;

    svg.remove_attribute("style")?;
    svg.set_attribute("preserveAspectRatio", "xMidYMin meet")?;
    svg.style().set_property("margin", "0 auto")?;

    Ok(Chrome { toolbar, zoom_out, zoom_in, fit, actual, zoom_label, frame })
}

fn on_click(
    target: &EventTarget,
    viewport: &SharedViewport,
    action: fn(&mut Viewport<DomFrame>),
) -> EventListener {
    let v = Rc::clone(viewport);
    EventListener::new(target, "click", move |_| action(&mut v.borrow_mut()))
}

fn pointer(e: &MouseEvent) -> Vec2 { Vec2::new(e.client_x() as f64, e.client_y() as f64) }

fn pointer_listeners(window: &web_sys::Window, frame: &HtmlElement, viewport: &SharedViewport) -> Vec<EventListener> {
    let mut out = Vec::with_capacity(5);

    let v = Rc::clone(viewport);
    out.push(EventListener::new_with_options(
        frame,
        "wheel",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(e) = event.dyn_ref::<WheelEvent>() else { return };
            if v.borrow_mut().wheel(e.delta_y(), e.ctrl_key() || e.meta_key()) {
                e.prevent_default();
            }
        },
    ));

    let v = Rc::clone(viewport);
    let f = frame.clone();
    out.push(EventListener::new_with_options(
        frame,
        "mousedown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(e) = event.dyn_ref::<MouseEvent>() else { return };
            if v.borrow_mut().mouse_down(e.button(), pointer(e)) {
                let _ = f.class_list().add_1(DRAGGING_CLASS);
                e.prevent_default();
            }
        },
    ));

    let v = Rc::clone(viewport);
    out.push(EventListener::new(window, "mousemove", move |event| {
        let Some(e) = event.dyn_ref::<MouseEvent>() else { return };
        let mut vp = v.borrow_mut();
        if vp.is_dragging() {
            vp.mouse_move(pointer(e));
        }
    }));

    let v = Rc::clone(viewport);
    let f = frame.clone();
    out.push(EventListener::new(window, "mouseup", move |_| {
        if v.borrow_mut().mouse_up() {
            let _ = f.class_list().remove_1(DRAGGING_CLASS);
        }
    }));

    let v = Rc::clone(viewport);
    out.push(EventListener::new(window, "resize", move |_| v.borrow_mut().resize()));

    out
}

fn touch_points(list: &TouchList) -> Vec<Vec2> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Vec2::new(t.client_x() as f64, t.client_y() as f64))
        .collect()
}

fn touch_listeners(frame: &HtmlElement, viewport: &SharedViewport) -> Vec<EventListener> {
    type TouchHandler = fn(&mut Viewport<DomFrame>, &[Vec2]) -> bool;
    let handlers: [(&'static str, TouchHandler); 3] = [
        ("touchstart", Viewport::touch_start),
        ("touchmove", Viewport::touch_move),
        ("touchend", Viewport::touch_end),
    ];
    let mut out: Vec<EventListener> = handlers
        .into_iter()
        .map(|(name, handler)| {
            let v = Rc::clone(viewport);
            EventListener::new_with_options(
                frame,
                name,
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(e) = event.dyn_ref::<TouchEvent>() else { return };
                    if handler(&mut v.borrow_mut(), &touch_points(&e.touches())) {
                        e.prevent_default();
                    }
                },
            )
        })
        .collect();

    let v = Rc::clone(viewport);
    out.push(EventListener::new(frame, "touchcancel", move |_| v.borrow_mut().touch_cancel()));

    // keep platform pinch-zoom from competing with ours (WebKit)
    for name in ["gesturestart", "gesturechange"] {
        out.push(EventListener::new_with_options(
            frame,
            name,
            EventListenerOptions::enable_prevent_default(),
            |event| event.prevent_default(),
        ));
    }
    out
}
