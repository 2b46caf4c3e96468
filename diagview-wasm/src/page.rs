//! Page-level coordination: discovering blocks, running render batches and
//! re-rendering on theme change.
//!
//! A render goes into a speculative container inserted before the source
//! block. First renders show it right away; re-renders keep it hidden until
//! the new image is ready, so a failed re-render leaves the previous image
//! (and its viewport) untouched.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use diagview::locate::block_selector;
use diagview::{BatchPlan, Completion, Config, DiagramId, DiagramStatus, RenderError, RenderJob, RenderLedger, Theme, ViewportState};
use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement};

use crate::attach::{attach, ViewportHandle};
use crate::locate::{find_blocks, has_blocks, SourceBlock};
use crate::runtime::{self, Runtime};

pub const CONTAINER_CLASS: &str = "mermaid-diagram";

struct Slot {
    block: SourceBlock,
    container: Option<HtmlElement>,
    handle: Option<ViewportHandle>,
}

#[derive(Default)]
struct PageState {
    ledger: RenderLedger,
    slots: Vec<Slot>,
}

pub struct Page {
    config: Config,
    document: Document,
    selector: String,
    state: RefCell<PageState>,
    theme_listener: RefCell<Option<EventListener>>,
    disposed: Cell<bool>,
}

impl Page {
    pub fn new(document: Document, config: Config) -> Rc<Page> {
        let selector = block_selector(&config.page.language);
        Rc::new(Page {
            config,
            document,
            selector,
            state: RefCell::new(PageState::default()),
            theme_listener: RefCell::new(None),
            disposed: Cell::new(false),
        })
    }

    pub fn config(&self) -> &Config { &self.config }

    /// Renders every block on the page and re-renders on theme change.
    /// Calling it again only picks up blocks added since.
    pub fn start(self: &Rc<Self>) {
        if self.disposed.get() {
            return;
        }
        if !has_blocks(&self.document, &self.selector) {
            log::trace!("no diagram blocks on page");
            return;
        }
        if self.theme_listener.borrow().is_none() {
            let weak: Weak<Page> = Rc::downgrade(self);
            let listener = EventListener::new(&self.document, self.config.page.theme_event.clone(), move |_| {
                if let Some(page) = weak.upgrade() {
                    page.render(true);
                }
            });
            *self.theme_listener.borrow_mut() = Some(listener);
        }
        self.render(false);
    }

    /// `force` re-renders diagrams already on the page with the current
    /// theme; otherwise new blocks are discovered and rendered.
    pub fn render(self: &Rc<Self>, force: bool) {
        if self.disposed.get() {
            return;
        }
        if !force {
            self.discover();
        }
        self.run_plan(self.current_theme(), force);
    }

    pub fn diagram_count(&self) -> usize { self.state.borrow().slots.len() }

    pub fn status(&self, id: DiagramId) -> Option<DiagramStatus> {
        self.state.borrow().ledger.get(id).map(|r| r.status)
    }

    pub fn viewport_state(&self, id: DiagramId) -> Option<ViewportState> {
        let state = self.state.borrow();
        let handle = state.slots.get(id)?.handle.as_ref()?;
        let viewport = handle.viewport();
        let snapshot = *viewport.borrow().state();
        Some(snapshot)
    }

    /// Center-preserving zoom on one diagram. `None` when it has no viewport.
    pub fn zoom_to(&self, id: DiagramId, scale: f64) -> Option<ViewportState> {
        let viewport = self.state.borrow().slots.get(id)?.handle.as_ref()?.viewport();
        let mut vp = viewport.borrow_mut();
        vp.zoom_to(scale);
        Some(*vp.state())
    }

    /// Detaches the theme listener and every viewport's listeners. Renders
    /// still in flight are dropped when they settle; nothing new starts.
    pub fn dispose(&self) {
        self.disposed.set(true);
        self.theme_listener.borrow_mut().take();
        let handles: Vec<ViewportHandle> = self
            .state
            .borrow_mut()
            .slots
            .iter_mut()
            .filter_map(|s| s.handle.take())
            .collect();
        handles.into_iter().for_each(ViewportHandle::dispose);
    }

    fn current_theme(&self) -> Theme {
        let value = self
            .document
            .document_element()
            .and_then(|root| root.get_attribute(&self.config.page.theme_attribute));
        Theme::from_attribute(value.as_deref())
    }

    fn discover(&self) {
        let blocks = find_blocks(&self.document, &self.selector);
        let mut state = self.state.borrow_mut();
        for block in blocks {
            if state.slots.iter().any(|s| s.block.pre == block.pre) {
                continue;
            }
            state.ledger.register(block.source.clone());
            state.slots.push(Slot { block, container: None, handle: None });
        }
    }

    fn run_plan(self: &Rc<Self>, theme: Theme, force: bool) {
        let plan = self.state.borrow_mut().ledger.request_batch(theme, force);
        match plan {
            BatchPlan::Idle => {}
            BatchPlan::Deferred => log::debug!("{} render queued behind in-flight jobs", theme.as_str()),
            BatchPlan::Start { theme, jobs } => spawn_local(Rc::clone(self).run_batch(theme, jobs)),
        }
    }

    async fn run_batch(self: Rc<Self>, theme: Theme, jobs: Vec<RenderJob>) {
        let page = &self.config.page;
        let loaded = runtime::load(&page.runtime_src, &page.runtime_global)
            .await
            .and_then(|rt| rt.initialize(theme, &page.security_level).map(|_| rt));
        let rt = match loaded {
            Ok(rt) => rt,
            Err(e) => {
                log::warn!("{e}; leaving diagram sources visible");
                self.state.borrow_mut().ledger.abandon(&jobs);
                self.start_queued();
                return;
            }
        };
        if self.disposed.get() {
            self.state.borrow_mut().ledger.abandon(&jobs);
            return;
        }
        for job in jobs {
            self.spawn_job(&rt, job);
        }
    }

    fn spawn_job(self: &Rc<Self>, rt: &Runtime, job: RenderJob) {
        if self.disposed.get() {
            self.state.borrow_mut().ledger.abandon(&[job]);
            return;
        }
        if !self.state.borrow().ledger.is_current(job) {
            self.state.borrow_mut().ledger.complete(job, false);
            self.start_queued();
            return;
        }
        let prepared = self.prepare(job.id);
        let (container, source) = match prepared {
            Ok(p) => p,
            Err(e) => {
                log::warn!("could not prepare diagram {}: {}", job.id, crate::interop::describe(&e));
                self.settle(job, None, Err(RenderError::Render("container setup failed".into())));
                return;
            }
        };
        let page = Rc::clone(self);
        let rt = rt.clone();
        let id = format!("{}-{}-{}", self.config.page.id_prefix, job.id, job.generation);
        spawn_local(async move {
            let result = rt.render(&id, &source).await;
            page.settle(job, Some(container), result);
        });
    }

    fn prepare(&self, id: DiagramId) -> Result<(HtmlElement, String), JsValue> {
        let state = self.state.borrow();
        let slot = &state.slots[id];
        let container = self.document.create_element("div")?.dyn_into::<HtmlElement>()?;
        container.set_class_name(CONTAINER_CLASS);
        container.set_tab_index(0);
        container.set_attribute("role", "region")?;
        container.set_attribute("aria-label", "Scrollable diagram")?;
        if slot.container.is_some() {
            container.set_hidden(true);
        }
        let parent = slot.block.pre.parent_node().ok_or_else(|| JsValue::from_str("source block is detached"))?;
        parent.insert_before(&container, Some(&slot.block.pre))?;
        Ok((container, slot.block.source.clone()))
    }

    fn settle(self: &Rc<Self>, job: RenderJob, container: Option<HtmlElement>, result: Result<String, RenderError>) {
        if self.disposed.get() {
            self.state.borrow_mut().ledger.abandon(&[job]);
            if let Some(c) = container {
                c.remove();
            }
            log::debug!("dropping render of diagram {} after dispose", job.id);
            return;
        }
        let completion = self.state.borrow_mut().ledger.complete(job, result.is_ok());
        match (completion, result, container) {
            (Completion::Display, Ok(svg), Some(container)) => self.display(job.id, container, &svg),
            (completion, result, container) => {
                if let Some(c) = container {
                    c.remove();
                }
                match (completion, result) {
                    (Completion::Discard, _) => log::debug!("discarding stale render of diagram {}", job.id),
                    (Completion::KeepPrevious, Err(e)) => {
                        log::warn!("diagram {}: {e}; keeping previous image", job.id)
                    }
                    (_, Err(e)) => {
                        log::warn!("diagram {}: {e}", job.id);
                        self.show_source(job.id);
                    }
                    (_, Ok(_)) => {}
                }
            }
        }
        self.start_queued();
    }

    fn display(&self, id: DiagramId, container: HtmlElement, svg: &str) {
        container.set_inner_html(svg);
        let (old_handle, old_container, pre) = {
            let mut state = self.state.borrow_mut();
            let slot = &mut state.slots[id];
            (slot.handle.take(), slot.container.replace(container.clone()), slot.block.pre.clone())
        };
        // the old viewport's listeners go before the replacement attaches
        drop(old_handle);
        if let Some(old) = old_container {
            old.remove();
        }
        container.set_hidden(false);
        pre.set_hidden(true);
        match attach(&container, &self.config.viewport) {
            Ok(handle) => self.state.borrow_mut().slots[id].handle = Some(handle),
            Err(e) => log::debug!("diagram {id} shown without controls: {e}"),
        }
    }

    fn show_source(&self, id: DiagramId) {
        if let Some(slot) = self.state.borrow().slots.get(id) {
            if slot.container.is_none() {
                slot.block.pre.set_hidden(false);
            }
        }
    }

    fn start_queued(self: &Rc<Self>) {
        let queued = self.state.borrow_mut().ledger.take_queued();
        if self.disposed.get() {
            return;
        }
        if let Some(theme) = queued {
            self.run_plan(theme, true);
        }
    }
}
