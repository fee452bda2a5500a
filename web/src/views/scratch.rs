use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use surpriz_core::{ScratchCanvasEngine, ScratchConfig, ScratchOutcome};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent};
use yew::prelude::*;

use crate::utils::*;

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct ScratchProps {
    pub hidden_message: AttrValue,
    pub completion_message: AttrValue,
}

pub(crate) enum Msg {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerEnd(PointerEvent),
    Resize,
    /// Deferred completion card reveal, tagged with the session generation
    /// it was scheduled for.
    Settled(u32),
    Reset,
}

/// Canvas adapter for the scratch-to-reveal engine. The engine owns the
/// erased-mask model; this view mirrors each stroke onto a real canvas
/// with `destination-out` compositing.
pub(crate) struct ScratchView {
    engine: ScratchCanvasEngine,
    canvas_ref: NodeRef,
    active_pointer: Option<i32>,
    settled: bool,
    _resize_listener: EventListener,
}

impl ScratchView {
    fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.canvas_ref.cast::<HtmlCanvasElement>()
    }

    fn context_2d(&self) -> Option<CanvasRenderingContext2d> {
        self.canvas()?
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into()
            .ok()
    }

    /// Resizes the engine to the canvas client extent and repaints the
    /// opaque overlay (gradient plus speckles, then erase compositing).
    fn sync_surface(&mut self) {
        let Some(canvas) = self.canvas() else {
            return;
        };

        let width = (canvas.client_width().max(1)) as u32;
        let height = (canvas.client_height().max(1)) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        self.engine.resize(width, height);
        self.settled = false;

        let Some(ctx) = self.context_2d() else {
            return;
        };

        let (w, h) = (width as f64, height as f64);
        ctx.set_global_composite_operation("source-over")
            .expect("known composite mode");
        ctx.clear_rect(0.0, 0.0, w, h);

        let gradient = ctx.create_linear_gradient(0.0, 0.0, w, h);
        gradient
            .add_color_stop(0.0, "#dbeafe")
            .expect("valid color stop");
        gradient
            .add_color_stop(1.0, "#c7d2fe")
            .expect("valid color stop");
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_global_alpha(0.28);
        ctx.set_fill_style_str("#a5b4fc");
        let speckles = (w * h / 900.0) as u32;
        for _ in 0..speckles {
            let x = js_sys::Math::random() * w;
            let y = js_sys::Math::random() * h;
            let radius = js_sys::Math::random() * 4.0 + 1.0;
            ctx.begin_path();
            ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU)
                .expect("valid arc");
            ctx.fill();
        }

        ctx.set_global_alpha(1.0);
        ctx.set_global_composite_operation("destination-out")
            .expect("known composite mode");
    }

    /// Translates a pointer event into canvas-local coordinates.
    fn local_coords(&self, event: &PointerEvent) -> Option<(f32, f32)> {
        let canvas = self.canvas()?;
        let rect = canvas.get_bounding_client_rect();
        Some((
            event.client_x() as f32 - rect.left() as f32,
            event.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn scratch_at(&mut self, x: f32, y: f32) -> ScratchOutcome {
        let outcome = self.engine.erase(x, y, utc_now());
        if outcome.has_update()
            && let Some(ctx) = self.context_2d()
        {
            let radius = self.engine.config().brush_radius as f64;
            ctx.begin_path();
            ctx.arc(x as f64, y as f64, radius, 0.0, std::f64::consts::TAU)
                .expect("valid arc");
            ctx.fill();
        }
        outcome
    }

    fn schedule_settle(&self, ctx: &Context<Self>) {
        let generation = self.engine.session().generation();
        let link = ctx.link().clone();
        Timeout::new(600, move || link.send_message(Msg::Settled(generation))).forget();
    }
}

impl Component for ScratchView {
    type Message = Msg;
    type Properties = ScratchProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let resize_listener = EventListener::new(&gloo::utils::window(), "resize", move |_| {
            link.send_message(Msg::Resize)
        });

        Self {
            engine: ScratchCanvasEngine::new(ScratchConfig::default()),
            canvas_ref: NodeRef::default(),
            active_pointer: None,
            settled: false,
            _resize_listener: resize_listener,
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.sync_surface();
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::PointerDown(event) => {
                if self.engine.session().is_completed() {
                    return false;
                }
                let Some((x, y)) = self.local_coords(&event) else {
                    return false;
                };
                if let Some(canvas) = self.canvas() {
                    let _ = canvas.set_pointer_capture(event.pointer_id());
                }
                self.active_pointer = Some(event.pointer_id());
                if self.scratch_at(x, y) == ScratchOutcome::Completed {
                    self.schedule_settle(ctx);
                }
                true
            }
            Msg::PointerMove(event) => {
                if self.active_pointer != Some(event.pointer_id()) {
                    return false;
                }
                let Some((x, y)) = self.local_coords(&event) else {
                    return false;
                };
                if self.scratch_at(x, y) == ScratchOutcome::Completed {
                    self.schedule_settle(ctx);
                }
                true
            }
            Msg::PointerEnd(event) => {
                if self.active_pointer != Some(event.pointer_id()) {
                    return false;
                }
                self.active_pointer = None;
                true
            }
            Msg::Resize => {
                self.sync_surface();
                true
            }
            Msg::Settled(generation) => {
                // a reset may have invalidated this timer
                if self.engine.session().is_current(generation)
                    && self.engine.session().is_completed()
                    && !self.settled
                {
                    self.settled = true;
                    true
                } else {
                    false
                }
            }
            Msg::Reset => {
                self.sync_surface();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let snapshot = self.engine.session().snapshot();
        let completed = snapshot.state.is_completed();

        let canvas_class = classes!("scratch-overlay", completed.then_some("revealed"));
        let onpointerdown = ctx.link().callback(Msg::PointerDown);
        let onpointermove = ctx.link().callback(Msg::PointerMove);
        let onpointerup = ctx.link().callback(Msg::PointerEnd);
        let onpointercancel = ctx.link().callback(Msg::PointerEnd);
        let onpointerleave = ctx.link().callback(Msg::PointerEnd);
        let cb_reset = ctx.link().callback(|_| Msg::Reset);

        html! {
            <section class="scratch-card">
                <div class="scratch-frame">
                    <p class="hidden-message">{&props.hidden_message}</p>
                    <canvas
                        ref={self.canvas_ref.clone()}
                        class={canvas_class}
                        {onpointerdown}
                        {onpointermove}
                        {onpointerup}
                        {onpointercancel}
                        {onpointerleave}
                    />
                </div>
                <div class="progress-row">
                    <span>{"Scratch"}</span>
                    <span>{format_percent(snapshot.progress)}</span>
                </div>
                <div class="progress-bar">
                    <div
                        class="progress-fill"
                        style={format!("width:{}%", snapshot.progress.max(6.0))}
                    />
                </div>
                if self.settled {
                    <div class="completion-card">
                        <p>{&props.completion_message}</p>
                    </div>
                }
                <button onclick={cb_reset}>{"Play again"}</button>
            </section>
        }
    }
}
