use surpriz_core::{DragConfig, DragSnapEngine, Rect};
use wasm_bindgen::JsCast;
use web_sys::{Element, PointerEvent};
use yew::prelude::*;

use crate::utils::*;

/// Logical extent of the play surface, matched by the stylesheet.
const SURFACE: (f32, f32) = (360.0, 360.0);

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct DragProps {
    pub target_zone: Rect,
    pub item_start: (f32, f32),
    pub item_size: (f32, f32),
    pub completion_message: AttrValue,
}

pub(crate) enum Msg {
    Down(PointerEvent),
    Move(PointerEvent),
    Up(PointerEvent),
    Cancel,
    Reset,
}

/// Pointer adapter for the drag-and-snap engine: translates client
/// coordinates to surface-local ones and mirrors the engine's position
/// into inline styles.
pub(crate) struct DragView {
    engine: DragSnapEngine,
    surface_ref: NodeRef,
}

impl DragView {
    fn fresh_engine(props: &DragProps) -> DragSnapEngine {
        DragSnapEngine::new(DragConfig {
            start: props.item_start,
            item_size: props.item_size,
            container: SURFACE,
            target: props.target_zone,
        })
    }

    fn local_coords(&self, event: &PointerEvent) -> Option<(f32, f32)> {
        let surface = self.surface_ref.cast::<Element>()?;
        let rect = surface.get_bounding_client_rect();
        Some((
            event.client_x() as f32 - rect.left() as f32,
            event.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn capture(event: &PointerEvent) {
        if let Some(element) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
        {
            let _ = element.set_pointer_capture(event.pointer_id());
        }
    }
}

impl Component for DragView {
    type Message = Msg;
    type Properties = DragProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            engine: Self::fresh_engine(ctx.props()),
            surface_ref: NodeRef::default(),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.engine = Self::fresh_engine(ctx.props());
        true
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Down(event) => {
                let Some((x, y)) = self.local_coords(&event) else {
                    return false;
                };
                Self::capture(&event);
                self.engine
                    .begin_drag(event.pointer_id(), x, y, utc_now())
                    .has_update()
            }
            Msg::Move(event) => {
                let Some((x, y)) = self.local_coords(&event) else {
                    return false;
                };
                self.engine
                    .update_drag(event.pointer_id(), x, y)
                    .has_update()
            }
            Msg::Up(event) => self
                .engine
                .end_drag(event.pointer_id(), utc_now())
                .has_update(),
            Msg::Cancel => self.engine.cancel_drag().has_update(),
            Msg::Reset => {
                self.engine.reset();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let (x, y) = self.engine.position();
        let (item_w, item_h) = props.item_size;
        let zone = self.engine.target();
        let snapped = self.engine.is_snapped();

        let surface_style = format!("width:{}px;height:{}px", SURFACE.0, SURFACE.1);
        let zone_style = format!(
            "left:{}px;top:{}px;width:{}px;height:{}px",
            zone.x, zone.y, zone.w, zone.h
        );
        let item_class = classes!(
            "drag-item",
            snapped.then_some("snapped"),
            self.engine.is_dragging().then_some("dragging")
        );
        let item_style = format!(
            "left:{x}px;top:{y}px;width:{item_w}px;height:{item_h}px"
        );

        let onpointerdown = ctx.link().callback(Msg::Down);
        let onpointermove = ctx.link().callback(Msg::Move);
        let onpointerup = ctx.link().callback(Msg::Up);
        let onpointercancel = ctx.link().callback(|_| Msg::Cancel);
        let cb_reset = ctx.link().callback(|_| Msg::Reset);

        html! {
            <section class="parking-game">
                <div class="drag-surface" ref={self.surface_ref.clone()} style={surface_style}>
                    <div class="target-zone" style={zone_style}/>
                    <div
                        class={item_class}
                        style={item_style}
                        {onpointerdown}
                        {onpointermove}
                        {onpointerup}
                        {onpointercancel}
                    />
                </div>
                if snapped {
                    <div class="completion-card">
                        <p>{&props.completion_message}</p>
                    </div>
                }
                <button onclick={cb_reset}>{"Try again"}</button>
            </section>
        }
    }
}
