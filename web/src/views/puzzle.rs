use surpriz_core::{PuzzleConfig, SlidingPuzzleEngine};
use yew::prelude::*;

use crate::utils::*;

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct PuzzleProps {
    pub photo_url: AttrValue,
    pub grid_size: u8,
    pub seed: u64,
    pub completion_message: AttrValue,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Select(usize),
    Shuffle,
}

/// Photo-tile grid over the tile-swap puzzle engine. Each button shows its
/// tile's slice of the photo via background-position; two clicks swap.
pub(crate) struct PuzzleView {
    engine: SlidingPuzzleEngine,
}

impl PuzzleView {
    fn fresh_engine(props: &PuzzleProps) -> SlidingPuzzleEngine {
        SlidingPuzzleEngine::new(PuzzleConfig::new(props.grid_size), props.seed)
    }

    fn tile_style(&self, tile: u16, photo_url: &str) -> String {
        let n = self.engine.grid_size() as u16;
        let row = tile / n;
        let col = tile % n;
        let pos_x = col as f32 / (n - 1).max(1) as f32 * 100.0;
        let pos_y = row as f32 / (n - 1).max(1) as f32 * 100.0;
        let scale = n as u32 * 100;
        format!(
            "background-image:url({photo_url});background-size:{scale}% {scale}%;background-position:{pos_x}% {pos_y}%"
        )
    }
}

impl Component for PuzzleView {
    type Message = Msg;
    type Properties = PuzzleProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            engine: Self::fresh_engine(ctx.props()),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        // a new photo, grid, or seed gets a fresh shuffle
        if props.photo_url != old_props.photo_url
            || props.grid_size != old_props.grid_size
            || props.seed != old_props.seed
        {
            self.engine = Self::fresh_engine(props);
        }
        true
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Select(slot) => match self.engine.select_tile(slot, utc_now()) {
                Ok(outcome) => outcome.has_update(),
                Err(err) => {
                    log::warn!("ignoring tile selection: {}", err);
                    false
                }
            },
            Msg::Shuffle => {
                self.engine.reset_shuffle(js_random_seed());
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let solved = self.engine.is_solved();
        let n = self.engine.grid_size();
        let grid_style = format!(
            "grid-template-columns:repeat({n}, 1fr);grid-template-rows:repeat({n}, 1fr)"
        );
        let cb_shuffle = ctx.link().callback(|_| Msg::Shuffle);

        html! {
            <section class="puzzle-board">
                <div class="puzzle-grid" style={grid_style}>
                    {
                        for (0..self.engine.total_tiles() as usize).map(|slot| {
                            let tile = self.engine.tile_at(slot).unwrap_or_default();
                            let selected = self.engine.selected() == Some(slot);
                            let class = classes!("puzzle-tile", selected.then_some("selected"));
                            let style = self.tile_style(tile, &props.photo_url);
                            let onclick = ctx.link().callback(move |_| Msg::Select(slot));
                            html! {
                                <button {class} {style} {onclick}/>
                            }
                        })
                    }
                </div>
                if solved {
                    <div class="completion-card">
                        <p>{&props.completion_message}</p>
                    </div>
                }
                <button onclick={cb_shuffle}>{"Shuffle"}</button>
            </section>
        }
    }
}
