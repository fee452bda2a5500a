use surpriz_core::ProgressiveRevealEngine;
use yew::prelude::*;

use crate::utils::*;

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct WordRevealProps {
    pub words: Vec<String>,
    pub completion_message: AttrValue,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Reveal(usize),
    Reset,
}

/// Word-bubble view over the progressive reveal engine; each bubble hides
/// one token until clicked, in any order.
pub(crate) struct WordRevealView {
    engine: ProgressiveRevealEngine,
}

impl Component for WordRevealView {
    type Message = Msg;
    type Properties = WordRevealProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            engine: ProgressiveRevealEngine::new(ctx.props().words.len()),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.engine = ProgressiveRevealEngine::new(ctx.props().words.len());
        true
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Reveal(index) => match self.engine.reveal(index, utc_now()) {
                Ok(outcome) => outcome.has_update(),
                Err(err) => {
                    log::warn!("ignoring reveal: {}", err);
                    false
                }
            },
            Msg::Reset => {
                self.engine.reset();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let snapshot = self.engine.session().snapshot();
        let cb_reset = ctx.link().callback(|_| Msg::Reset);

        html! {
            <section class="word-reveal">
                <div class="bubbles">
                    {
                        for props.words.iter().enumerate().map(|(index, word)| {
                            let revealed = self.engine.is_revealed(index);
                            let class = classes!("bubble", revealed.then_some("revealed"));
                            let onclick = ctx.link().callback(move |_| Msg::Reveal(index));
                            html! {
                                <button {class} {onclick}>
                                    { if revealed { word.clone() } else { "?".to_string() } }
                                </button>
                            }
                        })
                    }
                </div>
                <div class="progress-row">
                    <span>
                        {format!("{} / {}", self.engine.revealed_count(), self.engine.total())}
                    </span>
                    <span>{format_percent(snapshot.progress)}</span>
                </div>
                if self.engine.all_revealed() {
                    <div class="completion-card">
                        <p>{&props.completion_message}</p>
                    </div>
                }
                <button onclick={cb_reset}>{"Start over"}</button>
            </section>
        }
    }
}
