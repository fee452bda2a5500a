use clap::Args;
use yew::prelude::*;

use crate::template::{GameKind, TemplateConfig};
use crate::theme::Theme;
use crate::utils::*;
use crate::views::{DragView, PuzzleView, ScratchView, WordRevealView};

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct AppProps {
    /// Force a mini-game instead of the template configuration
    #[arg(short, long, value_enum)]
    game: Option<GameKind>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    SelectGame(GameKind),
    ToggleTheme,
}

pub(crate) struct App {
    config: TemplateConfig,
    game: GameKind,
    seed: u64,
    theme: Theme,
}

impl Component for App {
    type Message = Msg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = TemplateConfig::from_document();
        let game = ctx.props().game.unwrap_or(config.game);
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        log::debug!("mounting {:?} with seed {}", game, seed);
        Self {
            config,
            game,
            seed,
            theme: Theme::current(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SelectGame(game) => {
                if self.game != game {
                    self.game = game;
                    true
                } else {
                    false
                }
            }
            Msg::ToggleTheme => {
                self.theme = self.theme.toggled();
                Theme::apply(Some(self.theme));
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let config = &self.config;

        let selector = |kind: GameKind, label: &str| {
            let onclick = ctx.link().callback(move |_| Msg::SelectGame(kind));
            let class = classes!((self.game == kind).then_some("active"));
            html! {
                <button {class} {onclick}>{label}</button>
            }
        };

        let game = match self.game {
            GameKind::Scratch => html! {
                <ScratchView
                    hidden_message={config.hidden_message.clone()}
                    completion_message={config.completion_message.clone()}
                />
            },
            GameKind::Puzzle => html! {
                <PuzzleView
                    photo_url={config.puzzle_photo_url.clone()}
                    grid_size={config.grid_size}
                    seed={self.seed}
                    completion_message={config.completion_message.clone()}
                />
            },
            GameKind::Parking => html! {
                <DragView
                    target_zone={config.target_zone}
                    item_start={config.item_start}
                    item_size={config.item_size}
                    completion_message={config.completion_message.clone()}
                />
            },
            GameKind::Words => html! {
                <WordRevealView
                    words={config.words.clone()}
                    completion_message={config.completion_message.clone()}
                />
            },
        };

        html! {
            <div class="surpriz">
                <header>
                    <h1>{&config.headline}</h1>
                    <p>{&config.subtitle}</p>
                </header>
                <nav>
                    {selector(GameKind::Scratch, "Scratch")}
                    {selector(GameKind::Puzzle, "Puzzle")}
                    {selector(GameKind::Parking, "Park it")}
                    {selector(GameKind::Words, "Words")}
                    <button
                        class="theme-toggle"
                        onclick={ctx.link().callback(|_| Msg::ToggleTheme)}
                    >
                        {self.theme.toggled().scheme()}
                    </button>
                </nav>
                {game}
            </div>
        }
    }
}
