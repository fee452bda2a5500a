use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use surpriz_core::Rect;

use crate::utils::*;

/// Which interaction family a template page mounts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum GameKind {
    Scratch,
    Puzzle,
    Parking,
    Words,
}

impl Default for GameKind {
    fn default() -> Self {
        Self::Scratch
    }
}

/// Per-template values produced by the surrounding CMS/editor layer.
/// All fields are opaque strings and numbers to the engines; missing or
/// malformed configuration falls back to a renderable default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct TemplateConfig {
    pub game: GameKind,
    pub headline: String,
    pub subtitle: String,
    pub hidden_message: String,
    pub completion_message: String,
    pub puzzle_photo_url: String,
    pub grid_size: u8,
    pub words: Vec<String>,
    pub target_zone: Rect,
    pub item_start: (f32, f32),
    pub item_size: (f32, f32),
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            game: GameKind::default(),
            headline: "A surprise is waiting for you".to_string(),
            subtitle: "Play along to uncover it".to_string(),
            hidden_message: "You are my favorite person. Always.".to_string(),
            completion_message: "You found the secret message!".to_string(),
            puzzle_photo_url: "/assets/puzzle-photo.jpg".to_string(),
            grid_size: 3,
            words: vec![
                "You".to_string(),
                "make".to_string(),
                "every".to_string(),
                "day".to_string(),
                "brighter".to_string(),
            ],
            target_zone: Rect::new(60.0, 40.0, 140.0, 220.0),
            item_start: (20.0, 260.0),
            item_size: (100.0, 60.0),
        }
    }
}

impl StorageKey for TemplateConfig {
    const KEY: &'static str = "surpriz:template";
}

impl TemplateConfig {
    /// Loads the configuration embedded by the page as
    /// `<script id="template-config" type="application/json">`.
    ///
    /// An embedded configuration wins and becomes the stored one; when
    /// the page carries none, the last stored configuration is used.
    pub(crate) fn from_document() -> Self {
        use gloo::utils::document;

        let embedded = document()
            .get_element_by_id("template-config")
            .and_then(|element| element.text_content())
            .and_then(|raw| match serde_json::from_str::<Self>(&raw) {
                Ok(config) => Some(config.normalized()),
                Err(err) => {
                    log::warn!("malformed template config: {}", err);
                    None
                }
            });

        match embedded {
            Some(config) => {
                config.local_save();
                config
            }
            None => {
                log::debug!("no embedded template config, trying local storage");
                Self::local_or_default().normalized()
            }
        }
    }

    /// Empty collections degrade to the defaults so every template stays
    /// renderable.
    fn normalized(mut self) -> Self {
        if self.words.is_empty() {
            self.words = Self::default().words;
        }
        if self.grid_size < 2 {
            self.grid_size = Self::default().grid_size;
        }
        self
    }
}
