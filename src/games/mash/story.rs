//! Fortune narratives.
//!
//! Story mode hands the resolved fortune to a [`StoryTeller`]. Only the
//! offline template teller ships with the game; a generative backend would
//! plug in behind the same trait.

use super::result::{Fortune, FortuneEntry};

pub trait StoryTeller {
    fn tell(&self, fortune: &Fortune) -> String;
}

/// Fills a fixed template from the winners.
pub struct TemplateStory;

impl TemplateStory {
    fn sentence(entry: &FortuneEntry) -> String {
        let v = &entry.value;
        match entry.key.as_str() {
            "housing" => format!("あなたは {v} に住むでしょう。"),
            "spouse" => format!("{v} と結婚します。"),
            "job" => format!("仕事は {v}。"),
            "car" => format!("愛車は {v}。"),
            "kids" => format!("子どもは {v} 人。"),
            "city" => format!("暮らす街は {v}。"),
            _ => format!("{}: {v}。", entry.label),
        }
    }
}

impl StoryTeller for TemplateStory {
    fn tell(&self, fortune: &Fortune) -> String {
        if fortune.is_empty() {
            return "渦巻きは何も語らなかった…".to_string();
        }
        let body: Vec<String> = fortune.entries.iter().map(Self::sentence).collect();
        format!("渦巻きが未来を告げる。{}", body.join(""))
    }
}
