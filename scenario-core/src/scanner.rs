use scenario_script::unit::{StoryUnit, UnitType};

/// Resource URLs the next few units will need.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Preload {
    pub images: Vec<String>,
    pub spines: Vec<String>,
    pub audios: Vec<String>,
}

impl Preload {
    fn push(list: &mut Vec<String>, url: &str) {
        if !list.iter().any(|u| u == url) {
            list.push(url.to_string());
        }
    }
}

pub struct Scanner;

impl Scanner {
    /// Collects URLs from `units[start..]`, at most `lookahead_steps` units,
    /// stopping after the first option unit since the branch is unknown.
    pub fn scan(units: &[StoryUnit], start: usize, lookahead_steps: usize) -> Preload {
        let mut preload = Preload::default();

        for unit in units.iter().skip(start).take(lookahead_steps) {
            if let Some(bg) = &unit.bg {
                Preload::push(&mut preload.images, &bg.url);
            }
            if let Some(popup) = &unit.popup_url {
                Preload::push(&mut preload.images, popup);
            }
            if let Some(l2d) = &unit.l2d {
                Preload::push(&mut preload.spines, &l2d.url);
            }
            for character in &unit.characters {
                Preload::push(&mut preload.spines, &character.spine_url);
            }
            if let Some(audio) = &unit.audio {
                let urls = [
                    audio.bgm.as_ref().map(|b| b.url.as_str()),
                    audio.sound_url.as_deref(),
                    audio.voice_url.as_deref(),
                ];
                for url in urls.into_iter().flatten() {
                    Preload::push(&mut preload.audios, url);
                }
            }
            if let Some(video) = &unit.video {
                Preload::push(&mut preload.audios, &video.sound_url);
            }

            if unit.unit_type == UnitType::Option {
                break;
            }
        }

        log::trace!(
            "preload from {}: {} images, {} spines, {} audios",
            start,
            preload.images.len(),
            preload.spines.len(),
            preload.audios.len()
        );
        preload
    }
}
