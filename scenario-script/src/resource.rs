//! Resource URL derivation.
//!
//! These paths are the only hand-off between translation and the asset
//! loader, so the per-kind layout below must stay stable.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Bg,
    Bgm,
    Sound,
    EmotionSound,
    VoiceJp,
    L2dVoice,
    CharacterSpine,
    L2dSpine,
    Excel,
    PopupImage,
    Avatar,
    Video,
}

/// Joins `root` and a kind-specific path for `name`.
pub fn resource_url(root: &str, kind: ResourceKind, name: &str) -> String {
    let root = root.trim_end_matches('/');
    match kind {
        ResourceKind::Bg => format!("{root}/bg/{}.jpg", last_segment(name)),
        ResourceKind::Bgm => format!("{root}/{name}.ogg"),
        ResourceKind::Sound | ResourceKind::EmotionSound => {
            format!("{root}/Audio/Sound/{name}.wav")
        }
        ResourceKind::VoiceJp | ResourceKind::L2dVoice => {
            format!("{root}/Audio/VoiceJp/{name}.wav")
        }
        ResourceKind::CharacterSpine => {
            let id = character_spine_id(name);
            format!("{root}/spine/{id}/{id}.skel")
        }
        ResourceKind::L2dSpine => format!("{root}/spine/{name}/{name}.skel"),
        ResourceKind::Excel => format!("{root}/data/{name}"),
        ResourceKind::PopupImage => {
            format!("{root}/UIs/03_Scenario/04_ScenarioImage/{name}.png")
        }
        ResourceKind::Avatar => format!("{root}/{name}.png"),
        ResourceKind::Video => format!("{root}/{name}"),
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// `UIs/03_Scenario/02_Character/CharacterSpine_hasumi` -> `hasumi_spr`.
///
/// Prefabs with an `ND` suffix share the skeleton of the plain variant.
pub fn character_spine_id(prefab: &str) -> String {
    let name = last_segment(prefab);
    let name = name.strip_prefix("CharacterSpine_").unwrap_or(name);
    let name = name.strip_suffix("ND").unwrap_or(name);
    let name = name.to_lowercase();
    if name.ends_with("_spr") {
        name
    } else {
        format!("{name}_spr")
    }
}

/// `SpineBG_Lobby_CH0184` -> `CH0184_home`.
pub fn l2d_spine_name(file_name: &str) -> String {
    let name = last_segment(file_name);
    let name = name.strip_prefix("SpineBG_Lobby_").unwrap_or(name);
    if name.ends_with("_home") {
        name.to_string()
    } else {
        format!("{name}_home")
    }
}
