mod setup;
mod config_gen;

use std::env;
use anyhow::Context;
use scenario_core::config::{ScannerConfig, SystemConfig, TranslateConfig};
use scenario_core::{Scanner, StoryManager, Timeline};

struct Args {
    story: Option<String>,
    json: bool,
    language: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args { story: None, json: false, language: None };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--lang" => {
                args.language = Some(iter.next().context("--lang needs a value")?);
            }
            other if other.starts_with("--") => anyhow::bail!("Unknown flag '{}'", other),
            other => args.story = Some(other.to_string()),
        }
    }
    Ok(args)
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    setup::init()?;
    log::info!(">>> Scenario CLI Started <<<");

    if let Some(language) = &args.language {
        let mut translate_cfg: TranslateConfig = scenario_shared::config::get("translate");
        translate_cfg.language = language.clone();
        scenario_shared::config::set("translate", &translate_cfg)?;
    }

    let sys_cfg: SystemConfig = scenario_shared::config::get("system");
    let translate_cfg: TranslateConfig = scenario_shared::config::get("translate");
    let scanner_cfg: ScannerConfig = scenario_shared::config::get("scanner");

    let mut manager = StoryManager::new();
    manager.load_tables(&sys_cfg.data_path)?;
    manager.load_project(&sys_cfg.story_path)?;

    let Some(name) = args.story else {
        for name in manager.story_names() {
            println!("{}", name);
        }
        return Ok(());
    };

    let settings = translate_cfg.to_settings();
    let story = manager.translate(&name, &settings)?;
    log::info!(
        "Translated '{}': {} units, {} live2d configs, {} skipped lines",
        name,
        story.units.len(),
        story.l2d_configs.len(),
        story.diagnostics.len()
    );

    if args.json {
        let out = serde_json::to_string_pretty(&story).context("Failed to serialize story")?;
        println!("{}", out);
    }

    let timeline = Timeline::new(story.units);
    if !timeline.is_empty() {
        let preload = Scanner::scan(timeline.units(), timeline.index(), scanner_cfg.preload_ahead);
        log::info!(
            "Initial preload: {} images, {} spines, {} audios",
            preload.images.len(),
            preload.spines.len(),
            preload.audios.len()
        );
    }
    Ok(())
}
