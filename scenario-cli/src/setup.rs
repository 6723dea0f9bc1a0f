use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use anyhow::Context;
use env_logger::{Builder, Target};
use scenario_core::config::SystemConfig;
use crate::config_gen;

pub const CONFIG_PATH: &str = "config.toml";

pub fn init() -> anyhow::Result<()> {
    config_gen::ensure_config_exists(CONFIG_PATH);

    if let Err(e) = scenario_shared::config::init(CONFIG_PATH) {
        eprintln!("Config load warning: {}", e);
    }

    init_logger()
}

fn init_logger() -> anyhow::Result<()> {
    let sys_cfg: SystemConfig = scenario_shared::config::get("system");
    if let Err(e) = fs::create_dir_all(&sys_cfg.log_path) {
        eprintln!("Failed to create log dir: {}", e);
    }

    let log_file_path = Path::new(&sys_cfg.log_path).join("scenario.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .with_context(|| format!("Failed to open log file {:?}", log_file_path))?;

    struct TeeWriter<W1, W2>(W1, W2);
    impl<W1: Write, W2: Write> Write for TeeWriter<W1, W2> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = self.0.write(buf)?;
            self.1.write_all(&buf[..n])?;
            Ok(n)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            self.0.flush()?;
            self.1.flush()?;
            Ok(())
        }
    }

    // stdout carries --json output, so logs go to stderr
    Builder::from_env(env_logger::Env::default().default_filter_or(&sys_cfg.log_level))
        .target(Target::Pipe(Box::new(TeeWriter(std::io::stderr(), log_file))))
        .init();
    Ok(())
}
