//! todo config show / init

use serde::Serialize;

use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

use super::{Context, Session};

#[derive(Serialize)]
struct ConfigShowOutput<'a> {
    home: String,
    tasks_file: String,
    users_file: String,
    config: &'a Config,
}

#[derive(Serialize)]
struct ConfigInitOutput {
    path: String,
}

pub fn run_show(session: &Session) -> Result<()> {
    let ctx = Context::load(&session.home())?;

    let output = ConfigShowOutput {
        home: ctx.home.display().to_string(),
        tasks_file: ctx.tasks.store().path().display().to_string(),
        users_file: ctx.users.path().display().to_string(),
        config: &ctx.config,
    };

    let mut human = HumanOutput::new("Configuration");
    human.push_summary("Home", output.home.as_str());
    human.push_summary("Tasks file", output.tasks_file.as_str());
    human.push_summary("Users file", output.users_file.as_str());
    human.push_summary(
        "Lock timeout",
        format!("{}ms", ctx.config.storage.lock_timeout_ms),
    );
    human.push_summary("Default sort", ctx.config.query.default_sort.as_str());

    emit_success(session.output, "config show", &output, Some(&human))
}

pub fn run_init(session: &Session, force: bool) -> Result<()> {
    let home = session.home();
    let path = home.join(CONFIG_FILE);
    if path.exists() && !force {
        return Err(Error::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    std::fs::create_dir_all(&home)?;
    Config::default().save(&path)?;

    let mut human = HumanOutput::new("Config written");
    human.push_summary("Path", path.display().to_string());

    emit_success(
        session.output,
        "config init",
        &ConfigInitOutput {
            path: path.display().to_string(),
        },
        Some(&human),
    )
}
