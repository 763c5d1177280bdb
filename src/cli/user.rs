//! todo register

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

use super::{Context, Session};

#[derive(Serialize)]
struct RegisterOutput<'a> {
    username: &'a str,
}

pub fn run_register(session: &Session) -> Result<()> {
    let ctx = Context::load(&session.home())?;
    let (username, password) = session.credentials()?;

    if !ctx.users.register(username, password)? {
        return Err(Error::UserExists(username.trim().to_string()));
    }

    let username = username.trim();
    let mut human = HumanOutput::new("Registration successful");
    human.push_summary("User", username);
    human.push_next_step(format!(
        "todo add \"First task\" --due {} --user {username}",
        chrono::Local::now().format("%Y-%m-%d")
    ));

    emit_success(
        session.output,
        "register",
        &RegisterOutput { username },
        Some(&human),
    )
}
