// ABOUTME: login/logout/whoami command handlers
// ABOUTME: The only commands that mutate session state

use anyhow::Context as _;
use serde_json::json;
use tokio::io::AsyncReadExt as _;

use super::CommandEnv;
use crate::output::write_payload;

pub async fn login(env: &CommandEnv, password_stdin: bool, return_path: &str) -> anyhow::Result<()> {
    let client = env.client().await;
    let stdin_password = if password_stdin {
        Some(read_password_from_stdin().await?)
    } else {
        None
    };

    let outcome = client
        .login(
            env.settings.username.as_deref(),
            stdin_password.as_deref().or(env.settings.password.as_deref()),
            return_path,
        )
        .await?;

    let payload = serde_json::to_value(&outcome).context("serializing login outcome")?;
    write_payload(&payload, &env.render, None).await
}

pub async fn logout(env: &CommandEnv) -> anyhow::Result<()> {
    let client = env.client().await;
    client.clear_session().await?;
    write_payload(
        &json!({ "ok": true, "message": "Session cleared." }),
        &env.render,
        None,
    )
    .await
}

pub async fn whoami(env: &CommandEnv) -> anyhow::Result<()> {
    let client = env.client().await;
    let info = client.get_member_info().await?;
    let payload = serde_json::to_value(&info).context("serializing member info")?;
    write_payload(&payload, &env.render, None).await
}

async fn read_password_from_stdin() -> anyhow::Result<String> {
    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("reading password from stdin")?;
    Ok(raw.trim().to_owned())
}
