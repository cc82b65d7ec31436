//! Users table demo.
//!
//! ```text
//! cargo run -- [users.json] [table.toml]
//! RUST_LOG=debug cargo run 2> table.log
//! ```

use anyhow::Context;
use bubbletea_rs::{Cmd, KeyMsg, Model, Msg, Program};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use users_table::prelude::*;

const DEFAULT_USERS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/users.json");

struct Settings {
    users_path: PathBuf,
    config: PresenterConfig,
}

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Delivered when the users file cannot be read or parsed.
#[derive(Debug)]
struct LoadFailedMsg(String);

fn load_users(path: PathBuf) -> Cmd {
    Box::pin(async move {
        // Long enough to see the loading indicator.
        tokio::time::sleep(std::time::Duration::from_millis(600)).await;
        let loaded = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))
            .and_then(|text| {
                serde_json::from_str::<Vec<UserRecord>>(&text)
                    .with_context(|| format!("parsing {}", path.display()))
            });
        match loaded {
            Ok(users) => Some(Box::new(UsersLoadedMsg(users)) as Msg),
            Err(err) => {
                log::error!("{err:#}");
                Some(Box::new(LoadFailedMsg(format!("{err:#}"))) as Msg)
            }
        }
    })
}

struct App {
    table: UsersTable,
    status: String,
}

impl Model for App {
    fn init() -> (Self, Option<Cmd>) {
        let (users_path, config) = match SETTINGS.get() {
            Some(settings) => (settings.users_path.clone(), settings.config),
            None => (PathBuf::from(DEFAULT_USERS), PresenterConfig::default()),
        };

        let mut table = UsersTable::with_config(Vec::new(), &config);
        let mut cmds = vec![load_users(users_path)];
        cmds.extend(table.set_loading(true));

        let app = App {
            table,
            status: String::new(),
        };
        (app, Some(bubbletea_rs::batch(cmds)))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(view) = msg.downcast_ref::<ViewUserMsg>() {
            self.status = format!("Would open {} (user {})", view.path, view.id);
            return None;
        }
        if let Some(LoadFailedMsg(reason)) = msg.downcast_ref::<LoadFailedMsg>() {
            self.status = format!("Could not load users: {reason}");
            self.table.set_loading(false);
            return None;
        }
        if msg.downcast_ref::<KeyMsg>().is_some() {
            self.status.clear();
        }
        self.table.update(msg)
    }

    fn view(&self) -> String {
        let mut out = format!("\n{}\n", self.table.view());
        if !self.status.is_empty() {
            out.push_str(&format!("\n  {}\n", self.status));
        }
        out
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The terminal belongs to the UI, so only log when asked to.
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::Builder::from_env(env_logger::Env::default()).init();
    }

    let mut args = std::env::args().skip(1);
    let users_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_USERS));
    let config = match args.next() {
        Some(path) => PresenterConfig::load(&path)
            .with_context(|| format!("loading table configuration from {path}"))?,
        None => PresenterConfig::default(),
    };
    log::info!("users from {}", users_path.display());

    if SETTINGS.set(Settings { users_path, config }).is_err() {
        anyhow::bail!("settings already initialised");
    }

    Program::<App>::builder()
        .alt_screen(true)
        .build()?
        .run()
        .await?;
    Ok(())
}
