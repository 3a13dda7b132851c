use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use logo::{
    Action, Client, ClientConfig, InterpreterState, LogoError, Store, parse_statement,
};
use logo_demos::{Demo, Group};
use serde_json::json;
use tracing::info;

use cli::*;

mod cli;
mod shell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logo::init_tracing("info");
    let config = cli.relay.config();
    match cli.command {
        LCommand::Shell { load } => {
            let store = match load {
                Some(path) => Store::with_script(logo::load(path)?),
                None => Store::new(),
            };
            shell::Shell::new(config, store).run().await?;
        }
        LCommand::Run { file, output } => {
            let code = std::fs::read_to_string(&file)?;
            output.print(&run(&code)?)?;
        }
        LCommand::Demo { name: None, .. } => list_demos(),
        LCommand::Demo {
            name: Some(name),
            output,
        } => {
            let demo = Demo::find(&name).ok_or(LogoError::UnknownDemo(name))?;
            info!(demo = demo.name, "running demo");
            output.print(&run(demo.code)?)?;
        }
        LCommand::Watch { url } => watch(config, url).await?,
    }
    Ok(())
}

/// Submit `code` one line at a time, stopping at the first error.
fn run(code: &str) -> anyhow::Result<InterpreterState> {
    let mut state = InterpreterState::default();
    for line in code.split_inclusive('\n') {
        let at = state.next_line();
        state = parse_statement(&state, line);
        if let Some(err) = &state.error {
            bail!("line {at}: {}", err.description);
        }
    }
    if state.is_incomplete() {
        bail!("script ends inside an unfinished statement");
    }
    Ok(state)
}

impl Output {
    fn print(&self, state: &InterpreterState) -> anyhow::Result<()> {
        if self.json {
            let out = json!({
                "name": state.name,
                "drawCommands": state.draw_commands,
                "turtle": state.turtle,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            for cmd in &state.draw_commands {
                println!("{cmd}");
            }
            shell::print_turtle(state);
        }
        Ok(())
    }
}

fn list_demos() {
    for group in Group::all() {
        println!("{group}:");
        for demo in group.demos() {
            println!("  {:<8} - {}", demo.name, demo.summary.trim());
        }
    }
}

async fn watch(config: ClientConfig, url: String) -> anyhow::Result<()> {
    let connector = Arc::new(config.connector());
    let (mut client, mut inbox) = Client::new(config, connector);
    let mut printed = 0;
    client.dispatch(Action::TryStartWatching { url });
    if !client.is_watching() {
        bail!("not a sharing link");
    }
    while let Some(event) = inbox.recv().await {
        let actions = client.process(event);
        printed = shell::report(&client, &actions, printed);
        if !client.is_watching() {
            break;
        }
    }
    Ok(())
}
