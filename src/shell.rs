use std::{io::Write as _, sync::Arc};

use logo::{
    Action, Client, ClientConfig, Inbox, InterpreterState, Store, functions::Command, tokens,
};
use tokio::io::{AsyncBufReadExt as _, BufReader};

const SHELL_HELP: &str = "available commands:
  /undo          - revert the last statement
  /redo          - restore a reverted statement
  /reset         - start over with an empty script
  /name <name>   - rename the script
  /save <file>   - save the script
  /load <file>   - load a saved script
  /share [reset] - share this script, optionally starting empty
  /unshare       - stop sharing
  /watch <link>  - follow a shared script
  /unwatch       - stop following
  /pos           - current position
  /history       - accepted source, by line
  /help          - this help
  /quit          - exit shell";

const COMMANDS: &[&str] = &[
    "undo", "redo", "reset", "name", "save", "load", "share", "unshare", "watch", "unwatch",
    "pos", "history", "help", "quit",
];

/// Complete an abbreviated shell command, `/un` becomes `/undo`.
fn extend_str<'i>(inp: &'i str, words: &'i [&'_ str]) -> &'i str {
    for word in words {
        if word.starts_with(inp) {
            return word;
        }
    }
    inp
}

pub struct Shell {
    client: Client,
    inbox: Inbox,
    /// number of draw commands already printed
    printed: usize,
}

impl Shell {
    pub fn new(config: ClientConfig, store: Store) -> Self {
        let connector = Arc::new(config.connector());
        let (client, inbox) = Client::new(config, connector);
        let printed = store.present().draw_commands.len();
        Self {
            client: client.with_store(store),
            inbox,
            printed,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        println!("logo shell v{}", env!("CARGO_PKG_VERSION"));
        println!("enter '/help' to view available commands");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.prompt()?;
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if !self.handle_line(&line) {
                        break;
                    }
                    self.prompt()?;
                }
                Some(event) = self.inbox.recv() => {
                    let actions = self.client.process(event);
                    self.printed = report(&self.client, &actions, self.printed);
                }
            }
        }
        self.dispatch(Action::StopSharing);
        self.dispatch(Action::StopWatching);
        Ok(())
    }

    fn prompt(&self) -> std::io::Result<()> {
        let prompt = if self.client.present().is_incomplete() {
            ". "
        } else {
            "> "
        };
        print!("{prompt}");
        std::io::stdout().flush()
    }

    fn dispatch(&mut self, action: Action) {
        let actions = self.client.dispatch(action);
        self.printed = report(&self.client, &actions, self.printed);
    }

    /// Returns `false` once the user wants to leave.
    fn handle_line(&mut self, line: &str) -> bool {
        let Some(cmd) = line.trim().strip_prefix('/') else {
            if self.client.is_watching() {
                eprintln!("read-only while watching, use /unwatch first");
            } else {
                self.dispatch(Action::submit(format!("{line}\n")));
            }
            return true;
        };
        let (cmd, arg) = cmd.split_once(' ').unwrap_or((cmd, ""));
        let arg = arg.trim();
        match extend_str(cmd, COMMANDS) {
            "undo" => self.dispatch(Action::Undo),
            "redo" => self.dispatch(Action::Redo),
            "reset" => self.dispatch(Action::Reset),
            "name" if !arg.is_empty() => self.dispatch(Action::SubmitScriptName {
                text: arg.to_string(),
            }),
            "save" if !arg.is_empty() => match logo::save(self.client.present(), arg) {
                Ok(()) => println!("saved to {arg}"),
                Err(why) => eprintln!("{why}"),
            },
            "load" if !arg.is_empty() => match logo::load(arg) {
                Ok(state) => self.load(state),
                Err(why) => eprintln!("{why}"),
            },
            "share" => self.dispatch(Action::StartSharing {
                reset: arg == "reset",
            }),
            "unshare" => self.dispatch(Action::StopSharing),
            "watch" if !arg.is_empty() => self.dispatch(Action::TryStartWatching {
                url: arg.to_string(),
            }),
            "unwatch" => self.dispatch(Action::StopWatching),
            "pos" => print_turtle(self.client.present()),
            "history" => {
                for (line, text) in tokens::lines(&self.client.present().parsed_tokens) {
                    print!("{line:>4} | {text}");
                }
                println!();
            }
            "help" | "?" => {
                println!("{SHELL_HELP}");
                print_commands();
            }
            "quit" => return false,
            "name" | "save" | "load" | "watch" => eprintln!("/{cmd} needs an argument"),
            other => eprintln!("unknown command /{other}"),
        }
        true
    }

    fn load(&mut self, state: InterpreterState) {
        self.dispatch(Action::Reset);
        let name = state.name.clone();
        for text in tokens::submissions(&state.parsed_tokens) {
            self.dispatch(Action::SubmitEditLine { text });
        }
        self.dispatch(Action::SubmitScriptName { text: name });
    }
}

fn print_commands() {
    println!("language commands:");
    for cmd in Command::ALL {
        let params: Vec<_> = cmd.parameters().iter().map(|p| format!("<{p}>")).collect();
        let usage = format!("{} {}", cmd.names().join("|"), params.join(" "));
        println!("  {:<22} - {}", usage.trim_end(), cmd.summary());
    }
}

pub fn print_turtle(state: &InterpreterState) {
    let turtle = &state.turtle;
    let pen = if turtle.pen_down { "down" } else { "up" };
    println!(
        "turtle is at {:.3},{:.3} and looking in direction {:.1}, pen {pen}",
        turtle.x, turtle.y, turtle.angle
    );
}

/// Print what `actions` did to the client, returning the new number of
/// printed draw commands.
pub fn report(client: &Client, actions: &[Action], printed: usize) -> usize {
    let state = client.present();
    for action in actions {
        match action {
            Action::StartedSharing { url } => println!("sharing at {url}"),
            Action::StoppedSharing => println!("sharing stopped"),
            Action::StartedWatching => println!("watching"),
            Action::StoppedWatching => println!("stopped watching"),
            Action::SubmitEditLine { .. } => {
                if let Some(err) = &state.error {
                    eprintln!("{}", err.description);
                }
            }
            _ => {}
        }
    }
    let drawn = &state.draw_commands;
    if drawn.len() < printed {
        println!("drawing rewound to {} commands", drawn.len());
    }
    for cmd in drawn.iter().skip(printed) {
        println!("{cmd}");
    }
    drawn.len()
}
