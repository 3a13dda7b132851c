use clap::{Args, Parser, Subcommand};
use logo::{
    ClientConfig,
    client::{DEFAULT_RELAY, DEFAULT_SHARE_BASE},
};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(flatten)]
    pub relay: RelayOpt,
    #[command(subcommand)]
    pub command: LCommand,
}

#[derive(Subcommand)]
pub enum LCommand {
    /// Start interactive logo shell
    Shell {
        /// script saved with /save to start from
        #[arg(short, long)]
        load: Option<String>,
    },
    /// Run a script file line by line
    Run {
        /// logo source file
        file: String,
        #[command(flatten)]
        output: Output,
    },
    /// Run one of the bundled demo scripts
    Demo {
        /// the demo to run, lists all demos if omitted
        name: Option<String>,
        #[command(flatten)]
        output: Output,
    },
    /// Follow a shared session
    Watch {
        /// sharing link or bare session id
        url: String,
    },
}

#[derive(Args)]
#[group()]
pub struct RelayOpt {
    /// relay endpoint for sharing and watching
    #[arg(long, global = true, default_value = DEFAULT_RELAY)]
    pub relay: String,
    /// base of the links handed out to observers
    #[arg(long, global = true, default_value = DEFAULT_SHARE_BASE)]
    pub share_base: String,
}

impl RelayOpt {
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new()
            .relay(&self.relay)
            .share_base(&self.share_base)
    }
}

#[derive(Args)]
#[group()]
pub struct Output {
    /// print the final drawing log and turtle as JSON
    #[arg(short, long)]
    pub json: bool,
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn relay_options_reach_config() {
        let cli = Cli::parse_from(["logo", "--relay", "ws://relay.test/share", "demo"]);
        assert_eq!(cli.relay.config().relay_url(), "ws://relay.test/share");
        let cli = Cli::parse_from(["logo", "watch", "abc"]);
        assert_eq!(cli.relay.config(), ClientConfig::new());
    }
}
