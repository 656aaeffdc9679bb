use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use onboard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Company Onboarding",
    about = "Run the company onboarding approval service or walk through a demo",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Drive one company from profile to completion against in-memory stores
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["onboard-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn demo_accepts_its_flags() {
        let cli = Cli::try_parse_from([
            "onboard-api",
            "demo",
            "--company-name",
            "Globex",
            "--actor",
            "ops@globex.io",
            "--onboarding-date",
            "2025-04-01",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Demo(args)) => {
                assert_eq!(args.company_name, "Globex");
                assert_eq!(args.actor.as_deref(), Some("ops@globex.io"));
                assert!(args.onboarding_date.is_some());
            }
            other => panic!("expected demo command, got {other:?}"),
        }
    }

    #[test]
    fn serve_overrides_parse() {
        let cli = Cli::try_parse_from(["onboard-api", "serve", "--port", "8081"]).expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(8081)),
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}
