//! tryout CLI - Web-app project scaffolding from feature toggles

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use webgen_core::tui::CreateArgs;

#[derive(Parser, Debug)]
#[command(name = "tryout")]
#[command(about = "CLI for scaffolding tryout web-app projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new tryout project
    Create(CliCreateArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Project display name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Include the RequireJS module loader (prompted when omitted)
    #[arg(long = "module-loader")]
    pub module_loader: Option<bool>,

    /// Include the Foundation CSS framework (prompted when omitted)
    #[arg(long)]
    pub styling: Option<bool>,

    /// Include the Marionette view library (prompted when omitted)
    #[arg(long = "view-library")]
    pub view_library: Option<bool>,

    /// Skip npm/bower installation after generation
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            directory: args.directory,
            name: args.name,
            module_loader: args.module_loader,
            styling: args.styling,
            view_library: args.view_library,
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args.into(),
        // No subcommand provided, default to create behavior (interactive mode)
        None => CreateArgs::default(),
    };

    let result = webgen_core::tui::run(create_args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
