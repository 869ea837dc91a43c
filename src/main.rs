use clap::Parser;

mod cli;
mod commands;
mod domain;
mod services;
mod trace;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    commands::handle_runtime_commands(&cli)
}
