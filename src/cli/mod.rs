pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(about = "Gradebook CLI - serve, initialize and seed the grade record service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the API server")]
    Serve,

    #[command(about = "Apply the database schema")]
    Init,

    #[command(about = "Seed demo students, subjects and grades")]
    Seed,

    #[command(about = "Mint a development bearer token")]
    Token {
        #[arg(help = "Principal email the token is issued for")]
        subject: String,

        #[arg(long, default_value = "student", help = "Role: admin or student")]
        role: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve => commands::serve::handle().await,
        Commands::Init => commands::init::handle().await,
        Commands::Seed => commands::seed::handle().await,
        Commands::Token { subject, role } => commands::token::handle(subject, role),
    }
}
