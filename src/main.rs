use std::io::Write;

use clap::Parser;
use dotenv::dotenv;
use env_logger::{Builder, Env};

mod api_client;
mod client;
mod cmd;
mod error;
mod response;
mod top_players;
mod types;

use cmd::Args;

fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logger();

    Args::parse().run().await
}
