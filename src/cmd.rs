use anyhow::anyhow;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use log::info;

use crate::api_client::LichessClient;
use crate::client::Client;
use crate::top_players::TopPlayers;
use crate::types::{boards_from_value, Board, Category, ProfileSummary, TournamentSummary};

const MISSING: &str = "—";

#[derive(Parser, Debug)]
#[command(version, about = "Browse Lichess profiles, leaderboards and tournaments")]
pub struct Args {
    /// API root, overrides LICHESS_API_BASE
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print the JSON as received instead of a table
    #[arg(long, global = true)]
    pub raw: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    Profile {
        username: String,
    },
    Leaderboards {
        /// Players shown per board
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    Tournaments,
}

fn rating(rating: Option<u64>) -> String {
    rating.map_or_else(|| MISSING.to_string(), |r| r.to_string())
}

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

fn render_profile(profile: &ProfileSummary) -> String {
    let mut lines = vec![match &profile.title {
        Some(title) => format!("{} {}", title, profile.username),
        None => profile.username.clone(),
    }];
    if let Some(country) = &profile.country {
        lines.push(format!("Country: {country}"));
    }
    lines.push(format!(
        "Bio: {}",
        profile.bio.as_deref().unwrap_or("No bio available.")
    ));
    lines.push(format!("Games: {}", rating(profile.games)));
    for category in Category::ALL {
        let perf = profile.perf(category);
        lines.push(format!(
            "{}: {} ({} games)",
            category.label(),
            rating(perf.rating),
            perf.games
        ));
    }
    lines.push(profile.link());
    lines.join("\n")
}

fn render_boards(boards: Vec<Board>, top: usize) -> String {
    if boards.iter().all(|b| b.players.is_empty()) {
        return "No leaderboard data.".to_string();
    }
    let mut lines = Vec::new();
    for board in boards {
        lines.push(format!("== {} ==", board.name));
        lines.push("Player | Blitz | Rapid | Classical".to_string());
        for player in TopPlayers::for_board(board, top) {
            let name = match &player.title {
                Some(title) => format!("{title} {}", player.username),
                None => player.username.clone(),
            };
            lines.push(format!(
                " {} | {} | {} | {}",
                name,
                rating(player.blitz),
                rating(player.rapid),
                rating(player.classical)
            ));
        }
    }
    lines.join("\n")
}

fn starts_at(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn render_tournaments(tournaments: &[TournamentSummary]) -> String {
    if tournaments.is_empty() {
        return "No ongoing tournaments found.".to_string();
    }
    let mut lines = vec!["Name | Type | Players | Started | Status".to_string()];
    for t in tournaments {
        lines.push(format!(
            " {} | {} | {} | {} | {}",
            t.name,
            or_missing(t.kind.as_deref()),
            rating(t.players),
            starts_at(t.starts_at),
            or_missing(t.status.as_deref())
        ));
        if let Some(url) = &t.url {
            lines.push(format!("   {url}"));
        }
    }
    lines.join("\n")
}

impl Cmd {
    pub async fn output(self, client: &dyn Client, raw: bool) -> anyhow::Result<String> {
        let value = match &self {
            Cmd::Profile { username } => client.get_user_profile(username).await?,
            Cmd::Leaderboards { .. } => client.get_leaderboards().await?,
            Cmd::Tournaments => client.get_tournaments().await?,
        };
        if raw {
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        Ok(match self {
            Cmd::Profile { .. } => {
                let profile = ProfileSummary::from_value(&value)
                    .ok_or_else(|| anyhow!("profile response has no username"))?;
                render_profile(&profile)
            }
            Cmd::Leaderboards { top } => render_boards(boards_from_value(&value), top),
            Cmd::Tournaments => render_tournaments(&TournamentSummary::list_from_value(&value)),
        })
    }
}

impl Args {
    /// Only the command's output goes to stdout, so `--raw` stays pipeable.
    pub async fn execute(self, client: &dyn Client) -> anyhow::Result<String> {
        info!("fetching from lichess...");
        self.cmd.output(client, self.raw).await
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let client = match &self.base_url {
            Some(url) => LichessClient::new(url)?,
            None => LichessClient::from_env()?,
        };

        let output = self.execute(&client).await?;
        println!("{output}");
        Ok(())
    }
}
