use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SITE_URL: &str = "https://lichess.org";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Blitz,
    Rapid,
    Classical,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Blitz, Category::Rapid, Category::Classical];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Blitz => "blitz",
            Category::Rapid => "rapid",
            Category::Classical => "classical",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Blitz => "Blitz",
            Category::Rapid => "Rapid",
            Category::Classical => "Classical",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category {s}"))
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| str_field(value, key))
        .map(str::to_owned)
}

fn perf_field(perfs: Option<&Value>, category: Category, field: &str) -> Option<u64> {
    perfs?.get(category.as_str())?.get(field)?.as_u64()
}

/// A leaderboard entry. The remote has returned players both with their
/// perfs inline and wrapped in a `user` object, so every field is resolved
/// through a fixed precedence list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub username: String,
    pub title: Option<String>,
    pub blitz: Option<u64>,
    pub rapid: Option<u64>,
    pub classical: Option<u64>,
}

impl PlayerSummary {
    /// username: `username`, `name`, `id`. title: `title`, `user.title`.
    /// rating: `perfs.<cat>.rating`, `user.perfs.<cat>.rating`, flat `rating`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let username = first_str(value, &["username", "name", "id"])?;
        let title = first_str(value, &["title"])
            .or_else(|| value.get("user").and_then(|u| first_str(u, &["title"])));
        let perfs = value
            .get("perfs")
            .or_else(|| value.get("user").and_then(|u| u.get("perfs")));
        let flat = value.get("rating").and_then(Value::as_u64);
        let rating = |category| perf_field(perfs, category, "rating").or(flat);

        Some(Self {
            username,
            title,
            blitz: rating(Category::Blitz),
            rapid: rating(Category::Rapid),
            classical: rating(Category::Classical),
        })
    }

    pub fn rating(&self, category: Category) -> Option<u64> {
        match category {
            Category::Blitz => self.blitz,
            Category::Rapid => self.rapid,
            Category::Classical => self.classical,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    pub players: Vec<PlayerSummary>,
}

/// Name given to a leaderboard that arrives as a bare player list.
pub const TOP_BOARD: &str = "top";

fn players_from_value(list: &Value) -> Vec<PlayerSummary> {
    list.as_array()
        .or_else(|| {
            ["players", "users"]
                .iter()
                .find_map(|key| list.get(key).and_then(Value::as_array))
        })
        .map(|arr| arr.iter().filter_map(PlayerSummary::from_value).collect())
        .unwrap_or_default()
}

/// Each key of the leaderboard mapping becomes a board. A board's value is
/// the player list itself, or an object holding it under `players`, else
/// `users`. A bare list at the top level is a single board named `top`.
pub fn boards_from_value(value: &Value) -> Vec<Board> {
    if value.is_array() {
        return vec![Board {
            name: TOP_BOARD.to_string(),
            players: players_from_value(value),
        }];
    }
    let Some(map) = value.as_object() else {
        return Vec::new();
    };
    map.iter()
        .map(|(name, list)| Board {
            name: name.clone(),
            players: players_from_value(list),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfStat {
    pub rating: Option<u64>,
    pub games: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub username: String,
    pub title: Option<String>,
    pub country: Option<String>,
    pub bio: Option<String>,
    pub games: Option<u64>,
    pub blitz: PerfStat,
    pub rapid: PerfStat,
    pub classical: PerfStat,
}

impl ProfileSummary {
    pub fn from_value(value: &Value) -> Option<Self> {
        let username = first_str(value, &["username", "id"])?;
        let profile = value.get("profile");
        let perfs = value.get("perfs");
        let perf = |category| PerfStat {
            rating: perf_field(perfs, category, "rating"),
            games: perf_field(perfs, category, "games").unwrap_or(0),
        };

        Some(Self {
            title: first_str(value, &["title"]),
            country: profile.and_then(|p| first_str(p, &["country", "flag"])),
            bio: first_str(value, &["bio"]).or_else(|| profile.and_then(|p| first_str(p, &["bio"]))),
            games: value
                .pointer("/count/all")
                .or_else(|| value.pointer("/count/games"))
                .or_else(|| value.get("playedGames"))
                .and_then(Value::as_u64)
                .filter(|n| *n > 0),
            blitz: perf(Category::Blitz),
            rapid: perf(Category::Rapid),
            classical: perf(Category::Classical),
            username,
        })
    }

    pub fn perf(&self, category: Category) -> &PerfStat {
        match category {
            Category::Blitz => &self.blitz,
            Category::Rapid => &self.rapid,
            Category::Classical => &self.classical,
        }
    }

    pub fn link(&self) -> String {
        format!("{SITE_URL}/@/{}", self.username)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: String,
    pub name: String,
    pub kind: Option<String>,
    pub players: Option<u64>,
    pub starts_at: Option<i64>,
    pub status: Option<String>,
    pub url: Option<String>,
}

impl TournamentSummary {
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = first_str(value, &["id"])?;
        let status = value.get("status").or_else(|| value.get("state")).and_then(|s| match s {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Some(Self {
            name: first_str(value, &["fullName", "name"]).unwrap_or_else(|| id.clone()),
            kind: first_str(value, &["system"])
                .or_else(|| value.get("variant").and_then(|v| first_str(v, &["name"]))),
            players: value.get("nbPlayers").and_then(Value::as_u64),
            starts_at: value.get("startsAt").and_then(Value::as_i64),
            url: first_str(value, &["url"]),
            status,
            id,
        })
    }

    /// Ongoing tournaments: the `ongoing` list, else `started`.
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        ["ongoing", "started"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_array))
            .map(|arr| arr.iter().filter_map(Self::from_value).collect())
            .unwrap_or_default()
    }
}
