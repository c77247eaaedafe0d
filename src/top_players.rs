use std::cmp::Reverse;

use crate::types::{Board, Category, PlayerSummary};

pub struct TopPlayers(Vec<PlayerSummary>);

impl TopPlayers {
    pub fn new(players: Vec<PlayerSummary>) -> Self {
        Self(players)
    }

    /// Highest rated first. Unrated players sink to the bottom and ties keep
    /// the order the remote listed them in.
    pub fn by_rating(mut self, category: Category, n: usize) -> impl Iterator<Item = PlayerSummary> {
        self.0.sort_by_key(|p| Reverse(p.rating(category)));
        self.0.into_iter().take(n)
    }

    /// Boards named after a known category are ranked in it; anything else
    /// (e.g. `bullet` from the generic endpoint) keeps the remote order.
    pub fn for_board(board: Board, n: usize) -> Vec<PlayerSummary> {
        match board.name.parse::<Category>() {
            Ok(category) => Self::new(board.players).by_rating(category, n).collect(),
            Err(_) => board.players.into_iter().take(n).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn player(username: &str, blitz: Option<u64>) -> PlayerSummary {
        PlayerSummary {
            username: username.into(),
            title: None,
            blitz,
            rapid: None,
            classical: None,
        }
    }

    #[test]
    fn test_by_rating_sorts_descending_with_unrated_last() {
        let top = TopPlayers::new(vec![
            player("low", Some(2000)),
            player("none", None),
            player("high", Some(3000)),
            player("mid", Some(2500)),
        ]);
        let names: Vec<_> = top
            .by_rating(Category::Blitz, 3)
            .map(|p| p.username)
            .collect();
        assert_eq!(names, ["high", "mid", "low"]);
    }

    #[test]
    fn test_unknown_board_keeps_remote_order() {
        let board = Board {
            name: "bullet".into(),
            players: vec![player("first", Some(1)), player("second", Some(2))],
        };
        let names: Vec<_> = TopPlayers::for_board(board, 10)
            .into_iter()
            .map(|p| p.username)
            .collect();
        assert_eq!(names, ["first", "second"]);
    }
}
