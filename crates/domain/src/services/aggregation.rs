//! Ledger aggregation.
//!
//! Pure functions that fold participant rows into dashboard payloads. All
//! arithmetic is exact decimal; results are independent of input order apart
//! from the explicit sorts applied at the end.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use shared::money;

use crate::models::dashboard::{
    GameDigest, GroupBreakdownEntry, GroupDashboard, GroupSummary, PlayerStanding, UserDashboard,
    UserGameDigest, UserSummary,
};
use crate::models::game::GameType;

/// How many games the recent-games lists carry.
pub const RECENT_GAMES: usize = 10;

/// One participant row of a group's games, as fetched from the store.
#[derive(Debug, Clone)]
pub struct ParticipationRow {
    pub game_id: Uuid,
    pub game_date: DateTime<Utc>,
    pub game_type: GameType,
    /// Set for member participants.
    pub user_id: Option<Uuid>,
    /// The member's account name, or the guest name as entered.
    pub display_name: String,
    pub spent: Decimal,
    pub won: Decimal,
}

/// One of the user's own participant rows, across all their groups.
#[derive(Debug, Clone)]
pub struct UserParticipationRow {
    pub game_id: Uuid,
    pub group_id: Uuid,
    pub group_name: String,
    pub game_date: DateTime<Utc>,
    pub game_type: GameType,
    pub spent: Decimal,
    pub won: Decimal,
}

/// Key a row accumulates under. Guests sharing a name (case-insensitively)
/// merge into one line; that is the intended reading of recurring guests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PlayerKey {
    Member(Uuid),
    Guest(String),
}

#[derive(Debug)]
struct PlayerAcc {
    user_id: Option<Uuid>,
    name: String,
    games_played: u32,
    total_spent: Decimal,
    total_won: Decimal,
}

#[derive(Debug)]
struct GameAcc {
    date: DateTime<Utc>,
    game_type: GameType,
    player_count: u32,
    total_pot: Decimal,
}

/// Builds the group-scoped dashboard from participant rows.
///
/// Standings are sorted by net descending; ties keep first-seen order.
pub fn group_dashboard(rows: &[ParticipationRow]) -> GroupDashboard {
    let mut player_index: HashMap<PlayerKey, usize> = HashMap::new();
    let mut players: Vec<PlayerAcc> = Vec::new();
    let mut games: HashMap<Uuid, GameAcc> = HashMap::new();

    for row in rows {
        let key = match row.user_id {
            Some(user_id) => PlayerKey::Member(user_id),
            None => PlayerKey::Guest(row.display_name.to_lowercase()),
        };

        let index = *player_index.entry(key).or_insert_with(|| {
            players.push(PlayerAcc {
                user_id: row.user_id,
                name: row.display_name.clone(),
                games_played: 0,
                total_spent: Decimal::ZERO,
                total_won: Decimal::ZERO,
            });
            players.len() - 1
        });
        let player = &mut players[index];
        player.games_played += 1;
        player.total_spent += row.spent;
        player.total_won += row.won;

        let game = games.entry(row.game_id).or_insert(GameAcc {
            date: row.game_date,
            game_type: row.game_type,
            player_count: 0,
            total_pot: Decimal::ZERO,
        });
        game.player_count += 1;
        game.total_pot += row.spent;
    }

    let mut standings: Vec<PlayerStanding> = players
        .into_iter()
        .map(|p| PlayerStanding {
            user_id: p.user_id,
            is_guest: p.user_id.is_none(),
            net: money::net(p.total_won, p.total_spent),
            name: p.name,
            games_played: p.games_played,
            total_spent: p.total_spent,
            total_won: p.total_won,
        })
        .collect();
    standings.sort_by(|a, b| b.net.cmp(&a.net));

    let cash_games = games
        .values()
        .filter(|g| g.game_type == GameType::Cash)
        .count() as u32;
    let total_games = games.len() as u32;
    let total_spent = money::sum(rows.iter().map(|r| r.spent));
    let total_won = money::sum(rows.iter().map(|r| r.won));

    let mut recent: Vec<GameDigest> = games
        .into_iter()
        .map(|(id, g)| GameDigest {
            id,
            date: g.date,
            game_type: g.game_type,
            player_count: g.player_count,
            total_pot: g.total_pot,
        })
        .collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(RECENT_GAMES);

    GroupDashboard {
        summary: GroupSummary {
            total_games,
            cash_games,
            tournament_games: total_games - cash_games,
            total_spent,
            total_won,
            net: money::net(total_won, total_spent),
        },
        standings,
        recent_games: recent,
    }
}

/// Builds the user-scoped dashboard from the user's own participant rows.
pub fn user_dashboard(rows: &[UserParticipationRow]) -> UserDashboard {
    let mut group_index: HashMap<Uuid, usize> = HashMap::new();
    let mut groups: Vec<GroupBreakdownEntry> = Vec::new();

    for row in rows {
        let index = *group_index.entry(row.group_id).or_insert_with(|| {
            groups.push(GroupBreakdownEntry {
                group_id: row.group_id,
                group_name: row.group_name.clone(),
                games_played: 0,
                total_spent: Decimal::ZERO,
                total_won: Decimal::ZERO,
                net: Decimal::ZERO,
            });
            groups.len() - 1
        });
        let entry = &mut groups[index];
        entry.games_played += 1;
        entry.total_spent += row.spent;
        entry.total_won += row.won;
    }
    for entry in &mut groups {
        entry.net = money::net(entry.total_won, entry.total_spent);
    }
    groups.sort_by(|a, b| b.net.cmp(&a.net));

    let cash_games = rows
        .iter()
        .filter(|r| r.game_type == GameType::Cash)
        .count() as u32;
    let total_spent = money::sum(rows.iter().map(|r| r.spent));
    let total_won = money::sum(rows.iter().map(|r| r.won));

    let mut recent: Vec<UserGameDigest> = rows
        .iter()
        .map(|r| UserGameDigest {
            game_id: r.game_id,
            group_id: r.group_id,
            group_name: r.group_name.clone(),
            date: r.game_date,
            game_type: r.game_type,
            spent: r.spent,
            won: r.won,
            net: money::net(r.won, r.spent),
        })
        .collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(RECENT_GAMES);

    UserDashboard {
        summary: UserSummary {
            total_games: rows.len() as u32,
            cash_games,
            tournament_games: rows.len() as u32 - cash_games,
            total_spent,
            total_won,
            net: money::net(total_won, total_spent),
        },
        breakdown: groups,
        recent_games: recent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn member_row(
        game_id: Uuid,
        date: DateTime<Utc>,
        user_id: Uuid,
        name: &str,
        spent: &str,
        won: &str,
    ) -> ParticipationRow {
        ParticipationRow {
            game_id,
            game_date: date,
            game_type: GameType::Cash,
            user_id: Some(user_id),
            display_name: name.to_string(),
            spent: d(spent),
            won: d(won),
        }
    }

    fn guest_row(
        game_id: Uuid,
        date: DateTime<Utc>,
        name: &str,
        spent: &str,
        won: &str,
    ) -> ParticipationRow {
        ParticipationRow {
            game_id,
            game_date: date,
            game_type: GameType::Cash,
            user_id: None,
            display_name: name.to_string(),
            spent: d(spent),
            won: d(won),
        }
    }

    #[test]
    fn test_standings_sorted_by_net_descending() {
        let now = Utc::now();
        let (g1, g2) = (Uuid::new_v4(), Uuid::new_v4());
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        // A: spent 100 won 150 (+50); B: spent 80 won 60 (-20);
        // C: spent 50 won 20 (-30), split across two games
        let rows = vec![
            member_row(g1, now, a, "A", "60.00", "90.00"),
            member_row(g1, now, b, "B", "80.00", "60.00"),
            member_row(g1, now, c, "C", "20.00", "10.00"),
            member_row(g2, now, a, "A", "40.00", "60.00"),
            member_row(g2, now, c, "C", "30.00", "10.00"),
        ];

        let dashboard = group_dashboard(&rows);
        let nets: Vec<(&str, Decimal)> = dashboard
            .standings
            .iter()
            .map(|s| (s.name.as_str(), s.net))
            .collect();
        assert_eq!(
            nets,
            vec![("A", d("50.00")), ("B", d("-20.00")), ("C", d("-30.00"))]
        );
        assert_eq!(dashboard.standings[0].games_played, 2);
    }

    #[test]
    fn test_result_is_order_independent() {
        let now = Utc::now();
        let game = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut rows = vec![
            member_row(game, now, a, "A", "10.00", "30.00"),
            member_row(game, now, b, "B", "20.00", "0.00"),
        ];
        let forward = group_dashboard(&rows);
        rows.reverse();
        let backward = group_dashboard(&rows);

        assert_eq!(forward.summary.total_spent, backward.summary.total_spent);
        assert_eq!(forward.standings[0].net, backward.standings[0].net);
        assert_eq!(forward.standings[0].name, backward.standings[0].name);
    }

    #[test]
    fn test_guests_merge_case_insensitively() {
        let now = Utc::now();
        let (g1, g2) = (Uuid::new_v4(), Uuid::new_v4());
        let rows = vec![
            guest_row(g1, now, "Maria", "50.00", "0.00"),
            guest_row(g1, now, "X", "10.00", "60.00"),
            guest_row(g2, now, "maria", "20.00", "100.00"),
            guest_row(g2, now, "X", "30.00", "0.00"),
        ];

        let dashboard = group_dashboard(&rows);
        let maria = dashboard
            .standings
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case("maria"))
            .unwrap();
        assert!(maria.is_guest);
        assert_eq!(maria.games_played, 2);
        assert_eq!(maria.total_spent, d("70.00"));
        assert_eq!(maria.net, d("30.00"));
        assert_eq!(dashboard.standings.len(), 2);
    }

    #[test]
    fn test_summary_counts_and_totals() {
        let now = Utc::now();
        let (g1, g2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut rows = vec![
            guest_row(g1, now, "A", "100.00", "120.00"),
            guest_row(g1, now, "B", "100.00", "80.00"),
            guest_row(g2, now, "A", "50.00", "50.00"),
            guest_row(g2, now, "B", "50.00", "50.00"),
        ];
        rows[2].game_type = GameType::Tournament;
        rows[3].game_type = GameType::Tournament;

        let dashboard = group_dashboard(&rows);
        assert_eq!(dashboard.summary.total_games, 2);
        assert_eq!(dashboard.summary.cash_games, 1);
        assert_eq!(dashboard.summary.tournament_games, 1);
        assert_eq!(dashboard.summary.total_spent, d("300.00"));
        assert_eq!(dashboard.summary.total_won, d("300.00"));
        assert_eq!(dashboard.summary.net, d("0.00"));
    }

    #[test]
    fn test_recent_games_capped_and_newest_first() {
        let base = Utc::now();
        let rows: Vec<ParticipationRow> = (0..12)
            .map(|i| {
                guest_row(
                    Uuid::new_v4(),
                    base + Duration::days(i),
                    "A",
                    "10.00",
                    "10.00",
                )
            })
            .collect();

        let dashboard = group_dashboard(&rows);
        assert_eq!(dashboard.recent_games.len(), RECENT_GAMES);
        assert!(dashboard
            .recent_games
            .windows(2)
            .all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_empty_input_gives_empty_dashboard() {
        let dashboard = group_dashboard(&[]);
        assert_eq!(dashboard.summary.total_games, 0);
        assert_eq!(dashboard.summary.net, Decimal::ZERO);
        assert!(dashboard.standings.is_empty());
        assert!(dashboard.recent_games.is_empty());
    }

    fn user_row(
        group_id: Uuid,
        group_name: &str,
        date: DateTime<Utc>,
        spent: &str,
        won: &str,
    ) -> UserParticipationRow {
        UserParticipationRow {
            game_id: Uuid::new_v4(),
            group_id,
            group_name: group_name.to_string(),
            game_date: date,
            game_type: GameType::Cash,
            spent: d(spent),
            won: d(won),
        }
    }

    #[test]
    fn test_user_dashboard_breakdown_per_group() {
        let now = Utc::now();
        let (friday, office) = (Uuid::new_v4(), Uuid::new_v4());
        let rows = vec![
            user_row(friday, "Friday Night", now, "100.00", "160.00"),
            user_row(friday, "Friday Night", now, "50.00", "40.00"),
            user_row(office, "Office Game", now, "30.00", "10.00"),
        ];

        let dashboard = user_dashboard(&rows);
        assert_eq!(dashboard.summary.total_games, 3);
        assert_eq!(dashboard.summary.net, d("30.00"));
        assert_eq!(dashboard.breakdown.len(), 2);

        // Sorted by net descending: Friday +50 before Office -20
        assert_eq!(dashboard.breakdown[0].group_name, "Friday Night");
        assert_eq!(dashboard.breakdown[0].net, d("50.00"));
        assert_eq!(dashboard.breakdown[1].net, d("-20.00"));
    }

    #[test]
    fn test_user_recent_games_carry_personal_net() {
        let now = Utc::now();
        let group = Uuid::new_v4();
        let rows = vec![user_row(group, "G", now, "25.00", "100.00")];

        let dashboard = user_dashboard(&rows);
        assert_eq!(dashboard.recent_games.len(), 1);
        assert_eq!(dashboard.recent_games[0].net, d("75.00"));
    }
}
