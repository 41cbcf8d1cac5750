use super::{Category, DifficultyTier};

/// Built-in categories covering outcome, market, scoring, situational, and
/// player-prop groups.
pub fn default_categories() -> Vec<Category> {
    use DifficultyTier::*;

    vec![
        // --- Game outcome ---
        Category::categorical("winner", "game_outcome", &["home", "away"], Easy)
            .with_scoring_weight(2.0),
        Category::percentage("home_win_probability", "game_outcome", Moderate)
            .with_scoring_weight(1.5),
        Category::categorical("overtime", "game_outcome", &["yes", "no"], Hard),
        Category::categorical(
            "margin_bucket",
            "game_outcome",
            &["1-3", "4-7", "8-14", "15+"],
            Expert,
        ),
        // --- Betting market ---
        Category::categorical("against_the_spread", "betting_market", &["home", "away", "push"], Moderate)
            .with_scoring_weight(1.5),
        Category::categorical("total_over_under", "betting_market", &["over", "under", "push"], Moderate)
            .with_scoring_weight(1.5),
        Category::percentage("cover_probability", "betting_market", Hard),
        // --- Scoring ---
        Category::numeric("total_points", "scoring", 0.0, 150.0, Moderate),
        Category::numeric("home_score", "scoring", 0.0, 90.0, Hard),
        Category::numeric("away_score", "scoring", 0.0, 90.0, Hard),
        Category::numeric("point_margin", "scoring", -70.0, 70.0, Hard),
        Category::categorical("first_to_score", "scoring", &["home", "away"], Moderate),
        // --- Situational ---
        Category::numeric("turnover_differential", "situational", -8.0, 8.0, Expert),
        Category::percentage("weather_impact", "situational", Moderate).with_scoring_weight(0.5),
        Category::categorical("momentum_shift", "situational", &["home", "away", "none"], Expert)
            .with_scoring_weight(0.5),
        // --- Player props ---
        Category::numeric("qb_passing_yards", "player_props", 0.0, 600.0, Hard),
        Category::numeric("rushing_yards_leader", "player_props", 0.0, 300.0, Expert),
        Category::percentage("anytime_td_probability", "player_props", Expert),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_definitions_are_consistent() {
        for category in default_categories() {
            category.check_definition().unwrap();
        }
    }
}
