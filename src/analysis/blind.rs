use crate::api::stats::MatchupData;

/// Scores how safe a champion is to lock in before any enemy is revealed,
/// 0-100. Starts from 70 and pays for every bad matchup on record: 12 points
/// per hard counter (below 45%), 4 per soft one (below 48%), with a small
/// credit for a winning global winrate.
///
/// No matchup data at all is a cautious 60; data with zero recorded
/// opponents means nobody punishes the pick, which is worth 75.
pub fn blindpick_score(matchups: Option<&MatchupData>) -> f64 {
    let Some(data) = matchups else {
        return 60.0;
    };
    if data.counters.is_empty() && data.weak_against.is_empty() {
        return 75.0;
    }

    let mut hard = 0u32;
    let mut soft = 0u32;
    for entry in data.counters.iter().chain(data.weak_against.iter()) {
        if entry.winrate < 45.0 {
            hard += 1;
        } else if entry.winrate < 48.0 {
            soft += 1;
        }
    }

    let penalty = f64::from(hard) * 12.0 + f64::from(soft) * 4.0;
    let bonus = ((data.winrate - 50.0) * 2.0).max(0.0);
    (70.0 - penalty + bonus).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stats::MatchupEntry;

    fn data(winrate: f64, opponents: &[f64]) -> MatchupData {
        let entries: Vec<MatchupEntry> = opponents
            .iter()
            .enumerate()
            .map(|(i, wr)| MatchupEntry {
                champion: format!("Opponent{}", i),
                winrate: *wr,
                games: 1000,
            })
            .collect();
        let (counters, weak_against) = entries.into_iter().partition(|e| e.winrate < 50.0);
        MatchupData {
            winrate,
            counters,
            weak_against,
        }
    }

    #[test]
    fn absent_data_is_a_cautious_default() {
        assert_eq!(blindpick_score(None), 60.0);
    }

    #[test]
    fn no_recorded_opponents_means_nothing_punishes_the_pick() {
        assert_eq!(blindpick_score(Some(&data(52.0, &[]))), 75.0);
    }

    #[test]
    fn counters_drag_the_score_down() {
        // 2 hard + 1 soft with a 52% winrate: 70 - 24 - 4 + 4 = 46
        let d = data(52.0, &[44.0, 41.5, 46.0, 55.0]);
        assert_eq!(blindpick_score(Some(&d)), 46.0);
    }

    #[test]
    fn winning_global_winrate_earns_a_credit() {
        let even = data(50.0, &[55.0]);
        let winning = data(53.0, &[55.0]);
        assert_eq!(blindpick_score(Some(&even)), 70.0);
        assert_eq!(blindpick_score(Some(&winning)), 76.0);
    }

    #[test]
    fn losing_global_winrate_earns_nothing() {
        let losing = data(46.0, &[55.0]);
        assert_eq!(blindpick_score(Some(&losing)), 70.0);
    }

    #[test]
    fn many_hard_counters_floor_at_zero() {
        let d = data(50.0, &[40.0, 41.0, 42.0, 43.0, 44.0, 44.5]);
        assert_eq!(blindpick_score(Some(&d)), 0.0);
    }

    #[test]
    fn soft_threshold_is_exclusive_at_48() {
        // 48.0 exactly is neither hard nor soft
        let d = data(50.0, &[48.0]);
        assert_eq!(blindpick_score(Some(&d)), 70.0);
        // 47.99 is soft
        let d = data(50.0, &[47.99]);
        assert_eq!(blindpick_score(Some(&d)), 66.0);
        // 45.0 exactly is soft, not hard
        let d = data(50.0, &[45.0]);
        assert_eq!(blindpick_score(Some(&d)), 66.0);
    }
}
