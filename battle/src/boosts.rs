//! Stat stage boost table

use sableye_protocol::server::BoostStat;

/// Per-stat stage modifiers for one active pokemon.
///
/// Deltas accumulate additively over the pokemon's time on the field and
/// reset when it leaves. Values are NOT clamped to the in-game -6..=+6
/// range; this tracker records what the stream reported, not what the
/// simulator enforces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoostTable {
    stages: [i32; 7],
}

impl BoostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: BoostStat) -> i32 {
        self.stages[Self::index(stat)]
    }

    /// Add a signed delta to one stat's stage.
    pub fn apply(&mut self, stat: BoostStat, delta: i32) {
        self.stages[Self::index(stat)] += delta;
    }

    /// Nonzero stages in the fixed stat order, for display.
    pub fn nonzero(&self) -> Vec<(BoostStat, i32)> {
        BoostStat::ALL
            .iter()
            .map(|&stat| (stat, self.get(stat)))
            .filter(|&(_, stage)| stage != 0)
            .collect()
    }

    fn index(stat: BoostStat) -> usize {
        BoostStat::ALL
            .iter()
            .position(|&s| s == stat)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boosts_accumulate() {
        let mut boosts = BoostTable::new();
        boosts.apply(BoostStat::Atk, 1);
        boosts.apply(BoostStat::Atk, 2);
        boosts.apply(BoostStat::Accuracy, -1);

        assert_eq!(boosts.get(BoostStat::Atk), 3);
        assert_eq!(boosts.get(BoostStat::Accuracy), -1);
        assert_eq!(boosts.get(BoostStat::Spe), 0);
    }

    #[test]
    fn test_boosts_not_clamped() {
        let mut boosts = BoostTable::new();
        for _ in 0..8 {
            boosts.apply(BoostStat::Def, 1);
        }
        assert_eq!(boosts.get(BoostStat::Def), 8);
    }

    #[test]
    fn test_nonzero_keeps_stat_order() {
        let mut boosts = BoostTable::new();
        boosts.apply(BoostStat::Spe, 2);
        boosts.apply(BoostStat::Atk, -1);

        assert_eq!(
            boosts.nonzero(),
            vec![(BoostStat::Atk, -1), (BoostStat::Spe, 2)]
        );
    }
}
