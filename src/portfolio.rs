use crate::valuation::ValuedPlayer;

/// One side of a trade, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    players: Vec<ValuedPlayer>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, player: ValuedPlayer) {
        self.players.push(player);
    }

    /// Removes the first player whose name matches exactly.
    pub fn remove_by_name(&mut self, name: &str) -> Option<ValuedPlayer> {
        let idx = self.players.iter().position(|p| p.name() == name)?;
        Some(self.players.remove(idx))
    }

    pub fn players(&self) -> &[ValuedPlayer] {
        &self.players
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValuedPlayer> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn aggregate(&self) -> f64 {
        aggregate(self)
    }
}

impl FromIterator<ValuedPlayer> for Portfolio {
    fn from_iter<I: IntoIterator<Item = ValuedPlayer>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Portfolio {
    type Item = &'a ValuedPlayer;
    type IntoIter = std::slice::Iter<'a, ValuedPlayer>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

/// Sum of contribution scores; 0.0 for an empty portfolio.
pub fn aggregate(portfolio: &Portfolio) -> f64 {
    portfolio
        .players
        .iter()
        .fold(0.0, |acc, p| acc + p.contribution_score())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerStats;
    use crate::valuation::evaluate;

    fn player(name: &str, ws: f64) -> ValuedPlayer {
        evaluate(PlayerStats::new(name, ws, 0.36, 2.0, 78.0, 210.0, 81.0).unwrap())
    }

    #[test]
    fn remove_takes_first_duplicate_only() {
        let mut side = Portfolio::new();
        side.push(player("Dup", 1.0));
        side.push(player("Other", 2.0));
        side.push(player("Dup", 3.0));

        let removed = side.remove_by_name("Dup").unwrap();
        assert_eq!(removed.stats().win_shares(), 1.0);
        assert_eq!(side.len(), 2);
        assert_eq!(side.players()[1].stats().win_shares(), 3.0);
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut side: Portfolio = [player("A", 1.0)].into_iter().collect();
        assert!(side.remove_by_name("B").is_none());
        assert_eq!(side.len(), 1);
    }

    #[test]
    fn empty_aggregate_is_zero() {
        assert_eq!(Portfolio::new().aggregate(), 0.0);
    }
}
