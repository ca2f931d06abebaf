use crate::model::deal::{MAX_DECKS, MAX_PLAYERS};
use crate::probability::type_probability;
use crate::property::{MAX_SEQUENCES, PropertyType};

/// Prior odds of every property shape for one table, keyed by
/// `(identical, sequences)`. The table size is fixed by the deal: at most
/// `decks` identical cards and [`MAX_SEQUENCES`] levels.
#[derive(Debug, Clone)]
pub struct TypeOdds {
    players: u8,
    decks: u8,
    table: Vec<f64>,
}

impl TypeOdds {
    pub fn new(players: u8, decks: u8) -> Self {
        assert!(players <= MAX_PLAYERS, "odds table sized for at most {MAX_PLAYERS} players");
        assert!(decks <= MAX_DECKS, "odds table sized for at most {MAX_DECKS} decks");
        let mut table = Vec::with_capacity(decks as usize * MAX_SEQUENCES);
        for identical in 1..=decks {
            for sequences in 1..=MAX_SEQUENCES as u8 {
                table.push(type_probability(players, decks, identical, sequences));
            }
        }
        Self {
            players,
            decks,
            table,
        }
    }

    pub fn players(&self) -> u8 {
        self.players
    }

    pub fn decks(&self) -> u8 {
        self.decks
    }

    pub fn get(&self, identical: u8, sequences: u8) -> f64 {
        match self.slot(identical, sequences) {
            Some(slot) => self.table[slot],
            None => type_probability(self.players, self.decks, identical, sequences),
        }
    }

    pub fn of(&self, property: &PropertyType) -> f64 {
        self.get(property.identical, property.sequences)
    }

    /// Odds for a table other than the cached one.
    pub fn for_params(players: u8, decks: u8, identical: u8, sequences: u8) -> f64 {
        type_probability(players, decks, identical, sequences)
    }

    fn slot(&self, identical: u8, sequences: u8) -> Option<usize> {
        if identical == 0 || identical > self.decks {
            return None;
        }
        if sequences == 0 || sequences as usize > MAX_SEQUENCES {
            return None;
        }
        Some((identical as usize - 1) * MAX_SEQUENCES + sequences as usize - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::TypeOdds;
    use crate::probability::type_probability;
    use crate::property::PropertyType;

    #[test]
    fn cached_values_match_direct_computation() {
        let odds = TypeOdds::new(4, 2);
        assert_eq!(odds.get(2, 2), type_probability(4, 2, 2, 2));
        assert_eq!(odds.of(&PropertyType::of_shape(1, 1)), type_probability(4, 2, 1, 1));
    }

    #[test]
    fn out_of_range_shapes_are_computed() {
        let odds = TypeOdds::new(4, 2);
        assert_eq!(odds.get(3, 1), 0.0);
        assert_eq!(odds.get(2, 20), type_probability(4, 2, 2, 20));
    }

    #[test]
    #[should_panic]
    fn oversized_tables_are_rejected() {
        let _ = TypeOdds::new(7, 2);
    }
}
