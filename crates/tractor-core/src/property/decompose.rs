use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::suit::Suit;
use crate::model::trump::Trump;
use crate::property::ordering::same_type_together;
use crate::property::property_type::PropertyType;

/// A card multiset read as properties.
///
/// `properties` partitions the cards: every card belongs to exactly one of
/// them. `secondary` lists alternative overlapping readings (AA-KKK also
/// reads as the tractor AAKK) that matter when proving a bigger shape exists.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub properties: Vec<PropertyType>,
    pub secondary: Vec<PropertyType>,
    /// Play suit shared by all cards; `None` for mixed or empty input.
    pub suit: Option<Suit>,
    pub mixed: bool,
    pub total_cards: usize,
    trump: Trump,
}

impl Decomposition {
    pub fn new(cards: &CardSet, trump: Trump) -> Self {
        let sorted = cards.sorted(&trump);
        let groups = split_by_play_suit(&sorted, &trump);
        let mut decomposition = Self {
            properties: Vec::new(),
            secondary: Vec::new(),
            suit: None,
            mixed: groups.len() != 1,
            total_cards: sorted.len(),
            trump,
        };
        if let [group] = groups.as_slice() {
            decomposition.suit = group.first().map(|card| trump.play_suit(*card));
        }
        for group in &groups {
            let (properties, secondary) = scan_suit(group, &trump);
            decomposition.properties.extend(properties);
            decomposition.secondary.extend(secondary);
        }
        debug_assert_eq!(
            decomposition
                .properties
                .iter()
                .map(PropertyType::num_cards)
                .sum::<usize>(),
            decomposition.total_cards,
            "decomposition must cover every card once"
        );
        decomposition
    }

    pub fn trump(&self) -> Trump {
        self.trump
    }

    pub fn is_trump_suit(&self) -> bool {
        self.suit == Some(self.trump.suit)
    }

    pub fn is_empty(&self) -> bool {
        self.total_cards == 0
    }

    /// Primary then secondary readings.
    pub fn all_properties(&self) -> impl Iterator<Item = &PropertyType> {
        self.properties.iter().chain(self.secondary.iter())
    }
}

fn split_by_play_suit(sorted: &[Card], trump: &Trump) -> Vec<Vec<Card>> {
    let mut groups: Vec<(Suit, Vec<Card>)> = Vec::new();
    for card in sorted {
        let suit = trump.play_suit(*card);
        match groups.iter_mut().find(|(s, _)| *s == suit) {
            Some((_, cards)) => cards.push(*card),
            None => groups.push((suit, vec![*card])),
        }
    }
    groups.into_iter().map(|(_, cards)| cards).collect()
}

/// The level the next segment of `property` must have to extend it. Only
/// groups of two or more may extend.
fn next_link(property: &PropertyType, trump: &Trump) -> Option<u8> {
    if property.identical <= 1 {
        return None;
    }
    trump.step_down(property.leading, property.sequences)
}

fn grow(property: &PropertyType, identical: u8, suit: Suit) -> PropertyType {
    let mut grown = property.with_shape(
        property.identical.min(identical),
        property.sequences + 1,
    );
    grown.set_last_segment_suit(suit);
    if property.identical != identical {
        grown.has_other_combo = true;
    }
    grown
}

fn shelve(open: &mut Vec<PropertyType>, done: &mut Vec<PropertyType>, level: u8, trump: &Trump) {
    let (stale, live): (Vec<_>, Vec<_>) = open
        .drain(..)
        .partition(|p| next_link(p, trump).is_some_and(|link| link > level));
    done.extend(stale);
    *open = live;
}

/// Scans one play suit from high to low. Each run of identical cards either
/// extends an open property whose next level it fills, or opens a new one.
/// When the run can extend several open properties, the first claims it and
/// the rest become secondary readings.
fn scan_suit(cards: &[Card], trump: &Trump) -> (Vec<PropertyType>, Vec<PropertyType>) {
    let mut done = Vec::new();
    let mut done_secondary = Vec::new();
    let mut open: Vec<PropertyType> = Vec::new();
    let mut open_secondary: Vec<PropertyType> = Vec::new();

    let mut rest = cards;
    while let Some((&card, tail)) = rest.split_first() {
        let copies = 1 + tail.iter().take_while(|c| **c == card).count();
        rest = &rest[copies..];
        let level = trump.level(card);
        let segment_suit = trump.actual_suit(card);
        let mut run = PropertyType::from_card(card, *trump).with_shape(copies as u8, 1);

        shelve(&mut open, &mut done, level, trump);
        shelve(&mut open_secondary, &mut done_secondary, level, trump);

        if run.identical == 1 {
            done.push(run);
            continue;
        }

        let mut branched = Vec::new();
        for property in open_secondary.iter_mut() {
            if next_link(property, trump) != Some(level) {
                continue;
            }
            let grown = grow(property, run.identical, segment_suit);
            if property.identical <= run.identical {
                *property = grown;
            } else {
                branched.push(grown);
            }
        }
        open_secondary.extend(branched);

        let mut claimed = false;
        for property in open.iter_mut() {
            if next_link(property, trump) != Some(level) {
                continue;
            }
            if property.identical == run.identical {
                let grown = grow(property, property.identical, segment_suit);
                if claimed {
                    run.has_other_combo = true;
                    open_secondary.push(grown);
                } else {
                    *property = grown;
                    claimed = true;
                }
            } else {
                run.has_other_combo = true;
                open_secondary.push(grow(property, run.identical, segment_suit));
            }
        }
        if !claimed {
            open.push(run);
        }
    }
    done.extend(open);
    done_secondary.extend(open_secondary);

    done_secondary.sort_by(same_type_together);
    done_secondary.dedup_by(|later, earlier| later.same_property(earlier));
    (done, done_secondary)
}
