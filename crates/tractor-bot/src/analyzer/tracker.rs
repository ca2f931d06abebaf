use tractor_core::covering::{CoveringEngine, eliminate_property};
use tractor_core::model::card::Card;
use tractor_core::model::card_set::CardSet;
use tractor_core::model::suit::Suit;
use tractor_core::model::trump::Trump;
use tractor_core::property::PropertyType;

const PLAY_SUITS: usize = Suit::ALL.len();

/// What the table has shown about one player's holding in a suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuitKnowledge {
    #[default]
    Uncertain,
    /// The player failed to follow the suit.
    Void,
    /// The player has been seen playing the suit.
    Exists,
}

/// Shape knowledge gathered from follows to one kind of lead.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTypeInfo {
    pub lead: PropertyType,
    /// Smallest shapes the player showed not to hold.
    pub void: Vec<PropertyType>,
    /// Bigger shapes that could still hide behind the follow. Empty means
    /// nothing can.
    pub maybe: Vec<PropertyType>,
}

/// Cards and inferences for one seat. For the observing seat this is the
/// hand itself; for the others it is what they have played.
#[derive(Debug, Clone)]
pub struct PlayerTracker {
    trump: Trump,
    decks: u8,
    suited: [Vec<Card>; PLAY_SUITS],
    knowledge: [SuitKnowledge; PLAY_SUITS],
    type_info: [Vec<PropertyTypeInfo>; PLAY_SUITS],
}

impl PlayerTracker {
    pub fn new(trump: Trump, decks: u8) -> Self {
        Self {
            trump,
            decks,
            suited: std::array::from_fn(|_| Vec::new()),
            knowledge: [SuitKnowledge::Uncertain; PLAY_SUITS],
            type_info: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Adds cards, played against `lead` when given. Returns the led suit
    /// when this play is the first proof that the player is void in it.
    pub fn add_cards(
        &mut self,
        cards: &[Card],
        lead: Option<&[Card]>,
        engine: &CoveringEngine,
    ) -> Option<Suit> {
        if cards.is_empty() {
            return None;
        }
        let trump = self.trump;
        let lead = lead.filter(|lead| !lead.is_empty());
        let led_suit = lead.and_then(|lead| lead.first()).map(|card| trump.play_suit(*card));

        let mut revealed = None;
        for card in cards {
            let suit = trump.play_suit(*card);
            if let Some(led) = led_suit {
                if suit != led {
                    if self.knowledge[led.index()] != SuitKnowledge::Void {
                        revealed = Some(led);
                    }
                    self.knowledge[led.index()] = SuitKnowledge::Void;
                    self.knowledge[suit.index()] = SuitKnowledge::Exists;
                }
            }
            self.suited[suit.index()].push(*card);
        }
        for list in self.suited.iter_mut() {
            trump.sort_descending(list);
        }

        let (Some(lead), Some(led)) = (lead, led_suit) else {
            return revealed;
        };
        if cards.iter().any(|card| trump.play_suit(*card) != led) {
            return revealed;
        }
        self.knowledge[led.index()] = SuitKnowledge::Exists;
        let played = CardSet::from_cards(cards);
        let led_properties = engine.decompose(&CardSet::from_cards(lead)).properties;
        for property in led_properties.into_iter().filter(|p| p.num_cards() > 1) {
            let forced = engine.find_all_forced_properties(&[property], &played);
            if !forced.missing.is_empty() {
                self.record_missing(forced.missing, property, led);
            }
        }
        revealed
    }

    /// Removes one copy of each card; cards not held are ignored.
    pub fn delete_cards(&mut self, cards: &[Card]) {
        for card in cards {
            let list = &mut self.suited[self.trump.play_suit(*card).index()];
            if let Some(position) = list.iter().position(|held| held == card) {
                list.remove(position);
            }
        }
    }

    pub fn knowledge(&self, suit: Suit) -> SuitKnowledge {
        self.knowledge[suit.index()]
    }

    pub fn suit_cards(&self, suit: Suit) -> &[Card] {
        &self.suited[suit.index()]
    }

    pub fn cards_in_suit(&self, suit: Suit) -> usize {
        self.suited[suit.index()].len()
    }

    pub fn all_cards(&self) -> CardSet {
        self.suited.iter().flatten().copied().collect()
    }

    pub fn type_info(&self, suit: Suit) -> &[PropertyTypeInfo] {
        &self.type_info[suit.index()]
    }

    /// Shapes in which `property` could still exist in the player's `suit`
    /// cards; a pair may only survive as four of a kind, say. Empty when it
    /// cannot exist at all.
    pub fn is_property_available_in_suit(
        &self,
        property: &PropertyType,
        suit: Suit,
    ) -> Vec<PropertyType> {
        if self.knowledge(suit) == SuitKnowledge::Void {
            return Vec::new();
        }
        let mut possible = vec![*property];
        for info in self.type_info(suit) {
            if !info.void.iter().any(|missing| property.is_bigger_type_than(missing)) {
                continue;
            }
            if info.maybe.is_empty() {
                return Vec::new();
            }
            for maybe in info.maybe.iter().filter(|m| m.identical >= property.identical) {
                consume_type(
                    &mut possible,
                    PropertyType::of_shape(maybe.identical, maybe.sequences.max(property.sequences)),
                );
            }
        }
        possible
    }

    fn record_missing(&mut self, missing: Vec<PropertyType>, lead: PropertyType, suit: Suit) {
        let mut maybe = Vec::with_capacity(2);
        if lead.identical < self.decks {
            maybe.push(PropertyType::of_shape(lead.identical + 1, 1));
        }
        if let [only] = missing.as_slice() {
            if lead.exact_type(only) && lead.sequences > 1 {
                maybe.push(PropertyType::of_shape(lead.identical, lead.sequences + 1));
            }
        }
        let infos = &mut self.type_info[suit.index()];
        if let Some(info) = infos.iter_mut().find(|info| info.lead.exact_type(&lead)) {
            if maybe.len() < info.maybe.len() {
                info.maybe = maybe;
            }
            for shape in missing {
                eliminate_property(&mut info.void, shape);
            }
            return;
        }
        infos.push(PropertyTypeInfo {
            lead,
            void: missing,
            maybe,
        });
    }
}

/// Keeps `list` free of shapes dominated by another entry.
fn consume_type(list: &mut Vec<PropertyType>, property: PropertyType) {
    if property.num_cards() == 1 {
        return;
    }
    for entry in list.iter_mut() {
        if property.exact_type(entry) {
            return;
        }
        if property.is_bigger_type_than(entry) {
            *entry = property;
            return;
        }
        if entry.is_bigger_type_than(&property) {
            return;
        }
    }
    list.push(property);
}
