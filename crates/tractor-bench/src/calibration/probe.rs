use tractor_core::covering::CoveringEngine;
use tractor_core::model::card::Card;
use tractor_core::model::deal::Deal;
use tractor_core::model::suit::Suit;
use tractor_core::probability::RemainingPool;
use tractor_core::property::Decomposition;

use crate::config::ProbeConfig;

/// A probed property of seat 0's hand and what the other hands did to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub probe: String,
    pub suit: Suit,
    pub leading: u8,
    pub identical: u8,
    pub sequences: u8,
    pub cards: Vec<Card>,
    /// Survival as estimated from seat 0's view of the pool.
    pub estimate: f64,
    /// No other hand holds a bigger property of the shape in the suit.
    pub survived: bool,
}

/// Checks every off-trump property of seat 0 that matches a probe shape.
/// `pool` must be seat 0's view: the full shoe minus its own hand.
pub fn observe_deal(
    engine: &CoveringEngine,
    pool: &RemainingPool,
    deal: &Deal,
    probes: &[ProbeConfig],
) -> Vec<Observation> {
    let Some((mine, others)) = deal.hands.split_first() else {
        return Vec::new();
    };
    let trump_suit = engine.trump().suit;
    let holders = others.len() as u8;
    let rivals: Vec<Decomposition> = others.iter().map(|hand| engine.decompose(hand)).collect();

    let mut observations = Vec::new();
    for property in engine.decompose(mine).properties {
        if property.suit == trump_suit {
            continue;
        }
        let Some(probe) = probes
            .iter()
            .find(|p| p.identical == property.identical && p.sequences == property.sequences)
        else {
            continue;
        };
        let beaten = rivals
            .iter()
            .any(|rival| rival.all_properties().any(|theirs| theirs.is_breakable(&property)));
        observations.push(Observation {
            probe: probe.name.clone(),
            suit: property.suit,
            leading: property.leading,
            identical: property.identical,
            sequences: property.sequences,
            cards: property.to_cards(),
            estimate: pool.current_property_probability(&property, holders, false),
            survived: !beaten,
        });
    }
    observations
}
