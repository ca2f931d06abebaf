//! Combinatorial estimates of how likely a property shape sits in one
//! opposing hand.

pub mod cache;
pub mod pool;

pub use cache::TypeOdds;
pub use pool::RemainingPool;

/// `n` choose `m` as a float; zero when `m > n`.
pub fn binomial(n: u32, m: u32) -> f64 {
    if m > n {
        return 0.0;
    }
    let m = m.min(n - m);
    (0..m).fold(1.0, |acc, i| acc * f64::from(n - i) / f64::from(i + 1))
}

fn permutations(n: u32, m: u32) -> f64 {
    if m > n {
        return 0.0;
    }
    (0..m).fold(1.0, |acc, i| acc * f64::from(n - i))
}

/// Birthday-style estimate that one of `players` holds `identical` copies
/// of every one of the `sequences` levels, where `counts[i]` copies of level
/// `i` are still out. With `fixed_player` the cards must additionally avoid
/// one particular player.
///
/// Each choice of `identical * sequences` cards lands in a single hand with
/// probability `1 / P`, `P = players^(k*n - 1)`; treating the `C` choices as
/// independent gives `1 - ((P - 1) / P)^C`.
pub fn approximate(
    players: u32,
    counts: &[u32],
    fixed_player: bool,
    identical: u32,
    sequences: u32,
) -> f64 {
    if players == 0 || counts.iter().any(|&count| count < identical) {
        return 0.0;
    }
    let mut exponent = (identical * sequences).saturating_sub(1);
    if fixed_player {
        exponent += 1;
    }
    let spread = f64::from(players).powi(exponent as i32);
    let combinations: f64 = counts
        .iter()
        .take(sequences as usize)
        .map(|&count| binomial(count, identical))
        .product();
    let miss = (spread - 1.0) / spread;
    let probability = (1.0 - miss.powf(combinations)).clamp(0.0, 1.0);
    debug_assert!((0.0..=1.0).contains(&probability));
    probability
}

/// Inclusion-exclusion over the number of players holding the shape. Far
/// slower than [`approximate`]; kept to validate it.
pub fn exact(players: u32, counts: &[u32], identical: u32, sequences: u32) -> f64 {
    if players == 0 || identical == 0 {
        return 0.0;
    }
    let mut probability: f64 = 0.0;
    let mut sign = 1.0;
    for holders in 1..=players {
        let needed = holders * identical;
        let mut joint = 1.0;
        for &count in counts.iter().take(sequences as usize) {
            if needed > count {
                return probability.clamp(0.0, 1.0);
            }
            joint *= permutations(count, needed)
                / permutations(identical, identical).powi(holders as i32)
                / f64::from(players).powi(needed as i32);
        }
        probability += binomial(players, holders) * joint * sign;
        sign = -sign;
    }
    probability.clamp(0.0, 1.0)
}

/// Prior odds of a shape when every level is dealt `decks` times.
pub fn type_probability(players: u8, decks: u8, identical: u8, sequences: u8) -> f64 {
    let counts = vec![u32::from(decks); sequences as usize];
    approximate(
        u32::from(players),
        &counts,
        false,
        u32::from(identical),
        u32::from(sequences),
    )
}
