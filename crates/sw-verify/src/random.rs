use rand::Rng;
use sw_ring::Evict;

use crate::Op;

/// Random operation mix weighted toward pushes, with occasional pops,
/// resizes up to `max_capacity` and clears. Values are drawn from
/// `-|spread|..=|spread|` (saturating at `i64::MAX`), so small spreads
/// produce many ties.
pub fn random_ops<R: Rng>(rng: &mut R, count: usize, spread: i64, max_capacity: usize) -> Vec<Op<i64>> {
    let spread = spread.saturating_abs();
    (0..count)
        .map(|_| match rng.gen_range(0..100) {
            0..=54 => Op::PushBack(rng.gen_range(-spread..=spread)),
            55..=74 => Op::PushFront(rng.gen_range(-spread..=spread)),
            75..=84 => Op::PopFront,
            85..=94 => Op::PopBack,
            95..=98 => Op::Resize {
                capacity: rng.gen_range(0..=max_capacity),
                evict: if rng.gen_bool(0.5) {
                    Evict::Front
                } else {
                    Evict::Back
                },
            },
            _ => Op::Clear,
        })
        .collect()
}
