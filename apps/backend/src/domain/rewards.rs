/// Coins paid for finishing at `rank` within a group. Zero outside the payout tiers.
pub fn reward_for_rank(rank: u32) -> i64 {
    match rank {
        1 => 5000,
        2 => 3000,
        3 => 2000,
        4..=10 => 1000,
        _ => 0,
    }
}
