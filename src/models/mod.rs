//! Shared data models spanning the engine layers.

pub mod candle;
pub mod coin;
pub mod decision;
pub mod score;

pub use candle::Candle;
pub use coin::{CanonicalCoin, CoinAudit, CoinHolders, LooseNum, RawListingItem};
pub use decision::{
    Advisory, Decision, Intent, PlanSnapshot, Proposal, SignalSnapshot, Thought, TradeMode,
    Verdict,
};
pub use score::{ComputedRatios, ScoreResult, Tier};
