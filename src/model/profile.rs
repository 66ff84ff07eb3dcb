use serde::Serialize;

/// How observations with equal scores are ordered before binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TiePolicy {
    /// Stable sort: equal scores keep their input order.
    InputOrder,
    /// Positives of a tied group are shared across the bins the group spans,
    /// in proportion to the group's slots in each bin.
    Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroPositivePolicy {
    Fail,
    ZeroFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LiftProfile {
    pub ties: TiePolicy,
    pub zero_positives: ZeroPositivePolicy,
}

impl LiftProfile {
    pub fn default_v1() -> Self {
        Self {
            ties: TiePolicy::InputOrder,
            zero_positives: ZeroPositivePolicy::Fail,
        }
    }
}

impl Default for LiftProfile {
    fn default() -> Self {
        Self::default_v1()
    }
}
