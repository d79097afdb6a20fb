//! Price tiers and their remote price-type labels.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// A named price level assigned to an account.
///
/// Each tier corresponds to one price-type group configured in MoySklad;
/// the group names are localized and not controlled by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Basic,
    Level1,
}

impl PriceTier {
    /// The price-type group name this tier maps to on the MoySklad side.
    pub fn remote_label(&self) -> &'static str {
        match self {
            PriceTier::Basic => "Прайс основной",
            PriceTier::Level1 => "Прайс 1 уровень",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::Basic => "basic",
            PriceTier::Level1 => "level1",
        }
    }
}

impl core::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PriceTier {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(PriceTier::Basic),
            "level1" => Ok(PriceTier::Level1),
            other => Err(ClientError::validation(format!(
                "unknown price tier '{other}', expected 'basic' or 'level1'"
            ))),
        }
    }
}
