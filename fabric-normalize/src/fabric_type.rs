use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

/// Top-level key every fabric document is rooted at.
pub const ROOT_KEY: &str = "vxlan";

/// Configuration type of a fabric document.
///
/// Governs which schema table and which rules apply. Resolved once, early in
/// the pipeline, and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FabricType {
    /// Single-site VXLAN EVPN fabric.
    #[serde(rename = "VXLAN_EVPN")]
    VxlanEvpn,
    /// Multi-site domain grouping several child fabrics.
    #[serde(rename = "MSD")]
    Msd,
    /// Multi-cluster fabric group.
    #[serde(rename = "MCFG")]
    Mcfg,
    /// Inter-site network.
    #[serde(rename = "ISN")]
    Isn,
    /// Externally managed switches.
    #[serde(rename = "External")]
    External,
}

impl FabricType {
    pub const ALL: [FabricType; 5] = [
        FabricType::VxlanEvpn,
        FabricType::Msd,
        FabricType::Mcfg,
        FabricType::Isn,
        FabricType::External,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FabricType::VxlanEvpn => "VXLAN_EVPN",
            FabricType::Msd => "MSD",
            FabricType::Mcfg => "MCFG",
            FabricType::Isn => "ISN",
            FabricType::External => "External",
        }
    }
}

impl Display for FabricType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a configuration type value is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fabric type '{0}' (expected one of VXLAN_EVPN, MSD, MCFG, ISN, External)")]
pub struct UnknownFabricType(pub String);

impl FromStr for FabricType {
    type Err = UnknownFabricType;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let folded = raw.trim().to_ascii_uppercase().replace('-', "_");
        match folded.as_str() {
            "VXLAN_EVPN" | "VXLANEVPN" => Ok(FabricType::VxlanEvpn),
            "MSD" => Ok(FabricType::Msd),
            "MCFG" => Ok(FabricType::Mcfg),
            "ISN" => Ok(FabricType::Isn),
            "EXTERNAL" => Ok(FabricType::External),
            _ => Err(UnknownFabricType(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FabricType;

    #[test]
    fn parses_known_types_loosely() {
        assert_eq!("vxlan-evpn".parse(), Ok(FabricType::VxlanEvpn));
        assert_eq!("external".parse(), Ok(FabricType::External));
        assert_eq!(" MSD ".parse(), Ok(FabricType::Msd));
        assert!("campus".parse::<FabricType>().is_err());
    }

    #[test]
    fn display_matches_canonical_spelling() {
        for ty in FabricType::ALL {
            assert_eq!(ty.as_str().parse::<FabricType>(), Ok(ty));
        }
    }
}
