//! Known provider regions.

use std::fmt;
use std::str::FromStr;

use crate::error::InfraError;

/// Regions the crate knows friendly names for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Region {
    /// `us-east-2`
    Ohio,
    /// `us-east-1`
    NorthVirginia,
    /// `us-west-1`
    NorthCalifornia,
    /// `us-west-2`
    Oregon,
    /// `af-south-1`
    CapeTown,
    /// `ap-east-1`
    HongKong,
    /// `ap-south-1`
    Mumbai,
    /// `ap-northeast-3`
    OsakaLocal,
    /// `ap-northeast-2`
    Seoul,
    /// `ap-southeast-1`
    Singapore,
    /// `ap-southeast-2`
    Sydney,
    /// `ap-northeast-1`
    Tokyo,
    /// `ca-central-1`
    CanadaCentral,
    /// `cn-north-1`
    Beijing,
    /// `cn-northwest-1`
    Ningxia,
    /// `eu-central-1`
    Frankfurt,
    /// `eu-west-1`
    Ireland,
    /// `eu-west-2`
    London,
    /// `eu-south-1`
    Milan,
    /// `eu-west-3`
    Paris,
    /// `eu-north-1`
    Stockholm,
    /// `me-south-1`
    Bahrain,
    /// `sa-east-1`
    SaoPaulo,
    /// `us-gov-east-1`
    GovCloudEast,
    /// `us-gov-west-1`
    GovCloudWest,
}

impl Region {
    /// Every known region.
    pub const ALL: [Self; 25] = [
        Self::Ohio,
        Self::NorthVirginia,
        Self::NorthCalifornia,
        Self::Oregon,
        Self::CapeTown,
        Self::HongKong,
        Self::Mumbai,
        Self::OsakaLocal,
        Self::Seoul,
        Self::Singapore,
        Self::Sydney,
        Self::Tokyo,
        Self::CanadaCentral,
        Self::Beijing,
        Self::Ningxia,
        Self::Frankfurt,
        Self::Ireland,
        Self::London,
        Self::Milan,
        Self::Paris,
        Self::Stockholm,
        Self::Bahrain,
        Self::SaoPaulo,
        Self::GovCloudEast,
        Self::GovCloudWest,
    ];

    /// Region code, for example `eu-west-1`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ohio => "us-east-2",
            Self::NorthVirginia => "us-east-1",
            Self::NorthCalifornia => "us-west-1",
            Self::Oregon => "us-west-2",
            Self::CapeTown => "af-south-1",
            Self::HongKong => "ap-east-1",
            Self::Mumbai => "ap-south-1",
            Self::OsakaLocal => "ap-northeast-3",
            Self::Seoul => "ap-northeast-2",
            Self::Singapore => "ap-southeast-1",
            Self::Sydney => "ap-southeast-2",
            Self::Tokyo => "ap-northeast-1",
            Self::CanadaCentral => "ca-central-1",
            Self::Beijing => "cn-north-1",
            Self::Ningxia => "cn-northwest-1",
            Self::Frankfurt => "eu-central-1",
            Self::Ireland => "eu-west-1",
            Self::London => "eu-west-2",
            Self::Milan => "eu-south-1",
            Self::Paris => "eu-west-3",
            Self::Stockholm => "eu-north-1",
            Self::Bahrain => "me-south-1",
            Self::SaoPaulo => "sa-east-1",
            Self::GovCloudEast => "us-gov-east-1",
            Self::GovCloudWest => "us-gov-west-1",
        }
    }

    /// Location label, for example `Ireland`.
    #[must_use]
    pub const fn location(self) -> &'static str {
        match self {
            Self::Ohio => "Ohio",
            Self::NorthVirginia => "N. Virginia",
            Self::NorthCalifornia => "N. California",
            Self::Oregon => "Oregon",
            Self::CapeTown => "Cape Town",
            Self::HongKong => "Hong Kong",
            Self::Mumbai => "Mumbai",
            Self::OsakaLocal => "Osaka-Local",
            Self::Seoul => "Seoul",
            Self::Singapore => "Singapore",
            Self::Sydney => "Sydney",
            Self::Tokyo => "Tokyo",
            Self::CanadaCentral => "Central",
            Self::Beijing => "Beijing",
            Self::Ningxia => "Ningxia",
            Self::Frankfurt => "Frankfurt",
            Self::Ireland => "Ireland",
            Self::London => "London",
            Self::Milan => "Milan",
            Self::Paris => "Paris",
            Self::Stockholm => "Stockholm",
            Self::Bahrain => "Bahrain",
            Self::SaoPaulo => "São Paulo",
            Self::GovCloudEast => "US-East",
            Self::GovCloudWest => "US-West",
        }
    }

    /// Code and location, for example `eu-west-1 (Ireland)`.
    #[must_use]
    pub fn full_name(self) -> String {
        format!("{} ({})", self.code(), self.location())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = InfraError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim();
        Self::ALL
            .into_iter()
            .find(|region| region.code() == code)
            .ok_or_else(|| InfraError::Validation(format!("region {code}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("eu-west-1", Region::Ireland)]
    #[case(" us-east-1 ", Region::NorthVirginia)]
    #[case("us-gov-west-1", Region::GovCloudWest)]
    fn parses_region_codes(#[case] code: &str, #[case] expected: Region) {
        assert_eq!(code.parse::<Region>().ok(), Some(expected));
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!("mars-north-1".parse::<Region>().is_err());
    }

    #[test]
    fn full_name_combines_code_and_location() {
        assert_eq!(Region::SaoPaulo.full_name(), "sa-east-1 (São Paulo)");
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<_> = Region::ALL.iter().map(|region| region.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), Region::ALL.len());
    }
}
