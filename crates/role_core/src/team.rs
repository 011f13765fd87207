//! Teams and role identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Team categories a role belongs to.
///
/// Discriminants match the digits used in team queue strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Team {
    Scps = 0,
    FoundationForces = 1,
    ChaosInsurgency = 2,
    Scientists = 3,
    ClassD = 4,
    Dead = 5,
    OtherAlive = 6,
    Flamingos = 7,
}

impl Team {
    /// Returns the team for a defined discriminant, `None` otherwise.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Team::Scps),
            1 => Some(Team::FoundationForces),
            2 => Some(Team::ChaosInsurgency),
            3 => Some(Team::Scientists),
            4 => Some(Team::ClassD),
            5 => Some(Team::Dead),
            6 => Some(Team::OtherAlive),
            7 => Some(Team::Flamingos),
            _ => None,
        }
    }

    pub fn is_scp(&self) -> bool {
        matches!(self, Team::Scps)
    }

    /// Digit used for this team in a queue string.
    pub fn as_digit(&self) -> char {
        char::from(b'0' + *self as u8)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Team::Scps => "SCPs",
            Team::FoundationForces => "Foundation Forces",
            Team::ChaosInsurgency => "Chaos Insurgency",
            Team::Scientists => "Scientists",
            Team::ClassD => "Class-D",
            Team::Dead => "Dead",
            Team::OtherAlive => "Other",
            Team::Flamingos => "Flamingos",
        };
        f.write_str(name)
    }
}

/// Role identifiers handed out at round start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleId {
    Scp173,
    Scp106,
    Scp049,
    Scp079,
    Scp096,
    Scp939,
    Scp3114,
    ClassD,
    Scientist,
    FacilityGuard,
    NtfPrivate,
    ChaosConscript,
    Spectator,
}

impl RoleId {
    pub const SCPS: [RoleId; 7] = [
        RoleId::Scp173,
        RoleId::Scp106,
        RoleId::Scp049,
        RoleId::Scp079,
        RoleId::Scp096,
        RoleId::Scp939,
        RoleId::Scp3114,
    ];

    pub fn team(&self) -> Team {
        match self {
            RoleId::Scp173
            | RoleId::Scp106
            | RoleId::Scp049
            | RoleId::Scp079
            | RoleId::Scp096
            | RoleId::Scp939
            | RoleId::Scp3114 => Team::Scps,
            RoleId::ClassD => Team::ClassD,
            RoleId::Scientist => Team::Scientists,
            RoleId::FacilityGuard | RoleId::NtfPrivate => Team::FoundationForces,
            RoleId::ChaosConscript => Team::ChaosInsurgency,
            RoleId::Spectator => Team::Dead,
        }
    }

    pub fn is_scp(&self) -> bool {
        self.team().is_scp()
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RoleId::Scp173 => "SCP-173",
            RoleId::Scp106 => "SCP-106",
            RoleId::Scp049 => "SCP-049",
            RoleId::Scp079 => "SCP-079",
            RoleId::Scp096 => "SCP-096",
            RoleId::Scp939 => "SCP-939",
            RoleId::Scp3114 => "SCP-3114",
            RoleId::ClassD => "Class-D Personnel",
            RoleId::Scientist => "Scientist",
            RoleId::FacilityGuard => "Facility Guard",
            RoleId::NtfPrivate => "NTF Private",
            RoleId::ChaosConscript => "Chaos Conscript",
            RoleId::Spectator => "Spectator",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_from_u8_round_trips_defined_values() {
        for value in 0..=7u8 {
            let team = Team::from_u8(value).unwrap();
            assert_eq!(team as u8, value);
            assert_eq!(team.as_digit(), char::from(b'0' + value));
        }
        assert_eq!(Team::from_u8(8), None);
        assert_eq!(Team::from_u8(255), None);
    }

    #[test]
    fn test_scp_roles_belong_to_scp_team() {
        for role in RoleId::SCPS {
            assert!(role.is_scp(), "{} should be an SCP", role);
        }
        assert!(!RoleId::ClassD.is_scp());
        assert_eq!(RoleId::FacilityGuard.team(), Team::FoundationForces);
        assert_eq!(RoleId::Spectator.team(), Team::Dead);
    }
}
