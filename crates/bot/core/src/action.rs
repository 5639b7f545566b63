//! Closed vocabularies for interactions and named locations.
//!
//! Profiles name actions and landmarks as strings; they are parsed into these
//! enums when the profile loads so an unknown label fails there and never at
//! dispatch time.

/// Interaction issued against a node or the agent itself.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionKind {
    Mine,
    Steal,
    Chop,
    Cook,
    Craft,
    Bank,
    Deposit,
    Alch,
    Teleport,
    WalkHere,
}

impl ActionKind {
    /// Menu entry text the client shows for this action.
    pub const fn menu_label(self) -> &'static str {
        match self {
            Self::Mine => "Mine",
            Self::Steal => "Steal-from",
            Self::Chop => "Chop down",
            Self::Cook => "Cook",
            Self::Craft => "Craft",
            Self::Bank => "Bank",
            Self::Deposit => "Deposit-All",
            Self::Alch => "Cast",
            Self::Teleport => "Teleport",
            Self::WalkHere => "Walk here",
        }
    }

    /// True for actions performed on a resource node.
    pub const fn targets_node(self) -> bool {
        matches!(self, Self::Mine | Self::Steal | Self::Chop)
    }
}

/// Named location a task can walk to or check against.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Landmark {
    /// Tile the agent retreats to when a hazard approaches.
    Safety,
    /// Tile the agent works from.
    WorkSpot,
    Bank,
    /// Area containing the worked nodes.
    WorkArea,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn labels_round_trip_through_strum() {
        for kind in ActionKind::iter() {
            assert_eq!(ActionKind::from_str(kind.as_ref()).ok(), Some(kind));
        }
        assert_eq!(ActionKind::from_str("WALK_HERE").ok(), Some(ActionKind::WalkHere));
        assert_eq!(Landmark::from_str("work_area").ok(), Some(Landmark::WorkArea));
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!(ActionKind::from_str("smelt").is_err());
        assert!(Landmark::from_str("lobby").is_err());
    }

    #[test]
    fn node_actions() {
        assert!(ActionKind::Mine.targets_node());
        assert!(!ActionKind::Bank.targets_node());
        assert_eq!(ActionKind::Steal.menu_label(), "Steal-from");
    }
}
