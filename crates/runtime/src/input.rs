//! Control surface: logical buttons and the commands they trigger.
//!
//! Hosts map their own key or controller bindings onto [`Button`] and report
//! whether the modifier (Ctrl) is held. The mapping to [`TrackerCommand`]
//! lives here so every host behaves the same way.

use tracker_core::Cycle;

use crate::director::ReadMode;

/// Logical tracker buttons.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Button {
    Read,
    ReadTile,
    CycleUp,
    CycleDown,
    ToggleSort,
}

/// High-level request handled by the director.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerCommand {
    Read(ReadMode),
    CycleItem(Cycle),
    CycleCategory(Cycle),
    ToggleSort,
}

impl TrackerCommand {
    /// Translates a button press, with or without the modifier held.
    pub fn from_button(button: Button, modifier: bool) -> Self {
        match (button, modifier) {
            (Button::Read, false) => Self::Read(ReadMode::Describe),
            (Button::Read, true) => Self::Read(ReadMode::AutoMove),
            (Button::ReadTile, false) => Self::Read(ReadMode::TileOnly),
            (Button::ReadTile, true) => Self::Read(ReadMode::Directions),
            (Button::CycleUp, false) => Self::CycleItem(Cycle::Prev),
            (Button::CycleUp, true) => Self::CycleCategory(Cycle::Prev),
            (Button::CycleDown, false) => Self::CycleItem(Cycle::Next),
            (Button::CycleDown, true) => Self::CycleCategory(Cycle::Next),
            (Button::ToggleSort, _) => Self::ToggleSort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_switches_to_autopath_and_categories() {
        assert_eq!(
            TrackerCommand::from_button(Button::Read, true),
            TrackerCommand::Read(ReadMode::AutoMove)
        );
        assert_eq!(
            TrackerCommand::from_button(Button::ReadTile, true),
            TrackerCommand::Read(ReadMode::Directions)
        );
        assert_eq!(
            TrackerCommand::from_button(Button::CycleDown, true),
            TrackerCommand::CycleCategory(Cycle::Next)
        );
        assert_eq!(
            TrackerCommand::from_button(Button::CycleUp, false),
            TrackerCommand::CycleItem(Cycle::Prev)
        );
    }

    #[test]
    fn buttons_parse_from_config_names() {
        assert_eq!("read_tile".parse::<Button>().unwrap(), Button::ReadTile);
        assert_eq!("TOGGLE_SORT".parse::<Button>().unwrap(), Button::ToggleSort);
        assert!("jump".parse::<Button>().is_err());
    }
}
