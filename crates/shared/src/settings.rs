//! The settings screen: two radio groups and a save action.

use crate::models::{PlayerColor, PlayerShape};
use crate::prefs::{PreferenceBag, COLOR_KEY, SHAPE_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionGroup {
    Color,
    Shape,
}

impl std::fmt::Display for OptionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionGroup::Color => write!(f, "color"),
            OptionGroup::Shape => write!(f, "shape"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("no {0} option selected")]
    MissingSelection(OptionGroup),
}

/// Current selection of both radio groups. Either may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsForm {
    pub color: Option<PlayerColor>,
    pub shape: Option<PlayerShape>,
}

impl SettingsForm {
    /// Pre-select the stored options. Unknown or unreadable values leave the
    /// group empty.
    pub fn from_preferences<P: PreferenceBag + ?Sized>(bag: &P) -> Self {
        let color = bag.get(COLOR_KEY).ok().flatten();
        let shape = bag.get(SHAPE_KEY).ok().flatten();
        SettingsForm {
            color: color.as_deref().and_then(PlayerColor::from_pref),
            shape: shape.as_deref().and_then(PlayerShape::from_pref),
        }
    }

    pub fn select_color(&mut self, color: PlayerColor) {
        self.color = Some(color);
    }

    pub fn select_shape(&mut self, shape: PlayerShape) {
        self.shape = Some(shape);
    }

    /// Write both selections to the bag.
    ///
    /// An empty group aborts the save before anything is written. The write
    /// itself is fire-and-forget: a backend failure is logged, and `Ok` means
    /// the screen may close.
    pub fn save<P: PreferenceBag + ?Sized>(&self, bag: &mut P) -> Result<(), SettingsError> {
        let color = self
            .color
            .ok_or(SettingsError::MissingSelection(OptionGroup::Color))?;
        let shape = self
            .shape
            .ok_or(SettingsError::MissingSelection(OptionGroup::Shape))?;

        let entries = [(COLOR_KEY, color.pref_value()), (SHAPE_KEY, shape.pref_value())];
        match bag.put_all(&entries) {
            Ok(()) => tracing::info!(%color, %shape, "Saved player settings"),
            Err(e) => tracing::warn!(error = %e, "Failed to persist player settings"),
        }
        Ok(())
    }
}
