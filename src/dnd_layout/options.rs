use std::fmt;

use egui::{Color32, CursorIcon, Stroke};

/// Well-known id of the drag root element.
pub const DND_LAYOUT_ROOT_ID: &str = "MAIN_DND_LAYOUT_ID";

/// Default property carrying a node's [`super::DndId`].
pub const DND_ID_PROPERTY: &str = "data-dnd-id";

/// Default property carrying a node's [`super::DndProps`].
pub const DND_DATA_PROPERTY: &str = "data-dnd-props";

/// Style overrides for the drag root container.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContainerStyle {
    /// Replaced by [`CursorIcon::Move`] while dragging.
    pub cursor: Option<CursorIcon>,
    pub fill: Option<Color32>,
    pub stroke: Option<Stroke>,
}

/// Options for [`super::DndLayout`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DndLayoutOptions {
    /// Property name of the identity tag.
    pub id_property: String,

    /// Property name of the [`super::DndProps`] payload.
    ///
    /// Hosts have used different names for this over time, so it is configurable rather
    /// than fixed.
    pub data_property: String,

    /// Id of the drag root element. The upward tree walk stops at the node carrying it,
    /// and coordinates fall back to this element when no explicit root handle is set.
    pub root_id: String,

    /// Whether a ghost proxy follows the pointer while dragging.
    pub show_ghost_layer: bool,

    /// If true, the ghost is a caller-drawn template moved by accumulated pointer deltas
    /// (see [`super::DndBehavior::ghost_ui`]). Otherwise the dragged element is cloned.
    pub custom_ghost: bool,

    /// A press released sooner than this (seconds) is a click, otherwise a drop.
    pub click_threshold_secs: f64,

    /// Opacity multiplier applied to the dragged element while dragging.
    pub drag_opacity_factor: f32,

    pub style: ContainerStyle,

    /// If true, record transitions in a small ring buffer
    /// (see [`super::DndLayout::debug_log_lines`]).
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep.
    pub debug_event_log_capacity: usize,
}

impl Default for DndLayoutOptions {
    fn default() -> Self {
        Self {
            id_property: DND_ID_PROPERTY.to_owned(),
            data_property: DND_DATA_PROPERTY.to_owned(),
            root_id: DND_LAYOUT_ROOT_ID.to_owned(),
            show_ghost_layer: true,
            custom_ghost: false,
            click_threshold_secs: 0.2,
            drag_opacity_factor: 0.5,
            style: ContainerStyle::default(),
            debug_event_log: false,
            debug_event_log_capacity: 200,
        }
    }
}

/// A [`DndLayoutOptions`] value that can't work.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionsError {
    EmptyName(&'static str),
    SamePropertyName(String),
    InvalidClickThreshold(f64),
    InvalidOpacityFactor(f32),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName(field) => write!(f, "`{field}` must not be empty"),
            Self::SamePropertyName(name) => {
                write!(f, "id and data properties must differ (both are {name:?})")
            }
            Self::InvalidClickThreshold(secs) => {
                write!(f, "click threshold must be finite and >= 0, got {secs}")
            }
            Self::InvalidOpacityFactor(factor) => {
                write!(f, "drag opacity factor must be within 0..=1, got {factor}")
            }
        }
    }
}

impl std::error::Error for OptionsError {}

impl DndLayoutOptions {
    /// # Errors
    /// If a property name is empty, both property names are equal, or a numeric option is
    /// out of range.
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (field, value) in [
            ("id_property", &self.id_property),
            ("data_property", &self.data_property),
            ("root_id", &self.root_id),
        ] {
            if value.is_empty() {
                return Err(OptionsError::EmptyName(field));
            }
        }
        if self.id_property == self.data_property {
            return Err(OptionsError::SamePropertyName(self.id_property.clone()));
        }
        if !self.click_threshold_secs.is_finite() || self.click_threshold_secs < 0.0 {
            return Err(OptionsError::InvalidClickThreshold(self.click_threshold_secs));
        }
        if !(0.0..=1.0).contains(&self.drag_opacity_factor) {
            return Err(OptionsError::InvalidOpacityFactor(self.drag_opacity_factor));
        }
        Ok(())
    }

    pub(crate) fn ghost_strategy(&self) -> super::GhostStrategy {
        if self.custom_ghost {
            super::GhostStrategy::CustomTemplate
        } else {
            super::GhostStrategy::Clone
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let opt = DndLayoutOptions::default();
        assert_eq!(opt.validate(), Ok(()));
        assert!(opt.show_ghost_layer);
        assert_eq!(opt.id_property, "data-dnd-id");
        assert_eq!(opt.data_property, "data-dnd-props");
    }

    #[test]
    fn validate_rejects_unusable_values() {
        let opt = DndLayoutOptions {
            data_property: String::new(),
            ..Default::default()
        };
        assert_eq!(opt.validate(), Err(OptionsError::EmptyName("data_property")));

        let opt = DndLayoutOptions {
            data_property: DND_ID_PROPERTY.to_owned(),
            ..Default::default()
        };
        assert!(matches!(opt.validate(), Err(OptionsError::SamePropertyName(_))));

        let opt = DndLayoutOptions {
            click_threshold_secs: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(opt.validate(), Err(OptionsError::InvalidClickThreshold(_))));

        let opt = DndLayoutOptions {
            drag_opacity_factor: 1.5,
            ..Default::default()
        };
        let err = opt.validate().expect_err("factor out of range");
        assert_eq!(err.to_string(), "drag opacity factor must be within 0..=1, got 1.5");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_round_trip_through_ron() {
        let opt = DndLayoutOptions {
            custom_ghost: true,
            click_threshold_secs: 0.25,
            style: ContainerStyle {
                cursor: Some(CursorIcon::Grab),
                ..Default::default()
            },
            ..Default::default()
        };
        let text = ron::to_string(&opt).expect("serialize");
        let back: DndLayoutOptions = ron::from_str(&text).expect("deserialize");
        assert_eq!(back, opt);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_options_fill_in_defaults() {
        let opt: DndLayoutOptions =
            serde_json::from_str(r#"{"root_id":"tree-root","show_ghost_layer":false}"#)
                .expect("deserialize");
        assert_eq!(opt.root_id, "tree-root");
        assert!(!opt.show_ghost_layer);
        assert_eq!(opt.id_property, DND_ID_PROPERTY);
    }
}
