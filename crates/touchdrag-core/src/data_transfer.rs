//! Drag payload carrier attached to every synthetic drag-lifecycle event.

use crate::error::{DataTransferError, DataTransferResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The effect a drop will have, as negotiated by the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropEffect {
    Copy,
    #[default]
    Move,
    Link,
    None,
}

impl DropEffect {
    pub const ALLOWED: &'static str = "copy, move, link, none";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Move => "move",
            Self::Link => "link",
            Self::None => "none",
        }
    }
}

impl FromStr for DropEffect {
    type Err = DataTransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "copy" => Ok(Self::Copy),
            "move" => Ok(Self::Move),
            "link" => Ok(Self::Link),
            "none" => Ok(Self::None),
            other => Err(DataTransferError::InvalidValue {
                field: "dropEffect",
                value: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl fmt::Display for DropEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of effects the drag source permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectAllowed {
    None,
    Copy,
    CopyLink,
    CopyMove,
    Link,
    LinkMove,
    #[default]
    Move,
    All,
    Uninitialized,
}

impl EffectAllowed {
    pub const ALLOWED: &'static str =
        "none, copy, copyLink, copyMove, link, linkMove, move, all, uninitialized";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Copy => "copy",
            Self::CopyLink => "copyLink",
            Self::CopyMove => "copyMove",
            Self::Link => "link",
            Self::LinkMove => "linkMove",
            Self::Move => "move",
            Self::All => "all",
            Self::Uninitialized => "uninitialized",
        }
    }
}

impl FromStr for EffectAllowed {
    type Err = DataTransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "copy" => Ok(Self::Copy),
            "copyLink" => Ok(Self::CopyLink),
            "copyMove" => Ok(Self::CopyMove),
            "link" => Ok(Self::Link),
            "linkMove" => Ok(Self::LinkMove),
            "move" => Ok(Self::Move),
            "all" => Ok(Self::All),
            "uninitialized" => Ok(Self::Uninitialized),
            other => Err(DataTransferError::InvalidValue {
                field: "effectAllowed",
                value: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl fmt::Display for EffectAllowed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal stand-in for the browser's `DataTransfer` object.
///
/// One instance lives for one gesture session and is shared by every
/// drag-lifecycle event dispatched during it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    drop_effect: DropEffect,
    effect_allowed: EffectAllowed,
    data: BTreeMap<String, String>,
}

impl DataTransfer {
    /// Create an empty payload with both effects set to `move`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_effect(&self) -> DropEffect {
        self.drop_effect
    }

    pub fn set_drop_effect(&mut self, effect: DropEffect) {
        self.drop_effect = effect;
    }

    /// Assign the drop effect from its string form.
    ///
    /// Unknown values fail with [`DataTransferError::InvalidValue`] and leave
    /// the current value in place.
    pub fn set_drop_effect_str(&mut self, value: &str) -> DataTransferResult<()> {
        self.drop_effect = value.parse()?;
        Ok(())
    }

    pub fn effect_allowed(&self) -> EffectAllowed {
        self.effect_allowed
    }

    pub fn set_effect_allowed(&mut self, effect: EffectAllowed) {
        self.effect_allowed = effect;
    }

    /// Assign the allowed effect from its string form.
    pub fn set_effect_allowed_str(&mut self, value: &str) -> DataTransferResult<()> {
        self.effect_allowed = value.parse()?;
        Ok(())
    }

    /// Data stored under `format`, or an empty string.
    pub fn get_data(&self, format: &str) -> String {
        self.data.get(format).cloned().unwrap_or_default()
    }

    pub fn set_data(&mut self, format: impl Into<String>, value: impl Into<String>) {
        self.data.insert(format.into(), value.into());
    }

    /// Remove one entry, or every entry when `format` is `None`.
    pub fn clear_data(&mut self, format: Option<&str>) {
        match format {
            Some(format) => {
                self.data.remove(format);
            }
            None => self.data.clear(),
        }
    }

    /// Keys currently holding data.
    pub fn types(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }
}
