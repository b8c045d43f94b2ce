use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// Packed host address of a widget: interface group in the high 16 bits,
/// child index in the low 16 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(u32);

impl WidgetId {
    pub const fn new(group: u16, child: u16) -> Self { Self(((group as u32) << 16) | child as u32) }

    pub const fn from_raw(raw: u32) -> Self { Self(raw) }

    pub const fn raw(self) -> u32 { self.0 }

    pub const fn group(self) -> u16 { (self.0 >> 16) as u16 }

    pub const fn child(self) -> u16 { (self.0 & 0xffff) as u16 }
}

impl fmt::Debug for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetId({}.{})", self.group(), self.child())
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group(), self.child())
    }
}

/// How a widget's x or y coordinate is resolved against its parent.
///
/// The same encoding is used for both axes: `Start` is left/top, `End` is
/// right/bottom. The proportional variants interpret the coordinate in
/// 1/16384ths of the parent's extent.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize,
    IntoPrimitive, TryFromPrimitive,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PositionMode {
    #[default]
    AbsoluteStart = 0,
    AbsoluteCenter = 1,
    AbsoluteEnd = 2,
    ProportionalStart = 3,
    ProportionalCenter = 4,
    ProportionalEnd = 5,
}

/// How a widget's width or height is resolved against its parent.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize,
    IntoPrimitive, TryFromPrimitive,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SizeMode {
    #[default]
    Absolute = 0,
    /// Parent extent minus the stored value.
    Minus = 1,
    /// Stored value in 1/16384ths of the parent extent.
    Proportional = 2,
}

#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, IntoPrimitive,
    TryFromPrimitive,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WidgetKind {
    Layer = 0,
    Rectangle = 3,
    Text = 4,
    Graphic = 5,
    Model = 6,
    Line = 9,
}

/// Everything the engine reads from a widget, resolved by the host at the
/// time of the call. Never cached across events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetInfo {
    pub id: WidgetId,
    pub parent: Option<WidgetId>,
    pub kind: WidgetKind,
    pub sprite_id: i32,
    /// Stored ("original") coordinates and dimensions, before mode
    /// resolution.
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub x_mode: PositionMode,
    pub y_mode: PositionMode,
    pub width_mode: SizeMode,
    pub height_mode: SizeMode,
    /// Hidden either directly or through an ancestor.
    pub hidden: bool,
    pub self_hidden: bool,
    /// Resolved geometry from the last layout pass.
    pub relative_x: i32,
    pub relative_y: i32,
    pub resolved_width: i32,
    pub resolved_height: i32,
}

/// A single attribute write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetAttr {
    SpriteId(i32),
    X(i32),
    Y(i32),
    Width(i32),
    Height(i32),
    XMode(PositionMode),
    YMode(PositionMode),
    WidthMode(SizeMode),
    HeightMode(SizeMode),
    Hidden(bool),
    NoClickThrough(bool),
    SpriteTiling(bool),
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn widget_id_packs_group_and_child() {
        let id = WidgetId::new(161, 38);
        assert_eq!(id.raw(), (161 << 16) | 38);
        assert_eq!(id.group(), 161);
        assert_eq!(id.child(), 38);
        assert_eq!(id.to_string(), "161.38");
        assert_eq!(WidgetId::from_raw(id.raw()), id);
    }

    #[test]
    fn modes_convert_from_host_values() {
        assert_eq!(PositionMode::try_from(2u8).ok(), Some(PositionMode::AbsoluteEnd));
        assert_eq!(SizeMode::try_from(1u8).ok(), Some(SizeMode::Minus));
        assert!(SizeMode::try_from(7u8).is_err());
        assert_eq!(u8::from(WidgetKind::Graphic), 5);
    }
}
