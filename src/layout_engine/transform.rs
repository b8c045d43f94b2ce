//! Declarative widget overrides and the code that applies them.

use tracing::trace;

use super::LayoutEngine;
use crate::model::snapshot::RestoreOrder;
use crate::model::widget::{PositionMode, SizeMode, WidgetAttr, WidgetId, WidgetInfo, WidgetKind};
use crate::sys::client::WidgetAccess;

/// Condition the widget's current state must meet for a transform to run.
///
/// Used for overrides the host re-asserts on its own: the transform only
/// acts while the host's default is still in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Guard {
    #[default]
    Always,
    XEquals(i32),
    XModeIs(PositionMode),
    SpriteIs(i32),
}

impl Guard {
    pub fn admits(self, info: &WidgetInfo) -> bool {
        match self {
            Guard::Always => true,
            Guard::XEquals(x) => info.x == x,
            Guard::XModeIs(mode) => info.x_mode == mode,
            Guard::SpriteIs(sprite) => info.sprite_id == sprite,
        }
    }
}

/// Which re-layout pass follows the writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Revalidate {
    None,
    Plain,
    #[default]
    Scroll,
    /// Re-layout the parent instead, for position changes the host only
    /// picks up from above.
    ParentScroll,
}

/// Desired end state for one existing widget. Unset fields are left alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformSpec {
    pub target: WidgetId,
    pub sprite_id: Option<i32>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub x_mode: Option<PositionMode>,
    pub y_mode: Option<PositionMode>,
    pub width_mode: Option<SizeMode>,
    pub height_mode: Option<SizeMode>,
    pub hidden: Option<bool>,
    pub order: RestoreOrder,
    pub guard: Guard,
    pub revalidate: Revalidate,
}

impl TransformSpec {
    pub const fn new(target: WidgetId) -> Self {
        Self {
            target,
            sprite_id: None,
            x: None,
            y: None,
            width: None,
            height: None,
            x_mode: None,
            y_mode: None,
            width_mode: None,
            height_mode: None,
            hidden: None,
            order: RestoreOrder::Normal,
            guard: Guard::Always,
            revalidate: Revalidate::Scroll,
        }
    }

    pub const fn at(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub const fn x(mut self, x: i32) -> Self {
        self.x = Some(x);
        self
    }

    pub const fn y(mut self, y: i32) -> Self {
        self.y = Some(y);
        self
    }

    pub const fn size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub const fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    pub const fn height(mut self, height: i32) -> Self {
        self.height = Some(height);
        self
    }

    pub const fn modes(mut self, x_mode: PositionMode, y_mode: PositionMode) -> Self {
        self.x_mode = Some(x_mode);
        self.y_mode = Some(y_mode);
        self
    }

    pub const fn x_mode(mut self, mode: PositionMode) -> Self {
        self.x_mode = Some(mode);
        self
    }

    pub const fn size_modes(mut self, width_mode: SizeMode, height_mode: SizeMode) -> Self {
        self.width_mode = Some(width_mode);
        self.height_mode = Some(height_mode);
        self
    }

    pub const fn width_mode(mut self, mode: SizeMode) -> Self {
        self.width_mode = Some(mode);
        self
    }

    pub const fn sprite(mut self, sprite_id: i32) -> Self {
        self.sprite_id = Some(sprite_id);
        self
    }

    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub const fn late(mut self) -> Self {
        self.order = RestoreOrder::Late;
        self
    }

    pub const fn when(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    pub const fn revalidate(mut self, revalidate: Revalidate) -> Self {
        self.revalidate = revalidate;
        self
    }

    /// Writes in host order: sprite, position, size, modes, visibility.
    pub fn attrs(&self) -> Vec<WidgetAttr> {
        let mut attrs = Vec::with_capacity(10);
        attrs.extend(self.sprite_id.map(WidgetAttr::SpriteId));
        attrs.extend(self.x.map(WidgetAttr::X));
        attrs.extend(self.y.map(WidgetAttr::Y));
        attrs.extend(self.width.map(WidgetAttr::Width));
        attrs.extend(self.height.map(WidgetAttr::Height));
        attrs.extend(self.x_mode.map(WidgetAttr::XMode));
        attrs.extend(self.y_mode.map(WidgetAttr::YMode));
        attrs.extend(self.width_mode.map(WidgetAttr::WidthMode));
        attrs.extend(self.height_mode.map(WidgetAttr::HeightMode));
        attrs.extend(self.hidden.map(WidgetAttr::Hidden));
        attrs
    }
}

/// A graphic child the engine adds under an existing parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteSpec {
    pub parent: WidgetId,
    pub sprite_id: i32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub x_mode: PositionMode,
    pub y_mode: PositionMode,
    pub width_mode: SizeMode,
    pub height_mode: SizeMode,
    pub no_click_through: bool,
    pub tiling: bool,
}

impl SpriteSpec {
    pub const fn new(parent: WidgetId, sprite_id: i32) -> Self {
        Self {
            parent,
            sprite_id,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            x_mode: PositionMode::AbsoluteStart,
            y_mode: PositionMode::AbsoluteStart,
            width_mode: SizeMode::Absolute,
            height_mode: SizeMode::Absolute,
            no_click_through: false,
            tiling: false,
        }
    }

    pub const fn bounds(mut self, x: i32, y: i32, width: i32, height: i32) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    pub const fn modes(mut self, x_mode: PositionMode, y_mode: PositionMode) -> Self {
        self.x_mode = x_mode;
        self.y_mode = y_mode;
        self
    }

    pub const fn size_modes(mut self, width_mode: SizeMode, height_mode: SizeMode) -> Self {
        self.width_mode = width_mode;
        self.height_mode = height_mode;
        self
    }

    fn attrs(&self) -> [WidgetAttr; 11] {
        [
            WidgetAttr::SpriteId(self.sprite_id),
            WidgetAttr::X(self.x),
            WidgetAttr::Y(self.y),
            WidgetAttr::Width(self.width),
            WidgetAttr::Height(self.height),
            WidgetAttr::XMode(self.x_mode),
            WidgetAttr::YMode(self.y_mode),
            WidgetAttr::WidthMode(self.width_mode),
            WidgetAttr::HeightMode(self.height_mode),
            WidgetAttr::NoClickThrough(self.no_click_through),
            WidgetAttr::SpriteTiling(self.tiling),
        ]
    }
}

/// Whether reset removes a created sprite along with its siblings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// The parent only holds engine-created children; reset clears it.
    Session,
    /// The parent also holds host children; reset removes only this child.
    Shared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Missing,
    Guarded,
    Written,
}

impl LayoutEngine {
    /// Snapshots the target on first contact in this session, writes the
    /// spec's attributes and re-lays out the widget.
    ///
    /// A missing target is skipped: the host may not have mounted it yet.
    pub fn apply<C: WidgetAccess>(&mut self, client: &mut C, spec: &TransformSpec) -> Applied {
        let Some(info) = client.widget(spec.target) else {
            trace!(target_widget = %spec.target, "transform target not mounted");
            return Applied::Missing;
        };
        if !spec.guard.admits(&info) {
            trace!(target_widget = %spec.target, guard = ?spec.guard, "transform guard not met");
            return Applied::Guarded;
        }
        self.session.snapshots.capture(&info, spec.order);
        self.session.mark_modified();

        client.set_all(spec.target, &spec.attrs());
        match spec.revalidate {
            Revalidate::None => {}
            Revalidate::Plain => client.revalidate(spec.target),
            Revalidate::Scroll => client.revalidate_scroll(spec.target),
            Revalidate::ParentScroll => {
                if let Some(parent) = info.parent {
                    client.revalidate_scroll(parent);
                }
            }
        }
        Applied::Written
    }

    pub fn apply_all<C: WidgetAccess>(&mut self, client: &mut C, specs: &[TransformSpec]) {
        for spec in specs {
            self.apply(client, spec);
        }
    }

    /// Snapshots a widget without writing to it, for overrides computed from
    /// the widget's pre-session values.
    pub fn capture<C: WidgetAccess>(
        &mut self,
        client: &C,
        id: WidgetId,
        order: RestoreOrder,
    ) -> Option<WidgetInfo> {
        let info = client.widget(id)?;
        self.session.snapshots.capture(&info, order);
        self.session.mark_modified();
        Some(info)
    }

    /// Adds a new sprite child. Created widgets are never snapshotted; reset
    /// deletes them instead.
    pub fn create_sprite<C: WidgetAccess>(
        &mut self,
        client: &mut C,
        spec: &SpriteSpec,
        ownership: Ownership,
    ) -> Option<WidgetId> {
        let child = client.create_child(spec.parent, WidgetKind::Graphic)?;
        client.set_all(child, &spec.attrs());
        client.revalidate_scroll(spec.parent);
        match ownership {
            Ownership::Session => self.session.note_created_under(spec.parent),
            Ownership::Shared => self.session.note_created(child),
        }
        Some(child)
    }
}
