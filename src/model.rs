pub mod session;
pub mod snapshot;
pub mod widget;

pub use session::{LayoutMode, LayoutSession};
pub use snapshot::{RestoreOrder, SnapshotStore, WidgetSnapshot};
pub use widget::{PositionMode, SizeMode, WidgetAttr, WidgetId, WidgetInfo, WidgetKind};
