use crate::model::session::LayoutSession;
use crate::model::snapshot::WidgetSnapshot;
use crate::model::widget::WidgetId;

/// Owns the session bookkeeping for every override the engine makes.
///
/// Transform application lives in `transform`, the override tables in
/// `tables`, restoration in `reset`.
#[derive(Default, Debug)]
pub struct LayoutEngine {
    pub(super) session: LayoutSession,
}

impl LayoutEngine {
    pub fn new() -> Self { Self::default() }

    pub fn session(&self) -> &LayoutSession { &self.session }

    pub fn is_modified(&self) -> bool { self.session.is_modified() }

    pub fn snapshot(&self, id: WidgetId) -> Option<&WidgetSnapshot> {
        self.session.snapshots.get(id)
    }
}
