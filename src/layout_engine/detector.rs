use super::ids;
use crate::model::session::LayoutMode;
use crate::model::widget::WidgetId;
use crate::sys::client::{Client, GameState};

/// Layout roots in priority order.
const ROOTS: [(WidgetId, LayoutMode); 3] = [
    (ids::CLASSIC_RESIZABLE_ROOT, LayoutMode::ClassicResizable),
    (ids::MODERN_RESIZABLE_ROOT, LayoutMode::ModernResizable),
    (ids::FIXED_ROOT, LayoutMode::Fixed),
];

/// Classifies the host's current layout from which root widget is mounted
/// and visible. Read-only.
///
/// Returns `Undetermined` until the host is logged in and has built one of
/// the roots; callers poll rather than trusting a single early read.
pub fn detect<C: Client + ?Sized>(client: &C) -> LayoutMode {
    if client.game_state() != GameState::LoggedIn {
        return LayoutMode::Undetermined;
    }
    ROOTS
        .iter()
        .find(|(root, _)| client.widget(*root).is_some_and(|info| !info.hidden))
        .map_or(LayoutMode::Undetermined, |(_, mode)| *mode)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::model::widget::WidgetAttr;
    use crate::sys::client::WidgetAccess;
    use crate::sys::memory::MemoryClient;

    #[test]
    fn reports_the_visible_root() {
        let mut client = MemoryClient::classic_resizable();
        assert_eq!(detect(&client), LayoutMode::ClassicResizable);

        client.set_layout(LayoutMode::ModernResizable);
        assert_eq!(detect(&client), LayoutMode::ModernResizable);

        client.set_layout(LayoutMode::Fixed);
        assert_eq!(detect(&client), LayoutMode::Fixed);
    }

    #[test]
    fn undetermined_before_login_or_without_roots() {
        let mut client = MemoryClient::classic_resizable();
        client.game_state = GameState::LoginScreen;
        assert_eq!(detect(&client), LayoutMode::Undetermined);

        client.game_state = GameState::LoggedIn;
        client.set(ids::CLASSIC_RESIZABLE_ROOT, WidgetAttr::Hidden(true));
        assert_eq!(detect(&client), LayoutMode::Undetermined);

        let empty = MemoryClient::new(Default::default());
        assert_eq!(detect(&empty), LayoutMode::Undetermined);
    }

    #[test]
    fn classic_wins_ties() {
        let mut client = MemoryClient::classic_resizable();
        client.set(ids::FIXED_ROOT, WidgetAttr::Hidden(false));
        assert_eq!(detect(&client), LayoutMode::ClassicResizable);
    }
}
