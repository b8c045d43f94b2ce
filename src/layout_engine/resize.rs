//! Window resizing to a configured aspect ratio.
//!
//! The host ignores a write of the window size it already holds, so an
//! unchanged size is committed in two steps: one pixel wider now, the exact
//! size on the next tick.

use tracing::debug;

use super::ids;
use crate::common::config::{ResizeBy, Settings};
use crate::sys::client::{Client, Dimension};

/// Outcome of a window size write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeCommit {
    Done,
    /// The exact size still has to be written on the next tick.
    FollowUp(Dimension),
}

/// Target window size keeping the stretched canvas' width (or height) and
/// deriving the other side from the ratio. `None` for a degenerate ratio.
pub fn aspect_ratio_size(stretched: Dimension, settings: &Settings) -> Option<Dimension> {
    let (ratio_w, ratio_h) = (settings.aspect_ratio_width, settings.aspect_ratio_height);
    if ratio_w < 1 || ratio_h < 1 {
        return None;
    }
    Some(match settings.resize_by {
        ResizeBy::Width => Dimension::new(stretched.width, scale(stretched.width, ratio_h, ratio_w)),
        ResizeBy::Height => Dimension::new(scale(stretched.height, ratio_w, ratio_h), stretched.height),
    })
}

/// `value * numerator / denominator`, saturating at `i32::MAX`. Ratio terms
/// come from the host unbounded.
fn scale(value: i32, numerator: i32, denominator: i32) -> i32 {
    let scaled = i64::from(value) * i64::from(numerator) / i64::from(denominator);
    i32::try_from(scaled).unwrap_or(i32::MAX)
}

/// Clamps to the fixed layout's game size below and the host's maximum above.
pub fn clamp_game_size(size: Dimension) -> Dimension {
    Dimension::new(
        size.width.clamp(ids::FIXED_GAME_WIDTH, ids::MAX_GAME_WIDTH),
        size.height.clamp(ids::FIXED_GAME_HEIGHT, ids::MAX_GAME_HEIGHT),
    )
}

pub fn commit_game_size<C: Client + ?Sized>(client: &mut C, size: Dimension) -> ResizeCommit {
    let size = clamp_game_size(size);
    if client.game_size() == Some(size) {
        debug!(?size, "window already at target size; nudging first");
        client.set_game_size(Dimension::new(size.width + 1, size.height));
        ResizeCommit::FollowUp(size)
    } else {
        client.set_game_size(size);
        ResizeCommit::Done
    }
}

/// Resizes the window to the configured ratio. Skipped while the full
/// canvas layer is not shown, since the stretched size is not meaningful
/// then.
pub fn resize_by_aspect_ratio<C: Client>(client: &mut C, settings: &Settings) -> Option<ResizeCommit> {
    if !settings.aspect_ratio_resize {
        return None;
    }
    let canvas = client.widget(ids::FULL_CANVAS_LAYER)?;
    if canvas.hidden {
        return None;
    }
    client.revalidate_scroll(ids::FULL_CANVAS_LAYER);
    let size = aspect_ratio_size(client.stretched_dimensions(), settings)?;
    Some(commit_game_size(client, size))
}

/// Writes the exact size queued by a previous [`ResizeCommit::FollowUp`].
pub fn finish_game_size<C: Client + ?Sized>(client: &mut C, size: Dimension) {
    client.set_game_size(clamp_game_size(size));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::sys::memory::MemoryClient;

    fn settings(resize_by: ResizeBy) -> Settings {
        Settings {
            aspect_ratio_resize: true,
            resize_by,
            ..Settings::default()
        }
    }

    #[test]
    fn ratio_derives_the_other_side() {
        let stretched = Dimension::new(1920, 1200);
        assert_eq!(
            aspect_ratio_size(stretched, &settings(ResizeBy::Width)),
            Some(Dimension::new(1920, 1080))
        );
        assert_eq!(
            aspect_ratio_size(stretched, &settings(ResizeBy::Height)),
            Some(Dimension::new(2133, 1200))
        );
    }

    #[test]
    fn extreme_ratios_saturate_instead_of_overflowing() {
        let mut settings = settings(ResizeBy::Width);
        settings.aspect_ratio_height = 2_000_000;
        let size = aspect_ratio_size(Dimension::new(1920, 1080), &settings).unwrap();
        assert_eq!(size, Dimension::new(1920, i32::MAX));
        assert_eq!(clamp_game_size(size), Dimension::new(1920, ids::MAX_GAME_HEIGHT));

        let mut settings = self::settings(ResizeBy::Height);
        settings.aspect_ratio_width = i32::MAX;
        settings.aspect_ratio_height = 1;
        let size = aspect_ratio_size(Dimension::new(1920, 1080), &settings).unwrap();
        assert_eq!(clamp_game_size(size), Dimension::new(ids::MAX_GAME_WIDTH, 1080));
    }

    #[test]
    fn degenerate_ratio_is_rejected() {
        let mut settings = settings(ResizeBy::Width);
        settings.aspect_ratio_width = 0;
        assert_eq!(aspect_ratio_size(Dimension::new(800, 600), &settings), None);
    }

    #[test]
    fn sizes_are_clamped_to_host_limits() {
        assert_eq!(clamp_game_size(Dimension::new(100, 100)), Dimension::new(765, 503));
        assert_eq!(clamp_game_size(Dimension::new(9000, 3000)), Dimension::new(7680, 2160));
        assert_eq!(clamp_game_size(Dimension::new(1280, 720)), Dimension::new(1280, 720));
    }

    #[test]
    fn unchanged_size_is_written_twice() {
        let mut client = MemoryClient::classic_resizable();
        client.game_size = Some(Dimension::new(1280, 720));

        let commit = commit_game_size(&mut client, Dimension::new(1280, 720));
        assert_eq!(commit, ResizeCommit::FollowUp(Dimension::new(1280, 720)));
        assert_eq!(client.game_size, Some(Dimension::new(1281, 720)));

        finish_game_size(&mut client, Dimension::new(1280, 720));
        assert_eq!(client.game_size_writes, vec![Dimension::new(1281, 720), Dimension::new(1280, 720)]);
    }

    #[test]
    fn changed_size_is_written_once() {
        let mut client = MemoryClient::classic_resizable();
        client.game_size = Some(Dimension::new(800, 600));
        assert_eq!(commit_game_size(&mut client, Dimension::new(1280, 720)), ResizeCommit::Done);
        assert_eq!(client.game_size_writes, vec![Dimension::new(1280, 720)]);
    }

    #[test]
    fn aspect_resize_is_off_by_default() {
        let mut client = MemoryClient::classic_resizable();
        assert_eq!(resize_by_aspect_ratio(&mut client, &Settings::default()), None);
        assert!(client.game_size_writes.is_empty());
    }
}
