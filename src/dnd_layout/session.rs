/// Where the drag surface currently is in a pointer session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Pressed,
    Dragging,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ReleaseKind {
    Click,
    Drop,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Release {
    pub(super) kind: ReleaseKind,
    pub(super) elapsed: f64,
}

/// One pointer session per drag root: press time and whether it turned into a drag.
#[derive(Debug, Default)]
pub(super) struct PressSession {
    next_id: u64,
    active: Option<ActivePress>,
}

#[derive(Debug)]
struct ActivePress {
    id: u64,
    pressed_at: f64,
    dragging: bool,
}

impl PressSession {
    pub(super) fn phase(&self) -> DragPhase {
        match &self.active {
            None => DragPhase::Idle,
            Some(active) if active.dragging => DragPhase::Dragging,
            Some(_) => DragPhase::Pressed,
        }
    }

    pub(super) fn press(&mut self, time: f64) -> String {
        let id = self.next_id.max(1);
        self.next_id = id.saturating_add(1);
        let replaced = self.active.replace(ActivePress {
            id,
            pressed_at: time,
            dragging: false,
        });
        match replaced {
            Some(old) => format!("session PRESS id={id} time={time:.3} (replaces id={})", old.id),
            None => format!("session PRESS id={id} time={time:.3}"),
        }
    }

    /// `Pressed -> Dragging`. `None` if there is no press or it is already dragging.
    pub(super) fn begin_drag(&mut self) -> Option<String> {
        let active = self.active.as_mut()?;
        if active.dragging {
            return None;
        }
        active.dragging = true;
        Some(format!("session DRAG id={}", active.id))
    }

    /// End the session on pointer-up. `elapsed < click_threshold` is a click.
    ///
    /// Times are compared in whole microseconds so that e.g. `10.2 - 10.0` is not a hair
    /// under `0.2`.
    pub(super) fn release(&mut self, time: f64, click_threshold: f64) -> (Option<Release>, String) {
        let Some(active) = self.active.take() else {
            return (None, "session RELEASE ignored (no press)".to_owned());
        };

        let elapsed = time - active.pressed_at;
        let kind = if micros(elapsed) < micros(click_threshold) {
            ReleaseKind::Click
        } else {
            ReleaseKind::Drop
        };
        (
            Some(Release { kind, elapsed }),
            format!(
                "session RELEASE id={} kind={kind:?} elapsed={elapsed:.3} dragged={}",
                active.id, active.dragging
            ),
        )
    }

    pub(super) fn cancel(&mut self) -> Option<String> {
        let active = self.active.take()?;
        Some(format!("session CANCEL id={} dragged={}", active.id, active.dragging))
    }
}

fn micros(seconds: f64) -> i64 {
    (seconds * 1_000_000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_drag_release_walks_the_phases() {
        let mut s = PressSession::default();
        assert_eq!(s.phase(), DragPhase::Idle);

        s.press(1.0);
        assert_eq!(s.phase(), DragPhase::Pressed);

        assert!(s.begin_drag().is_some());
        assert!(s.begin_drag().is_none(), "already dragging");
        assert_eq!(s.phase(), DragPhase::Dragging);

        let (release, _) = s.release(1.5, 0.2);
        assert_eq!(release.map(|r| r.kind), Some(ReleaseKind::Drop));
        assert_eq!(s.phase(), DragPhase::Idle);
    }

    #[test]
    fn click_threshold_is_exclusive() {
        let mut s = PressSession::default();
        s.press(10.0);
        let (release, _) = s.release(10.15, 0.2);
        assert_eq!(release.map(|r| r.kind), Some(ReleaseKind::Click));

        s.press(10.0);
        let (release, _) = s.release(10.2, 0.2);
        assert_eq!(release.map(|r| r.kind), Some(ReleaseKind::Drop));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut s = PressSession::default();
        let (release, msg) = s.release(3.0, 0.2);
        assert!(release.is_none());
        assert!(msg.contains("ignored"), "unexpected message: {msg}");
        assert!(s.cancel().is_none());
    }
}
