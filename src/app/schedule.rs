use eframe::egui::Context;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct FrameRequest(pub u64);

/// Source of "draw again soon" callbacks. The egui implementation asks the
/// context for a repaint; tests swap in a manual clock.
pub(in crate::app) trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

pub(in crate::app) struct EguiScheduler {
    ctx: Context,
    next: u64,
}

impl EguiScheduler {
    pub(in crate::app) fn new(ctx: Context) -> Self {
        Self { ctx, next: 0 }
    }
}

impl FrameScheduler for EguiScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next = self.next.wrapping_add(1);
        self.ctx.request_repaint();
        FrameRequest(self.next)
    }

    // egui coalesces repaint requests itself; a stale one only costs an idle frame
    // and `begin_frame` ignores it.
    fn cancel_frame(&mut self, _request: FrameRequest) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) enum LoopState {
    #[default]
    Idle,
    Scheduled(FrameRequest),
}

/// At most one frame is ever pending. Every state change calls `schedule`;
/// the frame body calls `begin_frame` and reschedules only while there is
/// still motion to show.
pub(in crate::app) struct RenderLoop {
    state: LoopState,
    scheduler: Box<dyn FrameScheduler>,
}

impl RenderLoop {
    pub(in crate::app) fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            state: LoopState::Idle,
            scheduler,
        }
    }

    #[cfg(test)]
    pub(in crate::app) fn is_scheduled(&self) -> bool {
        matches!(self.state, LoopState::Scheduled(_))
    }

    pub(in crate::app) fn schedule(&mut self) {
        if let LoopState::Scheduled(pending) = self.state {
            self.scheduler.cancel_frame(pending);
        }
        self.state = LoopState::Scheduled(self.scheduler.request_frame());
    }

    /// Consumes the pending request. Returns `false` when no frame was due.
    pub(in crate::app) fn begin_frame(&mut self) -> bool {
        match self.state {
            LoopState::Scheduled(_) => {
                self.state = LoopState::Idle;
                true
            }
            LoopState::Idle => false,
        }
    }

    pub(in crate::app) fn cancel(&mut self) {
        if let LoopState::Scheduled(pending) = self.state {
            self.scheduler.cancel_frame(pending);
        }
        self.state = LoopState::Idle;
    }
}

#[cfg(test)]
pub(in crate::app) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{FrameRequest, FrameScheduler};

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub(in crate::app) struct SchedulerLog {
        pub requested: Vec<FrameRequest>,
        pub cancelled: Vec<FrameRequest>,
    }

    impl SchedulerLog {
        pub(in crate::app) fn live(&self) -> usize {
            self.requested.len() - self.cancelled.len()
        }
    }

    #[derive(Default)]
    pub(in crate::app) struct ManualScheduler {
        next: u64,
        log: Rc<RefCell<SchedulerLog>>,
    }

    impl ManualScheduler {
        pub(in crate::app) fn new() -> (Self, Rc<RefCell<SchedulerLog>>) {
            let scheduler = Self::default();
            let log = Rc::clone(&scheduler.log);
            (scheduler, log)
        }
    }

    impl FrameScheduler for ManualScheduler {
        fn request_frame(&mut self) -> FrameRequest {
            self.next += 1;
            let request = FrameRequest(self.next);
            self.log.borrow_mut().requested.push(request);
            request
        }

        fn cancel_frame(&mut self, request: FrameRequest) {
            self.log.borrow_mut().cancelled.push(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualScheduler;
    use super::*;

    #[test]
    fn repeated_schedules_leave_one_pending_frame() {
        let (scheduler, log) = ManualScheduler::new();
        let mut render_loop = RenderLoop::new(Box::new(scheduler));

        render_loop.schedule();
        render_loop.schedule();
        render_loop.schedule();

        assert_eq!(log.borrow().live(), 1);
        assert_eq!(render_loop.state, LoopState::Scheduled(FrameRequest(3)));
        assert_eq!(
            log.borrow().cancelled,
            vec![FrameRequest(1), FrameRequest(2)]
        );
    }

    #[test]
    fn begin_frame_consumes_the_request() {
        let (scheduler, _log) = ManualScheduler::new();
        let mut render_loop = RenderLoop::new(Box::new(scheduler));

        assert!(!render_loop.begin_frame());
        render_loop.schedule();
        assert!(render_loop.begin_frame());
        assert_eq!(render_loop.state, LoopState::Idle);
        assert!(!render_loop.begin_frame());
    }

    #[test]
    fn cancel_returns_to_idle() {
        let (scheduler, log) = ManualScheduler::new();
        let mut render_loop = RenderLoop::new(Box::new(scheduler));

        render_loop.schedule();
        render_loop.cancel();
        assert!(!render_loop.is_scheduled());
        assert_eq!(log.borrow().live(), 0);

        render_loop.cancel();
        assert_eq!(log.borrow().cancelled.len(), 1);
    }
}
