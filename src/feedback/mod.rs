use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_timer::Delay;

use crate::host::BannerDom;
use crate::motion::{Easing, MotionTransition, TransitionPreset};

pub type DismissFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Timing contract for one banner: linger fully visible, run the exit
/// transition, then drop out of the document.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DismissSchedule {
    pub linger: Duration,
    pub exit: MotionTransition,
}

impl Default for DismissSchedule {
    fn default() -> Self {
        Self {
            linger: Duration::from_millis(4_200),
            exit: MotionTransition::new()
                .preset(TransitionPreset::FadeUp)
                .duration_ms(220)
                .offset_px(4)
                .easing(Easing::EaseOut),
        }
    }
}

impl DismissSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linger(mut self, value: Duration) -> Self {
        self.linger = value;
        self
    }

    pub fn exit(mut self, value: MotionTransition) -> Self {
        self.exit = value;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AutoDismiss {
    schedule: DismissSchedule,
}

impl AutoDismiss {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: DismissSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> DismissSchedule {
        self.schedule
    }

    /// The dismissal task for one banner. Scheduling returns immediately;
    /// the host spawns the future on its event loop. There is no
    /// cancellation path once scheduled.
    pub fn dismissal<B: BannerDom>(&self, mut banner: B) -> DismissFuture {
        let DismissSchedule { linger, exit } = self.schedule;
        Box::pin(async move {
            Delay::new(linger).await;
            banner.begin_exit(exit);
            Delay::new(Duration::from_millis(u64::from(exit.duration_ms))).await;
            banner.remove();
        })
    }

    /// One-time page sweep: banners that opted in get a dismissal task,
    /// everything else is left alone.
    pub fn sweep<B, I>(&self, banners: I) -> Vec<DismissFuture>
    where
        B: BannerDom,
        I: IntoIterator<Item = B>,
    {
        let tasks = banners
            .into_iter()
            .filter(|banner| banner.auto_dismiss())
            .map(|banner| self.dismissal(banner))
            .collect::<Vec<_>>();
        #[cfg(feature = "tracing")]
        tracing::debug!(banners = tasks.len(), "scheduled banner dismissals");
        tasks
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::host::MemoryBanner;

    #[test]
    fn default_schedule_matches_dismissal_contract() {
        let schedule = DismissSchedule::default();
        assert_eq!(schedule.linger, Duration::from_millis(4_200));
        assert_eq!(schedule.exit.duration_ms, 220);
        assert_eq!(schedule.exit.preset, TransitionPreset::FadeUp);
        assert_eq!(schedule.exit.offset_px, 4);
    }

    #[test]
    fn dismissal_fades_then_removes() {
        let schedule = DismissSchedule::new()
            .linger(Duration::from_millis(20))
            .exit(MotionTransition::new().duration_ms(10));
        let dismiss = AutoDismiss::with_schedule(schedule);

        let banner = MemoryBanner::new(true);
        block_on(dismiss.dismissal(banner.clone()));

        assert_eq!(banner.exit_transition(), Some(schedule.exit));
        assert!(banner.is_removed());
    }

    #[test]
    fn sweep_skips_banners_without_the_opt_in() {
        let schedule = DismissSchedule::new()
            .linger(Duration::from_millis(5))
            .exit(MotionTransition::new().duration_ms(1));
        let dismiss = AutoDismiss::with_schedule(schedule);

        let opted_in = MemoryBanner::new(true);
        let untouched = MemoryBanner::new(false);
        let tasks = dismiss.sweep(vec![opted_in.clone(), untouched.clone()]);
        assert_eq!(tasks.len(), 1);

        for task in tasks {
            block_on(task);
        }
        assert!(opted_in.is_removed());
        assert!(!untouched.is_exiting());
        assert!(!untouched.is_removed());
    }
}
