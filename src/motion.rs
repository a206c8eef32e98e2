#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransitionPreset {
    None,
    Fade,
    FadeUp,
    FadeDown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Easing {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MotionTransition {
    pub preset: TransitionPreset,
    pub duration_ms: u16,
    pub offset_px: i16,
    pub easing: Easing,
}

impl Default for MotionTransition {
    fn default() -> Self {
        Self {
            preset: TransitionPreset::Fade,
            duration_ms: 220,
            offset_px: 4,
            easing: Easing::EaseOut,
        }
    }
}

impl MotionTransition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset(mut self, preset: TransitionPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn duration_ms(mut self, duration_ms: u16) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn offset_px(mut self, offset_px: i16) -> Self {
        self.offset_px = offset_px;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}
