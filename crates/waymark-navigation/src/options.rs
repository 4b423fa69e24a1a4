use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LaunchFlags: u8 {
        /// Discard the whole stack before pushing.
        const CLEAR_STACK = 1;
        /// Replace the top entry when it came from the same template.
        const SINGLE_TOP = 1 << 1;
    }
}

/// Pop entries off the tail until the most recent entry whose template
/// pattern equals `pattern` is on top (or gone too, when `inclusive`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopUpTo {
    pub pattern: String,
    pub inclusive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavOptions {
    pub flags: LaunchFlags,
    pub pop_up_to: Option<PopUpTo>,
}

impl NavOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear-and-replace, e.g. after signing in.
    pub fn clear_stack() -> Self {
        Self {
            flags: LaunchFlags::CLEAR_STACK,
            pop_up_to: None,
        }
    }

    pub fn single_top(mut self) -> Self {
        self.flags |= LaunchFlags::SINGLE_TOP;
        self
    }

    pub fn pop_up_to(mut self, pattern: impl Into<String>, inclusive: bool) -> Self {
        self.pop_up_to = Some(PopUpTo {
            pattern: pattern.into(),
            inclusive,
        });
        self
    }

    /// How many entries from the bottom survive before the push.
    pub(crate) fn retained<'a, I>(&self, mut patterns: I) -> usize
    where
        I: DoubleEndedIterator<Item = &'a str> + ExactSizeIterator,
    {
        let len = patterns.len();
        if self.flags.contains(LaunchFlags::CLEAR_STACK) {
            return 0;
        }
        let Some(pop) = &self.pop_up_to else {
            return len;
        };
        match patterns.rposition(|p| p == pop.pattern) {
            Some(idx) if pop.inclusive => idx,
            Some(idx) => idx + 1,
            None => len,
        }
    }
}
