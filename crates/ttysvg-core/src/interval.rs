/// A value that was the visible state of one unit from `begin` until `end`.
///
/// `end` is `None` while the state is still current; it is filled in exactly
/// once, either when the value changes or when the session is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedInterval<V> {
    pub value: V,
    pub begin: f64,
    pub end: Option<f64>,
}

impl<V> TimedInterval<V> {
    pub fn open(value: V, begin: f64) -> Self {
        Self {
            value,
            begin,
            end: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn duration(&self) -> Option<f64> {
        self.end.map(|end| end - self.begin)
    }

    /// Half-open membership: `begin <= t < end`.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.begin && self.end.is_none_or(|end| t < end)
    }

    pub(crate) fn close(&mut self, end: f64) {
        debug_assert!(self.end.is_none(), "interval closed twice");
        self.end = Some(end);
    }
}
