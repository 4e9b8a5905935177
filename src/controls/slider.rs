//! Bounded slider and exclusive-choice selector.
//!
//! Both controls own their invariants: a slider's value is always inside its
//! bounds and on its step grid; a selector always has exactly one option
//! selected. Setters return the new value only when it actually changed, which
//! is the "value changed" notification the controller reacts to.

/// Floating-point slider with inclusive bounds and a fixed step.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    min: f64,
    max: f64,
    step: f64,
    value: f64,
}

impl Slider {
    /// Create a slider; `initial` is clamped and snapped like any other input.
    pub fn new(bounds: [f64; 2], step: f64, initial: f64) -> Self {
        let mut slider = Self {
            min: bounds[0],
            max: bounds[1],
            step,
            value: bounds[0],
        };
        slider.value = slider.normalize(initial);
        slider
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn bounds(&self) -> [f64; 2] {
        [self.min, self.max]
    }

    /// Position of the value within the bounds, `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.max > self.min {
            (self.value - self.min) / (self.max - self.min)
        } else {
            0.0
        }
    }

    /// Two-decimal readout shown next to the slider label.
    pub fn readout(&self) -> String {
        format!("{:.2}", self.value)
    }

    /// Set a new value. Returns `Some(new)` only if the stored value changed.
    pub fn set(&mut self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let next = self.normalize(value);
        if next == self.value {
            return None;
        }
        self.value = next;
        Some(next)
    }

    /// Move by a whole number of steps.
    pub fn nudge(&mut self, steps: i32) -> Option<f64> {
        self.set(self.value + f64::from(steps) * self.step)
    }

    fn normalize(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).clamp(self.min, self.max);
        // Drop accumulated binary noise so 33 * 0.05 reads back as 1.65.
        (snapped * 1e9).round() / 1e9
    }
}

/// Mutually exclusive selection over a fixed option list.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioGroup<T: Copy + PartialEq + 'static> {
    options: &'static [T],
    selected: usize,
}

impl<T: Copy + PartialEq + 'static> RadioGroup<T> {
    /// Create a selector; falls back to the first option if `initial` is not listed.
    ///
    /// # Panics
    /// Panics if `options` is empty.
    pub fn new(options: &'static [T], initial: T) -> Self {
        assert!(!options.is_empty(), "RadioGroup needs at least one option");
        let selected = options.iter().position(|&o| o == initial).unwrap_or(0);
        Self { options, selected }
    }

    pub fn value(&self) -> T {
        self.options[self.selected]
    }

    pub fn options(&self) -> &'static [T] {
        self.options
    }

    /// Select an option. Returns `Some(new)` only if the selection changed.
    pub fn select(&mut self, value: T) -> Option<T> {
        let idx = self.options.iter().position(|&o| o == value)?;
        if idx == self.selected {
            return None;
        }
        self.selected = idx;
        Some(value)
    }

    /// Move the selection by `delta` options, wrapping around.
    pub fn cycle(&mut self, delta: i32) -> Option<T> {
        let n = self.options.len() as i64;
        let idx = (self.selected as i64 + i64::from(delta)).rem_euclid(n) as usize;
        self.select(self.options[idx])
    }
}
