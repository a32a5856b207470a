//! The XP curve.
//!
//! Going from level `n` to `n + 1` costs `5n² + 50n + 100` XP, so level 1
//! needs 100 XP, level 2 needs 255 and so on.

#[inline]
pub const fn xp_to_next(level: u64) -> u64 {
    5 * level * level + 50 * level + 100
}

/// Total XP needed to reach `level`
pub const fn xp_for_level(level: u64) -> u64 {
    let mut total = 0;
    let mut n = 0;
    while n < level {
        total += xp_to_next(n);
        n += 1;
    }
    total
}

/// Highest level whose total is covered by `xp`
pub const fn level_for_xp(xp: u64) -> u64 {
    let mut level = 0;
    let mut remaining = xp;
    while remaining >= xp_to_next(level) {
        remaining -= xp_to_next(level);
        level += 1;
    }
    level
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub level: u64,
    pub xp: u64,
    pub next_level_xp: u64,
    /// XP earned since reaching `level`
    pub gained: u64,
    /// XP between `level` and the next one
    pub increment: u64,
}

impl Progress {
    pub const fn new(xp: u64) -> Progress {
        let level = level_for_xp(xp);
        let previous = xp_for_level(level);
        let next_level_xp = xp_for_level(level + 1);
        Progress {
            level,
            xp,
            next_level_xp,
            gained: xp - previous,
            increment: next_level_xp - previous,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.gained as f64 / self.increment as f64
    }

    pub fn percent(&self) -> String {
        let percent = format!("{:.2}", self.ratio() * 100.0);
        let trimmed = percent.trim_end_matches('0').trim_end_matches('.');
        format!("{trimmed}%")
    }
}

/// A bar of `width` cells filled proportionally to `ratio`
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
