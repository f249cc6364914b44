//! Worker count policies.

/// Floor applied by [`size_workers`].
pub const MIN_WORKERS: usize = 3;
/// Ceiling applied by [`size_workers`].
pub const MAX_WORKERS: usize = 20;

/// One worker per two tasks, clamped to `[MIN_WORKERS, MAX_WORKERS]`.
pub fn size_workers(task_count: usize) -> usize {
    DynamicSizing::default().workers_for(task_count)
}

/// Maps a task count to a worker count.
pub trait SizingStrategy: Send + Sync {
    fn workers_for(&self, task_count: usize) -> usize;
}

/// Scales linearly with the workload between a floor and a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicSizing {
    pub min: usize,
    pub max: usize,
}

impl Default for DynamicSizing {
    fn default() -> Self {
        Self {
            min: MIN_WORKERS,
            max: MAX_WORKERS,
        }
    }
}

impl SizingStrategy for DynamicSizing {
    fn workers_for(&self, task_count: usize) -> usize {
        (task_count / 2).clamp(self.min, self.max)
    }
}

/// Always the same number of workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSizing(pub usize);

impl SizingStrategy for FixedSizing {
    fn workers_for(&self, _task_count: usize) -> usize {
        self.0.max(1)
    }
}

impl<F> SizingStrategy for F
where
    F: Fn(usize) -> usize + Send + Sync,
{
    fn workers_for(&self, task_count: usize) -> usize {
        self(task_count).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_workers_bounds() {
        assert_eq!(size_workers(0), 3);
        assert_eq!(size_workers(1), 3);
        assert_eq!(size_workers(7), 3);
        assert_eq!(size_workers(8), 4);
        assert_eq!(size_workers(25), 12);
        assert_eq!(size_workers(40), 20);
        assert_eq!(size_workers(10_000), 20);
    }

    #[test]
    fn test_size_workers_matches_clamp() {
        for n in 0..500 {
            let workers = size_workers(n);
            assert!((MIN_WORKERS..=MAX_WORKERS).contains(&workers));
            assert_eq!(workers, (n / 2).clamp(MIN_WORKERS, MAX_WORKERS));
        }
    }

    #[test]
    fn test_pluggable_strategies() {
        assert_eq!(FixedSizing(10).workers_for(1), 10);
        assert_eq!(FixedSizing(10).workers_for(1_000), 10);

        let custom = DynamicSizing { min: 1, max: 4 };
        assert_eq!(custom.workers_for(2), 1);
        assert_eq!(custom.workers_for(100), 4);

        let per_task = |n: usize| n;
        assert_eq!(per_task.workers_for(6), 6);
        assert_eq!(per_task.workers_for(0), 1);
    }
}
