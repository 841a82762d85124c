//! Permit pool bounding concurrent visits.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{AcquireError, Semaphore, SemaphorePermit};

/// Fixed-capacity permit pool.
///
/// One permit brackets the visit and neighbor listing of a single node.
/// Queueing and claiming are not gated by it.
#[derive(Debug)]
pub struct ParallelismLimiter {
    semaphore: Semaphore,
    capacity: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ParallelismLimiter {
    /// Create a limiter with `capacity` permits.
    ///
    /// A capacity of zero would never hand out a permit, so it is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Semaphore::new(capacity),
            capacity,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Wait for a permit. It is returned to the pool when dropped.
    pub async fn acquire(&self) -> Result<Permit<'_>, AcquireError> {
        let permit = self.semaphore.acquire().await?;
        let in_flight = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(in_flight, Ordering::AcqRel);
        Ok(Permit {
            _permit: permit,
            in_flight: &self.in_flight,
        })
    }

    /// Number of permits in the pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently held.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Highest number of permits held at the same time.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }
}

/// A held permit.
#[derive(Debug)]
pub struct Permit<'a> {
    _permit: SemaphorePermit<'a>,
    in_flight: &'a AtomicUsize,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        // Runs before the semaphore permit field is released.
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity_is_clamped() {
        let limiter = ParallelismLimiter::new(0);
        assert_eq!(limiter.capacity(), 1);
    }

    #[tokio::test]
    async fn test_permit_released_on_drop() {
        let limiter = ParallelismLimiter::new(1);

        let permit = limiter.acquire().await.unwrap();
        assert_eq!(limiter.in_flight(), 1);
        drop(permit);
        assert_eq!(limiter.in_flight(), 0);

        let _again = limiter.acquire().await.unwrap();
        assert_eq!(limiter.peak(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_peak_never_exceeds_capacity() {
        let limiter = Arc::new(ParallelismLimiter::new(3));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    let _permit = limiter.acquire().await.unwrap();
                    tokio::time::sleep(Duration::from_millis(2)).await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(limiter.peak() <= 3);
        assert!(limiter.peak() >= 1);
        assert_eq!(limiter.in_flight(), 0);
    }
}
