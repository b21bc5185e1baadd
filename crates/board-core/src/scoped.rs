//! Scoped resource helpers.
//!
//! [`with_lease`] acquires a resource (a wake lock, a decoder slot, ...) for
//! a bounded time, runs a closure, and always releases the resource again,
//! even if the closure panics. Release failures are logged and swallowed so
//! they never mask the closure's result.
//!
//! [`read_stream`] feeds a reader to a callback in fixed-size chunks.

use std::io::{ErrorKind, Read};
use std::time::Duration;

use crate::error::Result;

/// Default chunk size used by [`read_stream`] callers.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// A resource that is held for a bounded time.
pub trait Lease {
    /// Human readable name used in logs.
    fn name(&self) -> &str;

    /// Acquire the resource for at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is unavailable.
    fn acquire(&mut self, timeout: Duration) -> Result<()>;

    /// Release the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if releasing fails; callers of [`with_lease`] only
    /// log it.
    fn release(&mut self) -> Result<()>;
}

struct ReleaseOnDrop<'a, L: Lease + ?Sized> {
    lease: &'a mut L,
}

impl<L: Lease + ?Sized> Drop for ReleaseOnDrop<'_, L> {
    fn drop(&mut self) {
        tracing::debug!(target: "board_core::scoped", resource = self.lease.name(), "releasing lease");
        if let Err(e) = self.lease.release() {
            tracing::warn!(target: "board_core::scoped", resource = self.lease.name(), error = %e, "release failed");
        }
    }
}

/// Hold `lease` for at most `timeout` while running `f`.
///
/// # Errors
///
/// Returns the acquisition error; `f` is not run in that case.
pub fn with_lease<L, R, F>(lease: &mut L, timeout: Duration, f: F) -> Result<R>
where
    L: Lease + ?Sized,
    F: FnOnce() -> R,
{
    lease.acquire(timeout)?;
    let _guard = ReleaseOnDrop { lease };
    Ok(f())
}

/// Read `reader` to its end, handing each chunk to `f`.
///
/// The slice passed to `f` is only valid for the duration of the call.
/// Interrupted reads are retried.
///
/// # Errors
///
/// Returns [`CoreError::Stream`](crate::CoreError::Stream) if a read fails.
pub fn read_stream<R, F>(mut reader: R, chunk_size: usize, mut f: F) -> Result<u64>
where
    R: Read,
    F: FnMut(&[u8]),
{
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        f(&buffer[..read]);
        total += read as u64;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[derive(Default)]
    struct FakeLock {
        held: bool,
        acquired: usize,
        released: usize,
        fail_acquire: bool,
        fail_release: bool,
    }

    impl Lease for FakeLock {
        fn name(&self) -> &str {
            "fake"
        }

        fn acquire(&mut self, _timeout: Duration) -> Result<()> {
            if self.fail_acquire {
                return Err(CoreError::Acquire {
                    resource: "fake".into(),
                    reason: "busy".into(),
                });
            }
            self.held = true;
            self.acquired += 1;
            Ok(())
        }

        fn release(&mut self) -> Result<()> {
            self.held = false;
            self.released += 1;
            if self.fail_release {
                return Err(CoreError::Acquire {
                    resource: "fake".into(),
                    reason: "already released".into(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_with_lease_releases() {
        let mut lock = FakeLock::default();
        let value = with_lease(&mut lock, Duration::from_secs(1), || 42).unwrap();

        assert_eq!(value, 42);
        assert!(!lock.held);
        assert_eq!((lock.acquired, lock.released), (1, 1));
    }

    #[test]
    fn test_with_lease_release_error_is_swallowed() {
        let mut lock = FakeLock {
            fail_release: true,
            ..Default::default()
        };
        let value = with_lease(&mut lock, Duration::from_millis(10), || "done").unwrap();
        assert_eq!(value, "done");
        assert_eq!(lock.released, 1);
    }

    #[test]
    fn test_with_lease_acquire_error_skips_closure() {
        let mut lock = FakeLock {
            fail_acquire: true,
            ..Default::default()
        };
        let mut ran = false;
        let result = with_lease(&mut lock, Duration::from_millis(10), || ran = true);

        assert!(result.is_err());
        assert!(!ran);
        assert_eq!(lock.released, 0);
    }

    #[test]
    fn test_with_lease_releases_on_panic() {
        let mut lock = FakeLock::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = with_lease(&mut lock, Duration::from_secs(1), || -> u8 { panic!("boom") });
        }));

        assert!(result.is_err());
        assert_eq!(lock.released, 1);
    }

    #[test]
    fn test_read_stream_chunks() {
        let data: Vec<u8> = (0..100u8).collect();
        let mut chunks = Vec::new();
        let total = read_stream(&data[..], 32, |chunk| chunks.push(chunk.len())).unwrap();

        assert_eq!(total, 100);
        assert_eq!(chunks, vec![32, 32, 32, 4]);
    }

    #[test]
    fn test_read_stream_empty() {
        let total = read_stream(std::io::empty(), DEFAULT_CHUNK_SIZE, |_| {
            panic!("no chunks expected")
        })
        .unwrap();
        assert_eq!(total, 0);
    }
}
