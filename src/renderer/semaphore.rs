/// Semaphore trait - GPU-side synchronization primitive

/// GPU semaphore trait
///
/// An opaque synchronization primitive signaled by queue submissions and waited
/// on by later submissions. The core never waits on semaphores from the CPU;
/// ordering is expressed purely through wait/signal sets at submit time.
///
/// Identity matters for chaining: two `Arc<dyn Semaphore>` clones of the same
/// allocation denote the same GPU object (`Arc::ptr_eq`).
pub trait Semaphore: Send + Sync {}
