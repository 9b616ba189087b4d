//! # Observability
//!
//! [`setup_tracing`] installs the subscriber used by binaries built on the framework: compact
//! output, no module targets (actors log an `entity_type` field instead) and filtering through
//! `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info cargo run     # lifecycle: Actor started / Created / Deleted / Shutdown
//! RUST_LOG=debug cargo run    # plus full payloads and every Get / List
//! ```

use tracing_subscriber::EnvFilter;

/// Install the global compact subscriber. Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

