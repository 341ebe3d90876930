// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust types that define what the system is about:
// labels, classes, predictions, statistics, and the errors
// a user can run into.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO ML-specific code
//   - File access only for reading the label store itself
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The ten cloud classes and the shared class-index derivation
pub mod classes;

// Typed errors for missing and malformed inputs
pub mod error;

// The JSON identifier → label mapping
pub mod label_store;

// Ranked (class, probability) rows
pub mod prediction;

// Per-class counts for the statistics report
pub mod stats;

// Core abstractions (traits) that other layers implement
pub mod traits;
