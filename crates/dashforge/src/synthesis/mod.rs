//! Artifact synthesis, deterministic rendering and verification.
//!
//! The synthesis stage asks the configured provider for an artifact; the
//! verifier checks whatever comes back, and [`template::render`] supplies a
//! guaranteed-valid document when synthesis is unavailable or fails
//! verification.

mod artifact;
pub mod template;
mod verify;

pub use artifact::{Artifact, ArtifactKind, ArtifactOrigin, SynthesisInput};
pub use verify::{
    ArtifactVerifier, MIN_ARTIFACT_LENGTH, SemanticReview, VerificationReport, VerificationStatus,
};
