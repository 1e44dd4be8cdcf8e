/// Raised by [`crate::Host::emit`] when the host cannot accept an
/// emission (e.g. no active editor). Non-fatal: the driver logs it and
/// otherwise ignores it, per `spec.md` §7 — emission is best-effort and
/// never rewinds matcher or mode-state-machine state.
#[derive(Debug, thiserror::Error)]
pub enum EmissionError {
    #[error("host has no active target for emission")]
    NoActiveTarget,
    #[error("host rejected emission: {0}")]
    Rejected(String),
}
