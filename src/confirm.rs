/// Yes/no decision supplied by whoever drives the engine.
///
/// The CLI implements this with a terminal prompt; tests use closures.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Accepts every proposal.
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines every proposal.
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
