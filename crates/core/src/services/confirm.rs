/// Yes/no decision asked before a destructive action.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

/// For environments that cannot prompt: always proceed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
