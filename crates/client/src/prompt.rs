/// Asks the user before anything destructive happens.
pub trait Prompter {
    fn confirm(&self, message: &str) -> bool;
}

/// Answers every question the same way. Used by `--yes` and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoAnswer(pub bool);

impl Prompter for AutoAnswer {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}
