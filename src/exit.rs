use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    InvalidArgs,
    PlanFailed,
    CatalogFailed,
}

impl ExitCode {
    pub const fn as_i32(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::InvalidArgs => 2,
            ExitCode::PlanFailed => 10,
            ExitCode::CatalogFailed => 20,
        }
    }
}

#[derive(Debug)]
pub struct ExitError {
    pub code: ExitCode,
    pub err: anyhow::Error,
}

impl ExitError {
    pub fn new(code: ExitCode, err: anyhow::Error) -> Self {
        Self { code, err }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.err.fmt(f)
    }
}

impl std::error::Error for ExitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.err.source()
    }
}

pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(exit) = err.downcast_ref::<ExitError>() {
        return exit.code.as_i32();
    }
    ExitCode::PlanFailed.as_i32()
}

pub fn invalid_args(message: impl Into<String>) -> anyhow::Error {
    ExitError::new(ExitCode::InvalidArgs, anyhow::anyhow!(message.into())).into()
}

pub fn invalid_args_err(err: anyhow::Error) -> anyhow::Error {
    ExitError::new(ExitCode::InvalidArgs, err).into()
}

pub fn catalog_err(err: impl Into<anyhow::Error>) -> anyhow::Error {
    ExitError::new(ExitCode::CatalogFailed, err.into()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_follows_wrapped_error() {
        assert_eq!(exit_code(&invalid_args("bad flag")), 2);
        assert_eq!(exit_code(&catalog_err(anyhow::anyhow!("bad catalog"))), 20);
        assert_eq!(exit_code(&anyhow::anyhow!("anything else")), 10);
    }

    #[test]
    fn wrapped_error_keeps_its_message() {
        let err = invalid_args_err(anyhow::anyhow!("inner").context("outer"));
        assert_eq!(err.to_string(), "outer");
        let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
        assert!(chain.iter().any(|m| m == "inner"), "{chain:?}");
    }
}
