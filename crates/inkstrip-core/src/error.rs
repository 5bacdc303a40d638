//! Error helpers shared by all inkstrip crates.

use std::{error, fmt};

pub type BoxedError = Box<dyn error::Error + Send + Sync + 'static>;
pub type BoxedErrorResult<T> = std::result::Result<T, BoxedError>;
pub type WhateverResult<T> = std::result::Result<T, snafu::Whatever>;

/// Displays an error followed by its whole source chain on one line
pub struct FmtCompactError<'e, E>(pub &'e E);

impl<E> fmt::Display for FmtCompactError<'_, E>
where
    E: error::Error,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;

        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }

        Ok(())
    }
}

pub trait FmtCompact {
    type Report: fmt::Display;
    fn fmt_compact(self) -> Self::Report;
}

impl<'e, E> FmtCompact for &'e E
where
    E: error::Error,
{
    type Report = FmtCompactError<'e, E>;

    fn fmt_compact(self) -> Self::Report {
        FmtCompactError(self)
    }
}
