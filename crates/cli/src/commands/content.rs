//! Content checks for the embedded city pages, guides and FAQ.

#![allow(clippy::print_stdout)]

use curbside_site::content::{ContentError, ContentRepository};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Load(#[from] ContentError),
    #[error("{0} content problem(s) found")]
    Problems(usize),
}

/// Load every page and report problems.
///
/// # Errors
///
/// Returns an error if content fails to parse or any page has problems.
pub fn check() -> Result<(), CheckError> {
    let content = ContentRepository::embedded()?;
    info!(
        cities = content.cities().count(),
        guides = content.guides().count(),
        faqs = content.faqs().len(),
        "Content loaded"
    );

    let problems = content.check();
    for problem in &problems {
        println!("{problem}");
    }

    if problems.is_empty() {
        println!("Content OK");
        Ok(())
    } else {
        Err(CheckError::Problems(problems.len()))
    }
}
