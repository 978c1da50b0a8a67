use anyhow::{Result, bail};

use crate::api::Session;
use crate::output;
use crate::provision::provision_lang_pages;
use crate::status;
use crate::ui::{Spinner, Style};

pub struct SetupOptions {
    pub domain: String,
}

/// Provisions `MediaWiki:Lang` pages for every language the wiki supports.
///
/// The language list and the content language are fetched concurrently;
/// the pages themselves are created strictly one at a time.
pub async fn run_setup(options: SetupOptions) -> Result<()> {
    let access_token = resolve_access_token(std::env::var("ACCESS_TOKEN").ok())?;
    let session = Session::new(&options.domain, &access_token)?;

    let spinner = (!output::is_quiet()).then(|| Spinner::new("Fetching wiki metadata..."));
    let gathered = tokio::try_join!(session.language_codes(), session.site_content_language());
    if let Some(spinner) = &spinner {
        spinner.stop();
    }
    let (language_codes, content_language) = gathered?;

    status!(
        "{}: {} languages, content language {}",
        Style::value(&options.domain),
        language_codes.len(),
        Style::code(&content_language)
    );

    let report = provision_lang_pages(&session, &language_codes, &content_language).await?;

    status!(
        "{}",
        Style::success(format!(
            "Done: {} created, {} skipped.",
            report.created, report.skipped
        ))
    );

    Ok(())
}

/// Resolves the bearer token from the raw environment value, rejecting
/// absent or blank values before any network call is made.
fn resolve_access_token(raw: Option<String>) -> Result<String> {
    match raw {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ => bail!("ACCESS_TOKEN environment variable must be set"),
    }
}
