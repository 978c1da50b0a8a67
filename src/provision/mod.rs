//! Page title derivation and the creation loop.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::api::{CreateOutcome, Session};

/// Title of the page holding the wiki's own content-language code. Every
/// other language gets a subpage of this.
pub const PAGE_BASE: &str = "MediaWiki:Lang";

/// Change summary attached to every created page.
pub const EDIT_SUMMARY: &str = "MediaWiki:Lang ({{int:lang}}) setup";

/// The write operation the provisioning loop needs. [`Session`] is the real
/// implementation; tests substitute a scripted mock.
#[async_trait]
pub trait WikiWriteApi {
    async fn create_page(&self, title: &str, text: &str, summary: &str) -> Result<CreateOutcome>;
}

#[async_trait]
impl WikiWriteApi for Session {
    async fn create_page(&self, title: &str, text: &str, summary: &str) -> Result<CreateOutcome> {
        Session::create_page(self, title, text, summary).await
    }
}

/// Derives the target page title for a language code.
///
/// The wiki's content language owns the base page; every other code gets
/// `MediaWiki:Lang/{code}`.
#[must_use]
pub fn page_title(code: &str, content_language: &str) -> String {
    if code == content_language {
        PAGE_BASE.to_string()
    } else {
        format!("{PAGE_BASE}/{code}")
    }
}

/// Counts of what a provisioning run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SetupReport {
    pub created: usize,
    pub skipped: usize,
}

/// Creates one `MediaWiki:Lang` page per language code, strictly in list
/// order, each page's text being the code itself.
///
/// Pages that already exist are skipped; any other edit failure aborts the
/// run immediately, leaving the remaining codes unattempted.
pub async fn provision_lang_pages<A: WikiWriteApi>(
    api: &A,
    language_codes: &[String],
    content_language: &str,
) -> Result<SetupReport> {
    let mut report = SetupReport::default();

    for code in language_codes {
        let title = page_title(code, content_language);
        println!("Creating {title}...");

        let outcome = api
            .create_page(&title, code, EDIT_SUMMARY)
            .await
            .with_context(|| format!("failed to create {title}"))?;
        match outcome {
            CreateOutcome::Created => report.created += 1,
            CreateOutcome::AlreadyExists => {
                println!("Skipping {title}, exists already.");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use anyhow::bail;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct EditRequest {
        title: String,
        text: String,
        summary: String,
    }

    #[derive(Default)]
    struct MockWiki {
        existing: Vec<String>,
        fail_on: Option<String>,
        requests: Mutex<Vec<EditRequest>>,
    }

    impl MockWiki {
        fn requests(&self) -> Vec<EditRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WikiWriteApi for MockWiki {
        async fn create_page(
            &self,
            title: &str,
            text: &str,
            summary: &str,
        ) -> Result<CreateOutcome> {
            self.requests.lock().unwrap().push(EditRequest {
                title: title.to_string(),
                text: text.to_string(),
                summary: summary.to_string(),
            });
            if self.fail_on.as_deref() == Some(title) {
                bail!("edit of {title} failed: [ratelimited]");
            }
            if self.existing.iter().any(|existing| existing == title) {
                return Ok(CreateOutcome::AlreadyExists);
            }
            Ok(CreateOutcome::Created)
        }
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_page_title_content_language_owns_base_page() {
        assert_eq!(page_title("en", "en"), "MediaWiki:Lang");
    }

    #[test]
    fn test_page_title_other_languages_get_subpages() {
        assert_eq!(page_title("de", "en"), "MediaWiki:Lang/de");
        assert_eq!(page_title("zh-hans", "en"), "MediaWiki:Lang/zh-hans");
    }

    #[tokio::test]
    async fn test_one_request_per_code_in_order() {
        let wiki = MockWiki::default();

        let report = provision_lang_pages(&wiki, &codes(&["en", "de"]), "en")
            .await
            .unwrap();

        assert_eq!(report, SetupReport { created: 2, skipped: 0 });
        assert_eq!(
            wiki.requests(),
            vec![
                EditRequest {
                    title: "MediaWiki:Lang".to_string(),
                    text: "en".to_string(),
                    summary: EDIT_SUMMARY.to_string(),
                },
                EditRequest {
                    title: "MediaWiki:Lang/de".to_string(),
                    text: "de".to_string(),
                    summary: EDIT_SUMMARY.to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_page_is_skipped_and_loop_continues() {
        let wiki = MockWiki {
            existing: vec!["MediaWiki:Lang/de".to_string()],
            ..MockWiki::default()
        };

        let report = provision_lang_pages(&wiki, &codes(&["en", "de", "fr"]), "en")
            .await
            .unwrap();

        assert_eq!(report, SetupReport { created: 2, skipped: 1 });
        assert_eq!(wiki.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_unexpected_failure_aborts_remaining_codes() {
        let wiki = MockWiki {
            fail_on: Some("MediaWiki:Lang/de".to_string()),
            ..MockWiki::default()
        };

        let error = provision_lang_pages(&wiki, &codes(&["en", "de", "fr"]), "en")
            .await
            .unwrap_err();

        assert!(error.to_string().contains("MediaWiki:Lang/de"));
        // fr was never attempted.
        let titles: Vec<String> = wiki.requests().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["MediaWiki:Lang", "MediaWiki:Lang/de"]);
    }

    #[tokio::test]
    async fn test_second_run_creates_nothing() {
        let wiki = MockWiki {
            existing: vec![
                "MediaWiki:Lang".to_string(),
                "MediaWiki:Lang/de".to_string(),
            ],
            ..MockWiki::default()
        };

        let report = provision_lang_pages(&wiki, &codes(&["en", "de"]), "en")
            .await
            .unwrap();

        assert_eq!(report, SetupReport { created: 0, skipped: 2 });
    }

    #[tokio::test]
    async fn test_duplicate_codes_issue_duplicate_requests() {
        let wiki = MockWiki::default();

        provision_lang_pages(&wiki, &codes(&["de", "de"]), "en")
            .await
            .unwrap();

        assert_eq!(wiki.requests().len(), 2);
    }
}
