//! Submission dispatcher: one create/update call per submission, normalized
//!
//! Backend errors never escape; they become [`SubmitOutcome::Failure`] with a
//! generic message so the wizard always leaves the submitting state.

use super::traits::RegistryClientTrait;
use crate::state::{FormKind, SubmitOutcome, Values};
use std::time::Duration;

pub const GENERIC_FAILURE: &str = "Something went wrong while saving. Please try again.";
pub const TIMEOUT_FAILURE: &str = "The request timed out. Please try again.";

/// Which external operation a submission maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchMode {
    Create,
    Update { id: String },
}

#[derive(Debug, Clone)]
pub struct SubmissionDispatcher {
    kind: FormKind,
    mode: DispatchMode,
    timeout: Option<Duration>,
}

impl SubmissionDispatcher {
    pub fn new(kind: FormKind, mode: DispatchMode) -> Self {
        Self {
            kind,
            mode,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(test)]
    pub fn mode(&self) -> &DispatchMode {
        &self.mode
    }

    /// Call the backend once and normalize the result
    pub async fn dispatch<C>(&self, client: &mut C, snapshot: &Values) -> SubmitOutcome
    where
        C: RegistryClientTrait + ?Sized,
    {
        let call = async {
            match (&self.mode, self.kind) {
                (DispatchMode::Create, FormKind::GalleryUpload) => {
                    client.create_media(snapshot).await
                }
                (DispatchMode::Create, _) => client.create_member(snapshot).await,
                (DispatchMode::Update { id }, _) => client.update_member(id, snapshot).await,
            }
        };

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(?limit, "submission timed out");
                    return SubmitOutcome::Failure(TIMEOUT_FAILURE.to_string());
                }
            },
            None => call.await,
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Submission failed: {e:#}");
                SubmitOutcome::Failure(GENERIC_FAILURE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::testing::HangingRegistry;
    use crate::registry::MockRegistryClientTrait;
    use crate::state::{Catalog, Receipt, Wizard, WizardError, DEFAULT_MAX_UPLOAD_BYTES};
    use anyhow::anyhow;
    use mockall::predicate::eq;

    /// Validate, dispatch and apply the outcome the way the app does
    async fn submit<C>(
        dispatcher: &SubmissionDispatcher,
        wizard: &mut Wizard,
        client: &mut C,
    ) -> Result<SubmitOutcome, WizardError>
    where
        C: RegistryClientTrait + ?Sized,
    {
        let snapshot = wizard.begin_submit()?;
        let outcome = dispatcher.dispatch(client, &snapshot).await;
        wizard.finish_submit(outcome.clone());
        Ok(outcome)
    }

    fn gallery_wizard() -> Wizard {
        let catalog = Catalog::new(DEFAULT_MAX_UPLOAD_BYTES).unwrap();
        let mut wizard = Wizard::new(catalog.gallery);
        wizard.set_input("title", "Health camp").unwrap();
        wizard.set_input("category", "programs").unwrap();
        wizard.set_input("content_type", "video").unwrap();
        wizard.advance().unwrap();
        wizard.set_input("video_url", "https://example.org/camp").unwrap();
        wizard
    }

    fn receipt(reference: &str) -> Receipt {
        Receipt {
            id: "id-1".to_string(),
            reference: reference.to_string(),
        }
    }

    #[tokio::test]
    async fn test_happy_path_marks_submitted() {
        let mut client = MockRegistryClientTrait::new();
        client
            .expect_create_media()
            .times(1)
            .returning(|_| Ok(SubmitOutcome::Success(receipt("M-0001"))));
        let dispatcher = SubmissionDispatcher::new(FormKind::GalleryUpload, DispatchMode::Create);
        let mut wizard = gallery_wizard();

        let outcome = submit(&dispatcher, &mut wizard, &mut client).await.unwrap();

        assert!(outcome.is_success());
        assert!(wizard.is_submitted());
        assert_eq!(wizard.receipt().unwrap().reference, "M-0001");
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_page_error() {
        let mut client = MockRegistryClientTrait::new();
        client
            .expect_create_media()
            .times(1)
            .returning(|_| Ok(SubmitOutcome::Failure("duplicate entry".to_string())));
        let dispatcher = SubmissionDispatcher::new(FormKind::GalleryUpload, DispatchMode::Create);
        let mut wizard = gallery_wizard();

        submit(&dispatcher, &mut wizard, &mut client).await.unwrap();

        assert!(!wizard.is_submitting());
        assert!(!wizard.is_submitted());
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(wizard.page_error(), Some("duplicate entry"));
        assert!(wizard.begin_submit().is_ok());
    }

    #[tokio::test]
    async fn test_backend_error_is_normalized() {
        let mut client = MockRegistryClientTrait::new();
        client
            .expect_create_media()
            .returning(|_| Err(anyhow!("connection reset")));
        let dispatcher = SubmissionDispatcher::new(FormKind::GalleryUpload, DispatchMode::Create);
        let mut wizard = gallery_wizard();

        let outcome = submit(&dispatcher, &mut wizard, &mut client).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Failure(GENERIC_FAILURE.to_string()));
        assert_eq!(wizard.page_error(), Some(GENERIC_FAILURE));
        assert!(!wizard.is_submitting());
    }

    #[tokio::test]
    async fn test_invalid_form_never_calls_backend() {
        let mut client = MockRegistryClientTrait::new();
        client.expect_create_media().times(0);
        let dispatcher = SubmissionDispatcher::new(FormKind::GalleryUpload, DispatchMode::Create);
        let mut wizard = gallery_wizard();
        wizard.set_input("video_url", "not a url").unwrap();

        let result = submit(&dispatcher, &mut wizard, &mut client).await;

        assert!(matches!(result, Err(WizardError::Invalid { .. })));
    }

    #[tokio::test]
    async fn test_double_submit_dispatches_once() {
        let mut client = MockRegistryClientTrait::new();
        client
            .expect_create_media()
            .times(1)
            .returning(|_| Ok(SubmitOutcome::Success(receipt("G-0001"))));
        let dispatcher = SubmissionDispatcher::new(FormKind::GalleryUpload, DispatchMode::Create);
        let mut wizard = gallery_wizard();

        let first = wizard.begin_submit().unwrap();
        let second = wizard.begin_submit();
        assert_eq!(second, Err(WizardError::AlreadySubmitting));

        let outcome = dispatcher.dispatch(&mut client, &first).await;
        wizard.finish_submit(outcome);
        assert!(wizard.is_submitted());
    }

    #[tokio::test]
    async fn test_update_mode_calls_update_member() {
        let mut client = MockRegistryClientTrait::new();
        client
            .expect_update_member()
            .with(eq("rec-42"), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(SubmitOutcome::Success(receipt("M-0042"))));
        let dispatcher = SubmissionDispatcher::new(
            FormKind::MembershipRenewal,
            DispatchMode::Update {
                id: "rec-42".to_string(),
            },
        );

        let outcome = dispatcher.dispatch(&mut client, &Values::new()).await;

        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_create_mode_for_membership() {
        let mut client = MockRegistryClientTrait::new();
        client
            .expect_create_member()
            .times(1)
            .returning(|_| Ok(SubmitOutcome::Success(receipt("M-0003"))));
        let dispatcher =
            SubmissionDispatcher::new(FormKind::MembershipApplication, DispatchMode::Create);

        let outcome = dispatcher.dispatch(&mut client, &Values::new()).await;

        assert_eq!(outcome, SubmitOutcome::Success(receipt("M-0003")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_normalized_when_configured() {
        let dispatcher = SubmissionDispatcher::new(FormKind::GalleryUpload, DispatchMode::Create)
            .with_timeout(Some(Duration::from_secs(30)));
        let mut wizard = gallery_wizard();

        let outcome = submit(&dispatcher, &mut wizard, &mut HangingRegistry)
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Failure(TIMEOUT_FAILURE.to_string()));
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.page_error(), Some(TIMEOUT_FAILURE));
    }
}
