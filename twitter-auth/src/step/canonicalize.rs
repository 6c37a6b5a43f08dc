//! Subject canonicalization for subjects authenticated by Twitter.

use async_trait::async_trait;
use log::*;

use super::{AuthenticationStep, Event};
use crate::attempt::{AttemptState, CanonicalizationContext};
use crate::error::{authn_error, AuthnErrorKind, Error};
use crate::principal::{Subject, TwitterIdPrincipal};

/// Decides whether [`TwitterSubjectCanonicalization`] can run.
///
/// `applies` is a pure test an orchestrator may use to choose between
/// canonicalizers. `check` is the validation run once this canonicalizer was
/// chosen; it records the failure on the context.
pub struct ActivationCondition;

impl ActivationCondition {
    /// True iff the subject carries exactly one Twitter principal.
    pub fn applies(c14n: &CanonicalizationContext) -> bool {
        Self::applies_to(c14n.subject.as_ref())
    }

    /// Same test as [`ActivationCondition::applies`], for a bare subject.
    pub fn applies_to(subject: Option<&Subject>) -> bool {
        subject
            .map(|s| s.twitter_id_principals().len() == 1)
            .unwrap_or(false)
    }

    /// Select the single Twitter principal, or record why there is not exactly one.
    ///
    /// # Returns
    ///
    /// The principal, or an `InvalidSubject` error also stored as the context's exception.
    pub fn check(c14n: &mut CanonicalizationContext) -> Result<TwitterIdPrincipal, Error> {
        let principals = c14n
            .subject
            .as_ref()
            .map(Subject::twitter_id_principals)
            .unwrap_or_default();

        let message = match principals.as_slice() {
            [principal] => return Ok((*principal).clone()),
            [] => "No TwitterIdPrincipals were found",
            _ => "Multiple TwitterIdPrincipals were found",
        };

        c14n.exception = Some(authn_error(AuthnErrorKind::InvalidSubject, message));
        Err(authn_error(AuthnErrorKind::InvalidSubject, message))
    }
}

/// Sets the canonical principal name to the subject's Twitter user id.
#[derive(Debug, Default)]
pub struct TwitterSubjectCanonicalization;

impl TwitterSubjectCanonicalization {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthenticationStep for TwitterSubjectCanonicalization {
    fn name(&self) -> &'static str {
        "TwitterSubjectCanonicalization"
    }

    async fn execute(&self, attempt: &mut AttemptState) -> Event {
        let Some(c14n) = attempt.c14n.as_mut() else {
            info!("[{}] No subject canonicalization context", self.name());
            return attempt.fail(authn_error(
                AuthnErrorKind::InvalidContext,
                "No subject canonicalization context",
            ));
        };

        match ActivationCondition::check(c14n) {
            Ok(principal) => {
                debug!(
                    "[{}] Canonical principal name is {}",
                    self.name(),
                    principal.name()
                );
                c14n.principal_name = Some(principal.name().to_string());
                Event::Proceed
            }
            Err(e) => {
                warn!("[{}] {}", self.name(), e);
                attempt.fail(e)
            }
        }
    }
}
