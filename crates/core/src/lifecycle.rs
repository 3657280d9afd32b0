//! Document lifecycle state machines.
//!
//! Proposal and contract statuses are explicit tagged variants with a guarded
//! transition table. Handlers never overwrite the status column blindly; every
//! write goes through a compare-and-swap (`UPDATE ... WHERE status = $from`)
//! so re-entrant accept/sign requests lose the race instead of silently
//! double-processing.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Proposal lifecycle
// ---------------------------------------------------------------------------

/// `Draft -> Sent -> Viewed -> Accepted | Declined | Expired`.
///
/// `Sent` may also jump straight to a terminal state (a recipient can accept
/// from an email client without the tracked view firing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    Draft,
    Sent,
    Viewed,
    Accepted,
    Declined,
    Expired,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Sent => "sent",
            ProposalStatus::Viewed => "viewed",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Declined => "declined",
            ProposalStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(ProposalStatus::Draft),
            "sent" => Ok(ProposalStatus::Sent),
            "viewed" => Ok(ProposalStatus::Viewed),
            "accepted" => Ok(ProposalStatus::Accepted),
            "declined" => Ok(ProposalStatus::Declined),
            "expired" => Ok(ProposalStatus::Expired),
            other => Err(CoreError::Validation(format!(
                "Unknown proposal status '{other}'"
            ))),
        }
    }

    /// Whether a transition from `self` to `to` is legal.
    pub fn can_transition(&self, to: ProposalStatus) -> bool {
        use ProposalStatus::*;
        matches!(
            (self, to),
            (Draft, Sent)
                | (Sent, Viewed)
                | (Sent, Accepted)
                | (Sent, Declined)
                | (Sent, Expired)
                | (Viewed, Accepted)
                | (Viewed, Declined)
                | (Viewed, Expired)
        )
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalStatus::Accepted | ProposalStatus::Declined | ProposalStatus::Expired
        )
    }

    /// The set of statuses a recipient response (accept/decline) is valid
    /// from. Used as the compare set in the guarded UPDATE.
    pub fn respondable() -> &'static [&'static str] {
        &["sent", "viewed"]
    }
}

// ---------------------------------------------------------------------------
// Contract lifecycle
// ---------------------------------------------------------------------------

/// `Draft -> Sent -> Signed`.
///
/// A contract becomes `Signed` only when every signatory has signed; the
/// repository enforces that with a conditional UPDATE counting unsigned rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractStatus {
    Draft,
    Sent,
    Signed,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "draft",
            ContractStatus::Sent => "sent",
            ContractStatus::Signed => "signed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(ContractStatus::Draft),
            "sent" => Ok(ContractStatus::Sent),
            "signed" => Ok(ContractStatus::Signed),
            other => Err(CoreError::Validation(format!(
                "Unknown contract status '{other}'"
            ))),
        }
    }

    pub fn can_transition(&self, to: ContractStatus) -> bool {
        use ContractStatus::*;
        matches!((self, to), (Draft, Sent) | (Sent, Signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposal_happy_path() {
        assert!(ProposalStatus::Draft.can_transition(ProposalStatus::Sent));
        assert!(ProposalStatus::Sent.can_transition(ProposalStatus::Viewed));
        assert!(ProposalStatus::Viewed.can_transition(ProposalStatus::Accepted));
    }

    #[test]
    fn proposal_accept_without_view() {
        assert!(ProposalStatus::Sent.can_transition(ProposalStatus::Accepted));
        assert!(ProposalStatus::Sent.can_transition(ProposalStatus::Declined));
    }

    #[test]
    fn proposal_terminal_states_are_sticky() {
        for terminal in [
            ProposalStatus::Accepted,
            ProposalStatus::Declined,
            ProposalStatus::Expired,
        ] {
            assert!(terminal.is_terminal());
            for to in [
                ProposalStatus::Draft,
                ProposalStatus::Sent,
                ProposalStatus::Viewed,
                ProposalStatus::Accepted,
                ProposalStatus::Declined,
                ProposalStatus::Expired,
            ] {
                assert!(
                    !terminal.can_transition(to),
                    "{terminal:?} must not transition to {to:?}"
                );
            }
        }
    }

    #[test]
    fn proposal_cannot_skip_send() {
        assert!(!ProposalStatus::Draft.can_transition(ProposalStatus::Accepted));
        assert!(!ProposalStatus::Draft.can_transition(ProposalStatus::Viewed));
    }

    #[test]
    fn proposal_status_round_trips() {
        for s in ["draft", "sent", "viewed", "accepted", "declined", "expired"] {
            assert_eq!(ProposalStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(ProposalStatus::parse("pending").is_err());
    }

    #[test]
    fn contract_lifecycle() {
        assert!(ContractStatus::Draft.can_transition(ContractStatus::Sent));
        assert!(ContractStatus::Sent.can_transition(ContractStatus::Signed));
        assert!(!ContractStatus::Draft.can_transition(ContractStatus::Signed));
        assert!(!ContractStatus::Signed.can_transition(ContractStatus::Sent));
        assert!(!ContractStatus::Signed.can_transition(ContractStatus::Draft));
    }

    #[test]
    fn contract_status_round_trips() {
        for s in ["draft", "sent", "signed"] {
            assert_eq!(ContractStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(ContractStatus::parse("void").is_err());
    }
}
