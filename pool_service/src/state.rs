//! Request state machine.
//!
//! Governs every status transition of a [`ProductRequest`]. Each
//! transition names the acting party; a legal action by the wrong party is
//! [`TransitionError::WrongParty`], an action the current status does not
//! admit at all is [`TransitionError::Illegal`].
//!
//! ```text
//! pending_owner_approval ──accept(owner)──► accepted{unconfirmed}
//!        │    │                                  │        │
//!        │    └reject(owner)                     │        └confirm(requester)
//!        └cancel(requester)                      │                 │
//!                                                ▼                 ▼
//!                                     rejected/cancelled   accepted{confirmed}
//!                                                            │     │      │
//!                                         finalize(owner)◄───┘     │      └reject(owner)
//!                                         (materialized)           │
//!                                                 mark_fulfilled(owner)
//!                                                          │
//!                                                 fulfilled_by_sender
//!                                                    │           │
//!                                 mark_received(requester)   report_issue(requester)
//!                                                    │           │
//!                                        received_by_requester  issue_reported
//! ```
//!
//! Confirmation is one-way: there is no action that takes
//! `accepted{confirmed}` back to `accepted{unconfirmed}`.

use models_pool::{RequestStatus, SenderRole};
use thiserror::Error;

/// Actions either party can attempt against a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RequestAction {
    Accept,
    Reject,
    Cancel,
    Confirm,
    MarkFulfilled,
    MarkReceived,
    ReportIssue,
    Finalize,
}

/// Outcome of a legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The request moves to this status.
    To(RequestStatus),
    /// The request is converted into an order and deleted; there is no
    /// next stored status.
    Materialize,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("only the {required} may {action} this request")]
    WrongParty {
        required: SenderRole,
        action: RequestAction,
    },

    #[error("cannot {action} a request in status {from}")]
    Illegal {
        from: RequestStatus,
        action: RequestAction,
    },
}

/// The transition table. Returns the required actor and the outcome for a
/// `(status, action)` pair, or `None` when no party may perform `action`
/// in `status`.
fn lookup(status: RequestStatus, action: RequestAction) -> Option<(SenderRole, Transition)> {
    use RequestAction as A;
    use RequestStatus as S;
    use SenderRole::{Owner, Requester};

    let accepted = |confirmed| S::Accepted {
        requester_confirmed: confirmed,
    };

    match (status, action) {
        (S::PendingOwnerApproval, A::Accept) => Some((Owner, Transition::To(accepted(false)))),
        (S::PendingOwnerApproval, A::Reject) => Some((Owner, Transition::To(S::Rejected))),
        (S::PendingOwnerApproval, A::Cancel) => Some((Requester, Transition::To(S::Cancelled))),

        (
            S::Accepted {
                requester_confirmed: false,
            },
            A::Reject,
        ) => Some((Owner, Transition::To(S::Rejected))),
        (
            S::Accepted {
                requester_confirmed: false,
            },
            A::Confirm,
        ) => Some((Requester, Transition::To(accepted(true)))),
        (
            S::Accepted {
                requester_confirmed: false,
            },
            A::Cancel,
        ) => Some((Requester, Transition::To(S::Cancelled))),

        (
            S::Accepted {
                requester_confirmed: true,
            },
            A::Finalize,
        ) => Some((Owner, Transition::Materialize)),
        (
            S::Accepted {
                requester_confirmed: true,
            },
            A::Reject,
        ) => Some((Owner, Transition::To(S::Rejected))),
        (
            S::Accepted {
                requester_confirmed: true,
            },
            A::MarkFulfilled,
        ) => Some((Owner, Transition::To(S::FulfilledBySender))),

        (S::FulfilledBySender, A::MarkReceived) => {
            Some((Requester, Transition::To(S::ReceivedByRequester)))
        }
        (S::FulfilledBySender, A::ReportIssue) => {
            Some((Requester, Transition::To(S::IssueReported)))
        }

        _ => None,
    }
}

/// Applies `action` by `actor` to a request currently in `status`.
pub fn transition(
    status: RequestStatus,
    actor: SenderRole,
    action: RequestAction,
) -> Result<Transition, TransitionError> {
    match lookup(status, action) {
        Some((required, outcome)) if required == actor => Ok(outcome),
        Some((required, _)) => Err(TransitionError::WrongParty { required, action }),
        None => Err(TransitionError::Illegal {
            from: status,
            action,
        }),
    }
}
