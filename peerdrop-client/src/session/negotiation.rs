use peerdrop_core::IceCandidate;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Saw the other side join; creates the channel and offers.
    Initiator,
    /// Was already told about the other side; waits for its offer.
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    New,
    OfferSent,
    AnswerPending,
    AnswerSent,
    Connected,
    Closed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{role:?} session in state {state:?} cannot {action}")]
pub struct TransitionError {
    pub role: Role,
    pub state: NegotiationState,
    pub action: &'static str,
}

/// Negotiation progress of one peer session, free of any I/O.
///
/// The engine asks whether a step is expected, performs it on the
/// transport, then records it here. Remote candidates that arrive before a
/// remote description is applied are held and handed back when it is.
#[derive(Debug)]
pub struct Negotiation {
    role: Role,
    state: NegotiationState,
    remote_description: bool,
    pending_candidates: Vec<IceCandidate>,
}

impl Negotiation {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            state: NegotiationState::New,
            remote_description: false,
            pending_candidates: Vec::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == NegotiationState::Closed
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_candidates.len()
    }

    pub fn expects_offer(&self) -> bool {
        self.role == Role::Responder
            && self.state == NegotiationState::New
            && !self.remote_description
    }

    pub fn expects_answer(&self) -> bool {
        self.role == Role::Initiator && self.state == NegotiationState::OfferSent
    }

    pub fn offer_sent(&mut self) -> Result<(), TransitionError> {
        if self.role != Role::Initiator || self.state != NegotiationState::New {
            return Err(self.invalid("send an offer"));
        }
        self.state = NegotiationState::OfferSent;
        Ok(())
    }

    /// Record that the remote offer or answer was applied. Returns the
    /// candidates queued so far, in arrival order, to be applied next.
    pub fn remote_description_applied(&mut self) -> Result<Vec<IceCandidate>, TransitionError> {
        if self.expects_answer() {
            self.state = NegotiationState::AnswerPending;
        } else if !self.expects_offer() {
            return Err(self.invalid("apply a remote description"));
        }
        self.remote_description = true;
        Ok(std::mem::take(&mut self.pending_candidates))
    }

    pub fn answer_sent(&mut self) -> Result<(), TransitionError> {
        if self.role != Role::Responder
            || self.state != NegotiationState::New
            || !self.remote_description
        {
            return Err(self.invalid("send an answer"));
        }
        self.state = NegotiationState::AnswerSent;
        Ok(())
    }

    /// Returns the candidate if it can be applied now, or `None` if it was
    /// queued (or dropped, once closed).
    pub fn remote_candidate(&mut self, candidate: IceCandidate) -> Option<IceCandidate> {
        if self.is_closed() {
            return None;
        }
        if self.remote_description {
            return Some(candidate);
        }
        self.pending_candidates.push(candidate);
        None
    }

    pub fn channel_open(&mut self) -> Result<(), TransitionError> {
        match self.state {
            NegotiationState::AnswerPending | NegotiationState::AnswerSent => {
                self.state = NegotiationState::Connected;
                Ok(())
            }
            _ => Err(self.invalid("open the channel")),
        }
    }

    pub fn close(&mut self) {
        self.state = NegotiationState::Closed;
        self.pending_candidates.clear();
    }

    fn invalid(&self, action: &'static str) -> TransitionError {
        TransitionError {
            role: self.role,
            state: self.state,
            action,
        }
    }
}
