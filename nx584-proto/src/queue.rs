//! FIFO command queue with bounded retries and transparent handling of
//! unsolicited transition messages that arrive while a command is in
//! flight.

use std::collections::VecDeque;

use slog::{debug, warn, Logger};

use crate::catalog::MessageType;

/// Maximum number of times a command is retried after a timeout before it
/// is abandoned.
pub const DEFAULT_RETRY_BUDGET: u8 = 3;

/// A command waiting to be sent, or in flight awaiting a response.
#[derive(Debug, Clone)]
pub struct PendingCommand {
    pub request_type: MessageType,
    pub payload: Vec<u8>,
    pub ack_required: bool,
    /// Message type the panel is expected to answer with. `None` when the
    /// only expected reply is an ack/nack.
    pub expects: Option<MessageType>,
    retries_remaining: u8,
}

impl PendingCommand {
    pub fn new(request_type: MessageType, payload: Vec<u8>, ack_required: bool, expects: Option<MessageType>) -> Self {
        PendingCommand {
            request_type,
            payload,
            ack_required,
            expects,
            retries_remaining: DEFAULT_RETRY_BUDGET,
        }
    }
}

/// Outcome of feeding an inbound frame to the queue while a command is in
/// flight.
#[derive(Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The frame matched the in-flight command's expected response; it has
    /// been completed and removed from the queue.
    Completed,
    /// The panel rejected the in-flight command outright; it has been
    /// abandoned.
    Rejected,
    /// The frame was an unsolicited transition unrelated to the in-flight
    /// command. The caller should dispatch it as a transition and the
    /// in-flight command remains exactly as it was (no retry consumed).
    Interleaved,
    /// The frame didn't match anything the queue is tracking.
    Unmatched,
}

/// Single-threaded FIFO of outbound commands. At most one command is "in
/// flight" (written to the transport, awaiting a matching response) at a
/// time.
pub struct CommandQueue {
    pending: VecDeque<PendingCommand>,
    in_flight: Option<PendingCommand>,
    log: Logger,
}

impl CommandQueue {
    pub fn new(log: Logger) -> CommandQueue {
        CommandQueue {
            pending: VecDeque::new(),
            in_flight: None,
            log,
        }
    }

    pub fn push(&mut self, command: PendingCommand) {
        self.pending.push_back(command);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_none()
    }

    pub fn in_flight(&self) -> Option<&PendingCommand> {
        self.in_flight.as_ref()
    }

    /// Pop the next queued command into flight, if nothing is already in
    /// flight and the queue is non-empty.
    pub fn start_next(&mut self) -> Option<&PendingCommand> {
        if self.in_flight.is_none() {
            self.in_flight = self.pending.pop_front();
        }
        self.in_flight.as_ref()
    }

    /// A read timed out while a command was in flight. Retries it if
    /// budget remains, otherwise abandons it. Returns `true` if the
    /// command is still in flight (possibly with one fewer retry).
    pub fn on_timeout(&mut self) -> bool {
        let still_pending = if let Some(cmd) = self.in_flight.as_mut() {
            if cmd.retries_remaining == 0 {
                warn!(self.log, "abandoning command after exhausting retries";
                    "type" => format!("{:?}", cmd.request_type));
                false
            } else {
                cmd.retries_remaining -= 1;
                debug!(self.log, "retrying command after timeout";
                    "type" => format!("{:?}", cmd.request_type),
                    "retries_remaining" => cmd.retries_remaining);
                true
            }
        } else {
            false
        };

        if !still_pending {
            self.in_flight = None;
        }
        still_pending
    }

    /// Feed an inbound frame's message type to the queue. Determines
    /// whether it completes, rejects, or is unrelated to (interleaved
    /// with) the in-flight command.
    pub fn dispatch(&mut self, msg_type: MessageType) -> DispatchOutcome {
        let cmd = match self.in_flight.as_ref() {
            Some(cmd) => cmd,
            None => return DispatchOutcome::Unmatched,
        };

        if matches!(msg_type, MessageType::Rejected | MessageType::Nack | MessageType::Failed) {
            warn!(self.log, "panel rejected command"; "type" => format!("{:?}", cmd.request_type));
            self.in_flight = None;
            return DispatchOutcome::Rejected;
        }

        let matched = match cmd.expects {
            Some(expected) => msg_type == expected,
            None => msg_type == MessageType::Ack,
        };

        if matched {
            debug!(self.log, "command completed"; "type" => format!("{:?}", cmd.request_type));
            self.in_flight = None;
            return DispatchOutcome::Completed;
        }

        DispatchOutcome::Interleaved
    }

    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.in_flight.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::{o, Discard};

    fn test_logger() -> Logger {
        Logger::root(Discard, o!())
    }

    fn zone_status_request() -> PendingCommand {
        PendingCommand::new(
            MessageType::ZoneStatusReq,
            vec![0],
            false,
            Some(MessageType::ZoneStatusRsp),
        )
    }

    #[test]
    fn start_next_pulls_from_the_front_of_the_queue() {
        let mut queue = CommandQueue::new(test_logger());
        queue.push(zone_status_request());
        queue.push(PendingCommand::new(MessageType::SystemStatusReq, vec![], false, Some(MessageType::SystemStatusRsp)));

        let first = queue.start_next().unwrap();
        assert_eq!(first.request_type, MessageType::ZoneStatusReq);
        // Starting again while one is in flight is a no-op.
        assert_eq!(queue.start_next().unwrap().request_type, MessageType::ZoneStatusReq);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn retries_are_consumed_on_timeout_then_abandoned() {
        let mut queue = CommandQueue::new(test_logger());
        queue.push(zone_status_request());
        queue.start_next();

        for _ in 0..DEFAULT_RETRY_BUDGET {
            assert!(queue.on_timeout());
        }
        assert!(!queue.on_timeout());
        assert!(queue.in_flight().is_none());
    }

    #[test]
    fn matching_response_completes_the_command() {
        let mut queue = CommandQueue::new(test_logger());
        queue.push(zone_status_request());
        queue.start_next();

        assert_eq!(queue.dispatch(MessageType::ZoneStatusRsp), DispatchOutcome::Completed);
        assert!(queue.in_flight().is_none());
    }

    #[test]
    fn rejection_abandons_the_command_without_using_a_retry() {
        let mut queue = CommandQueue::new(test_logger());
        queue.push(zone_status_request());
        queue.start_next();

        assert_eq!(queue.dispatch(MessageType::Rejected), DispatchOutcome::Rejected);
        assert!(queue.in_flight().is_none());
    }

    #[test]
    fn interleaved_transition_does_not_disturb_in_flight_command() {
        let mut queue = CommandQueue::new(test_logger());
        queue.push(zone_status_request());
        queue.start_next();

        // An unsolicited Partition Status broadcast arrives while we're
        // waiting on a Zone Status response.
        assert_eq!(queue.dispatch(MessageType::PartitionStatusRsp), DispatchOutcome::Interleaved);
        assert!(queue.in_flight().is_some());
        assert_eq!(queue.in_flight().unwrap().request_type, MessageType::ZoneStatusReq);

        // It still completes normally afterwards.
        assert_eq!(queue.dispatch(MessageType::ZoneStatusRsp), DispatchOutcome::Completed);
    }

    #[test]
    fn ack_only_command_completes_on_ack() {
        let mut queue = CommandQueue::new(test_logger());
        queue.push(PendingCommand::new(MessageType::PrimaryKeypadFuncNoPin, vec![1, 1, 0], true, None));
        queue.start_next();

        assert_eq!(queue.dispatch(MessageType::Ack), DispatchOutcome::Completed);
    }

    #[test]
    fn dispatch_with_nothing_in_flight_is_unmatched() {
        let mut queue = CommandQueue::new(test_logger());
        assert_eq!(queue.dispatch(MessageType::ZoneStatusRsp), DispatchOutcome::Unmatched);
    }
}
