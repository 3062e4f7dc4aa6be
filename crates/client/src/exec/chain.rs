use tracing::{Span, debug};

use crate::exec::{ChainStatus, ExecutionContext, HttpExecutionCommand};
use crate::protocol::{HttpClientError, Request, Response};

/// Ordered list of execution commands, tried front to back.
#[derive(Debug, Default)]
pub struct TransportChain {
    commands: Vec<HttpExecutionCommand>,
}

impl TransportChain {
    pub fn new() -> Self {
        Self { commands: Vec::new() }
    }

    pub fn add_command(&mut self, command: HttpExecutionCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn transport_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(HttpExecutionCommand::transport_name)
    }

    /// Runs `request` through the chain.
    ///
    /// The first command that handles the request supplies the response. An
    /// error from a command ends the walk immediately; later commands are not
    /// consulted. When every command declines the result is
    /// [`HttpClientError::NoTransport`].
    pub fn execute(&mut self, request: &Request, span: &Span) -> Result<Response, HttpClientError> {
        let _entered = span.enter();
        let mut context = ExecutionContext::new(request);

        for command in self.commands.iter_mut() {
            if command.execute(&mut context)? == ChainStatus::Handled {
                debug!(%request, transport = command.transport_name(), "handled");
                return context.take_response().ok_or_else(|| HttpClientError::no_transport(request));
            }
        }

        debug!(%request, "no transport available");
        Err(HttpClientError::no_transport(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::HttpMessage;
    use crate::transport::MockHttpTransport;
    use bytes::Bytes;

    fn declining() -> MockHttpTransport {
        let mut transport = MockHttpTransport::new();
        transport.expect_name().return_const("declining");
        transport.expect_is_available().return_const(true);
        transport.expect_can_handle().return_const(false);
        transport.expect_handle_request().never();
        transport.expect_tear_down().never();
        transport
    }

    fn handling(raw: &'static [u8]) -> MockHttpTransport {
        let mut transport = MockHttpTransport::new();
        transport.expect_name().return_const("handling");
        transport.expect_is_available().return_const(true);
        transport.expect_can_handle().return_const(true);
        transport.expect_prepare_to_handle_new_request().returning(|_| Ok(()));
        transport.expect_handle_request().times(1).returning(move |_| Ok(Bytes::from_static(raw)));
        transport.expect_response_code().returning(|| Ok(200));
        transport.expect_tear_down().times(1).return_const(());
        transport
    }

    fn never_called() -> MockHttpTransport {
        let mut transport = MockHttpTransport::new();
        transport.expect_name().return_const("unused");
        transport.expect_is_available().never();
        transport.expect_can_handle().never();
        transport.expect_handle_request().never();
        transport.expect_tear_down().never();
        transport
    }

    fn request() -> Request {
        Request::get("http://example.com/").unwrap()
    }

    #[test]
    fn first_handler_wins() {
        let mut chain = TransportChain::new();
        chain.add_command(HttpExecutionCommand::new(declining()));
        chain.add_command(HttpExecutionCommand::new(handling(b"HTTP/1.1 200 OK\r\nServer: b\r\n\r\nfrom b")));
        chain.add_command(HttpExecutionCommand::new(never_called()));

        let response = chain.execute(&request(), &Span::none()).unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(&response.entity().unwrap().content()[..], b"from b");
    }

    #[test]
    fn failure_does_not_fall_through() {
        let mut failing = MockHttpTransport::new();
        failing.expect_name().return_const("failing");
        failing.expect_is_available().return_const(true);
        failing.expect_can_handle().return_const(true);
        failing.expect_prepare_to_handle_new_request().returning(|_| Ok(()));
        failing.expect_handle_request().returning(|_| Err(HttpClientError::transport("connection refused")));
        failing.expect_tear_down().times(1).return_const(());

        let mut chain = TransportChain::new();
        chain.add_command(HttpExecutionCommand::new(failing));
        chain.add_command(HttpExecutionCommand::new(never_called()));

        let result = chain.execute(&request(), &Span::none());

        assert!(matches!(result, Err(HttpClientError::Transport { .. })));
    }

    #[test]
    fn all_decline_is_no_transport() {
        let mut chain = TransportChain::new();
        chain.add_command(HttpExecutionCommand::new(declining()));
        chain.add_command(HttpExecutionCommand::new(declining()));

        let result = chain.execute(&request(), &Span::none());

        match result {
            Err(HttpClientError::NoTransport { request }) => assert_eq!(request, "GET http://example.com/"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn empty_chain_is_no_transport() {
        let mut chain = TransportChain::new();
        assert!(chain.is_empty());

        let result = chain.execute(&request(), &Span::none());
        assert!(matches!(result, Err(HttpClientError::NoTransport { .. })));
    }

    #[test]
    fn names_in_order() {
        let mut chain = TransportChain::new();
        chain.add_command(HttpExecutionCommand::new(declining()));
        chain.add_command(HttpExecutionCommand::new(never_called()));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.transport_names().collect::<Vec<_>>(), vec!["declining", "unused"]);
    }
}
