//! Command dispatcher - resolves a command line to one overload and runs it

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use super::coercer::coerce;
use super::invoker::{invoke, Invocation};
use super::messages::Messages;
use super::permission::PermissionGate;
use crate::application::services::CommandTable;
use crate::domain::entities::{CommandLine, Descriptor, Principal};
use crate::domain::traits::{CommandExecutor, Messenger, PermissionProvider};

/// Terminal state of a single dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler ran and returned this flag
    Completed(bool),
    /// A handler raised a command error; its text was relayed to the sender
    Relayed(String),
    /// A handler failed unexpectedly; the sender got the generic message
    Failed,
    /// No overload accepted the call; holds the message that was sent
    NoMatch(String),
}

impl DispatchOutcome {
    /// Whether the host should treat the command as handled
    pub fn handled(&self) -> bool {
        match self {
            DispatchOutcome::Completed(result) => *result,
            DispatchOutcome::Relayed(_) => true,
            DispatchOutcome::Failed | DispatchOutcome::NoMatch(_) => false,
        }
    }
}

/// Routes command lines through alias resolution, overload selection and invocation
pub struct Dispatcher {
    table: CommandTable,
    gate: PermissionGate,
    messenger: Arc<dyn Messenger>,
    messages: Messages,
}

impl Dispatcher {
    pub fn new(
        table: CommandTable,
        permissions: Arc<dyn PermissionProvider>,
        messenger: Arc<dyn Messenger>,
        messages: Messages,
    ) -> Self {
        Self {
            table,
            gate: PermissionGate::new(permissions),
            messenger,
            messages,
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Dispatch one command line on the caller's thread
    ///
    /// Overloads are tried in registration order and the first one that
    /// passes the sender, argument and permission checks runs. If none does,
    /// the last recorded rejection message wins.
    pub fn dispatch(&self, principal: &Principal, line: &CommandLine) -> DispatchOutcome {
        // disabled or unknown names answer like unregistered commands
        if !self.table.is_active(&line.label) {
            debug!("[{}] /{} is not an active name", line.id, line.label);
            return self.no_match(principal, None);
        }

        let canonical = self.table.resolve(&line.label);
        let mut last_failure: Option<&str> = None;

        for descriptor in self.table.candidates(canonical) {
            let key = descriptor.signature();

            if !descriptor.sender.admits(principal.kind()) {
                debug!("[{}] {} skipped: not for {}", line.id, key, principal.kind().as_str());
                last_failure = Some(self.messages.sender_rejected(principal.kind()));
                continue;
            }

            let args = match coerce(&descriptor.params, &line.args) {
                Ok(args) => args,
                Err(e) => {
                    debug!("[{}] {} skipped: {}", line.id, key, e);
                    continue;
                }
            };

            if !self.gate.permits(principal, &descriptor.permissions) {
                debug!("[{}] {} skipped: {} lacks permission", line.id, key, principal.name());
                last_failure = Some(self.messages.permission_denied.as_str());
                continue;
            }

            debug!("[{}] {} selected for {}", line.id, key, principal.name());
            let outcome = self.finish(descriptor, principal, line, invoke(descriptor, principal, &args));
            let elapsed = Utc::now() - line.received_at;
            debug!("[{}] /{} finished in {}ms", line.id, line.label, elapsed.num_milliseconds());
            return outcome;
        }

        self.no_match(principal, last_failure)
    }

    fn no_match(&self, principal: &Principal, last_failure: Option<&str>) -> DispatchOutcome {
        let message = last_failure
            .unwrap_or(self.messages.invalid_command.as_str())
            .to_string();
        self.messenger.send(principal, &message);
        DispatchOutcome::NoMatch(message)
    }

    fn finish(
        &self,
        descriptor: &Descriptor,
        principal: &Principal,
        line: &CommandLine,
        invocation: Invocation,
    ) -> DispatchOutcome {
        match invocation {
            Invocation::Returned(result) => DispatchOutcome::Completed(result),
            Invocation::CommandError(text) => {
                self.messenger
                    .send(principal, &self.messages.command_error(&text));
                DispatchOutcome::Relayed(text)
            }
            Invocation::Unexpected(detail) => {
                error!(
                    "failed to execute command: {} ({}) [incident {}] sender={} module={} args={:?}",
                    line.label,
                    detail,
                    line.id,
                    principal.name(),
                    descriptor.module,
                    line.args
                );
                self.messenger.send(principal, &self.messages.internal_error);
                DispatchOutcome::Failed
            }
        }
    }
}

impl CommandExecutor for Dispatcher {
    fn execute(&self, sender: &Principal, label: &str, args: &[String]) -> bool {
        let line = CommandLine::new(label, args.to_vec());
        self.dispatch(sender, &line).handled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::HandlerError;
    use crate::application::services::discovery::{validate, Discovered};
    use crate::domain::entities::{CommandSpec, ParamKind};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Inbox(Mutex<Vec<(String, String)>>);

    impl Messenger for Inbox {
        fn send(&self, principal: &Principal, text: &str) {
            self.0.lock().unwrap().push((principal.name().to_string(), text.to_string()));
        }
    }

    impl Inbox {
        fn last(&self) -> Option<String> {
            self.0.lock().unwrap().last().map(|(_, t)| t.clone())
        }

        fn count(&self) -> usize {
            self.0.lock().unwrap().len()
        }
    }

    struct Perms(HashSet<(String, String)>);

    impl PermissionProvider for Perms {
        fn has_permission(&self, principal: &Principal, permission: &str) -> bool {
            self.0.contains(&(principal.name().to_string(), permission.to_string()))
        }
    }

    fn dispatcher(specs: Vec<CommandSpec>, grants: &[(&str, &str)]) -> (Dispatcher, Arc<Inbox>) {
        let discovered = specs.into_iter().map(|spec| Discovered {
            descriptor: validate(spec, "test", "test").unwrap(),
            disabled_names: vec![],
        });
        let inbox = Arc::new(Inbox::default());
        let perms = Perms(
            grants
                .iter()
                .map(|(who, what)| (who.to_string(), what.to_string()))
                .collect(),
        );
        let dispatcher = Dispatcher::new(
            CommandTable::build(discovered),
            Arc::new(perms),
            inbox.clone(),
            Messages::default(),
        );
        (dispatcher, inbox)
    }

    fn line(label: &str, args: &[&str]) -> CommandLine {
        CommandLine::new(label, args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn unknown_command_gets_invalid_message() {
        let (d, inbox) = dispatcher(vec![], &[]);
        let outcome = d.dispatch(&Principal::console(), &line("nope", &[]));
        assert_eq!(outcome, DispatchOutcome::NoMatch(Messages::default().invalid_command));
        assert!(!outcome.handled());
        assert_eq!(inbox.count(), 1);
    }

    #[test]
    fn first_eligible_overload_wins() {
        let hits = Arc::new(AtomicUsize::new(0));
        let first = hits.clone();
        let (d, _) = dispatcher(
            vec![
                CommandSpec::new("roll")
                    .with_param(ParamKind::Integer)
                    .with_handler(move |_, args| {
                        first.fetch_add(args.int(0)? as usize, Ordering::SeqCst);
                        Ok(true)
                    }),
                CommandSpec::new("roll")
                    .with_param(ParamKind::String)
                    .with_handler(|_, _| Ok(false)),
            ],
            &[],
        );
        assert_eq!(d.dispatch(&Principal::console(), &line("roll", &["6"])), DispatchOutcome::Completed(true));
        assert_eq!(hits.load(Ordering::SeqCst), 6);
        // "six" fails the integer shape silently and falls through to the string one
        assert_eq!(d.dispatch(&Principal::console(), &line("roll", &["six"])), DispatchOutcome::Completed(false));
    }

    #[test]
    fn last_recorded_message_wins() {
        let (d, inbox) = dispatcher(
            vec![
                CommandSpec::new("stop").console_only().with_handler(|_, _| Ok(true)),
                CommandSpec::new("stop")
                    .with_param(ParamKind::String)
                    .with_permission("stop")
                    .with_handler(|_, _| Ok(true)),
            ],
            &[],
        );
        let alice = Principal::player("alice");

        // sender rejection, then a silent coercion failure: sender message stays
        d.dispatch(&alice, &line("stop", &[]));
        assert_eq!(inbox.last().unwrap(), Messages::default().console_only);

        // sender rejection, then permission denial: permission message is later
        d.dispatch(&alice, &line("stop", &["now"]));
        assert_eq!(inbox.last().unwrap(), Messages::default().permission_denied);
    }

    #[test]
    fn command_error_is_relayed_and_handled() {
        let (d, inbox) = dispatcher(
            vec![CommandSpec::new("find")
                .with_param(ParamKind::String)
                .with_handler(|_, _| Err(HandlerError::command("Target not found")))],
            &[],
        );
        let outcome = d.dispatch(&Principal::player("alice"), &line("find", &["bob"]));
        assert_eq!(outcome, DispatchOutcome::Relayed("Target not found".into()));
        assert!(outcome.handled());
        assert_eq!(inbox.last().unwrap(), "&cTarget not found");
    }

    #[test]
    fn unexpected_failure_sends_generic_message() {
        let (d, inbox) = dispatcher(
            vec![CommandSpec::new("explode").with_handler(|_, _| panic!("kaboom"))],
            &[],
        );
        let outcome = d.dispatch(&Principal::console(), &line("explode", &[]));
        assert_eq!(outcome, DispatchOutcome::Failed);
        assert!(!outcome.handled());
        assert_eq!(inbox.last().unwrap(), Messages::default().internal_error);
    }

    #[test]
    fn disabled_names_are_not_dispatched() {
        let discovered = vec![Discovered {
            descriptor: validate(
                CommandSpec::new("whoami")
                    .with_aliases(["me"])
                    .with_handler(|_, _| Ok(true)),
                "test",
                "test",
            )
            .unwrap(),
            disabled_names: vec!["whoami".to_string()],
        }];
        let inbox = Arc::new(Inbox::default());
        let d = Dispatcher::new(
            CommandTable::build(discovered),
            Arc::new(Perms(HashSet::new())),
            inbox.clone(),
            Messages::default(),
        );

        let outcome = d.dispatch(&Principal::console(), &line("whoami", &[]));
        assert_eq!(outcome, DispatchOutcome::NoMatch(Messages::default().invalid_command));
        assert_eq!(inbox.last().unwrap(), Messages::default().invalid_command);
        // the alias is still active and reaches the same shape
        assert_eq!(d.dispatch(&Principal::console(), &line("me", &[])), DispatchOutcome::Completed(true));
    }

    #[test]
    fn executor_entry_point_resolves_aliases() {
        let (d, _) = dispatcher(
            vec![CommandSpec::new("heal").with_aliases(["h"]).with_handler(|_, _| Ok(true))],
            &[("alice", "test.heal")],
        );
        assert!(d.execute(&Principal::player("alice"), "H", &[]));
    }
}
