//! State machine that drives transitions and suspends for driver input.

use crate::checkpoint::{Checkpoint, CheckpointError, CHECKPOINT_VERSION};
use crate::core::{Request, Response, State, StateHistory};
use crate::machine::config::MachineConfig;
use crate::machine::error::MachineError;
use crate::machine::transition::{Transition, TransitionResult};
use crate::machine::workflow::Workflow;
use chrono::Utc;
use tracing::{debug, trace, warn};

/// Orchestrates a workflow's transitions.
///
/// The driver calls [`run`](Self::run) repeatedly. Each call either ends
/// with a request outstanding (the driver must answer it) or with the
/// machine halted (no transition applies to the current state).
///
/// At most one transition is active at a time. While a transition is
/// suspended, every response goes straight to it and no conditions are
/// evaluated.
pub struct StateMachine<W: Workflow> {
    env: W::Env,
    config: MachineConfig,
    transitions: Vec<Transition<W>>,
    state: W::State,
    request: Option<W::Request>,
    active: Option<usize>,
    history: StateHistory,
}

impl<W: Workflow> StateMachine<W> {
    /// Create a machine in the workflow's default state.
    pub fn new(env: W::Env) -> Self {
        Self::with_state(env, W::State::default())
    }

    /// Create a machine in an explicit initial state.
    pub fn with_state(env: W::Env, state: W::State) -> Self {
        Self {
            env,
            config: MachineConfig::default(),
            transitions: Vec::new(),
            state,
            request: None,
            active: None,
            history: StateHistory::new(),
        }
    }

    pub fn with_config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a transition. Earlier transitions win when several apply.
    pub fn add_transition(&mut self, transition: Transition<W>) {
        self.transitions.push(transition);
    }

    pub fn transitions(&self) -> &[Transition<W>] {
        &self.transitions
    }

    pub fn current_state(&self) -> &W::State {
        &self.state
    }

    /// The outstanding request, `None` when halted.
    pub fn current_request(&self) -> Option<&W::Request> {
        self.request.as_ref()
    }

    /// Name of the suspended transition, if any.
    pub fn active_transition(&self) -> Option<&str> {
        self.active.map(|index| self.transitions[index].name())
    }

    pub fn is_suspended(&self) -> bool {
        self.active.is_some()
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn env(&self) -> &W::Env {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut W::Env {
        &mut self.env
    }

    /// Discard the machine and keep its environment.
    ///
    /// Resources held by the current state are not released; only a
    /// cleanup transition does that.
    pub fn into_env(self) -> W::Env {
        self.env
    }

    /// Advance the machine.
    ///
    /// With no transition suspended, the first transition whose condition
    /// holds is selected. It receives `response` through its dispatch table,
    /// or its initial action when `response` is `None`. A new state clears
    /// the transition and the loop continues without input; a request
    /// suspends and returns.
    ///
    /// On error the whole call is discarded: state, request, active
    /// transition and history are put back as they were before the call, so
    /// the same request can be answered again. Changes a handler made to the
    /// environment are not undone.
    pub fn run(&mut self, response: Option<W::Response>) -> Result<(), MachineError<W::Error>> {
        let state = self.state.clone();
        let request = self.request.clone();
        let active = self.active;
        let history = self.history.clone();

        match self.advance(response) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.state = state;
                self.request = request;
                self.active = active;
                self.history = history;
                Err(err)
            }
        }
    }

    fn advance(&mut self, response: Option<W::Response>) -> Result<(), MachineError<W::Error>> {
        let mut response = response;
        let limit = self.config.max_auto_steps.max(1);
        let mut steps = 0;

        loop {
            let index = match self.active {
                Some(index) => index,
                None => match self.select() {
                    Some(index) => index,
                    None => {
                        if let Some(response) = response {
                            let received = format!("{:?}", response.kind());
                            warn!(state = self.state.name(), %received, "response while halted");
                            return Err(MachineError::Unexpected { received });
                        }
                        debug!(state = self.state.name(), "no transition applies, halting");
                        self.request = None;
                        return Ok(());
                    }
                },
            };

            let transition = &self.transitions[index];
            steps += 1;
            if steps > limit {
                warn!(transition = transition.name(), steps = limit, "run exceeded step limit");
                return Err(MachineError::Stalled {
                    transition: transition.name().to_string(),
                    steps: limit,
                });
            }

            let resumed = response.is_some();
            trace!(
                transition = transition.name(),
                state = self.state.name(),
                resumed,
                "invoking transition"
            );

            let result = match response.take() {
                None if self.active.is_some() => Err(MachineError::InvalidResponse {
                    transition: transition.name().to_string(),
                    received: "no response".to_string(),
                }),
                None => transition.start(&mut self.env, &self.state),
                Some(response) => match &self.request {
                    Some(request) if !W::answers(request, &response) => {
                        Err(MachineError::InvalidResponse {
                            transition: transition.name().to_string(),
                            received: format!("{:?}", response.kind()),
                        })
                    }
                    _ => transition.respond(&mut self.env, &self.state, response),
                },
            };

            let result = match result {
                Ok(result) => result,
                Err(err) => {
                    if err.is_protocol() {
                        warn!(transition = transition.name(), error = %err, "rejected response");
                    } else {
                        debug!(transition = transition.name(), error = %err, "transition failed");
                    }
                    return Err(err);
                }
            };

            match result {
                TransitionResult::NewState(next) => {
                    if !resumed && next == self.state {
                        warn!(transition = transition.name(), "initial action made no progress");
                        return Err(MachineError::NoProgress {
                            transition: transition.name().to_string(),
                            state: self.state.name().to_string(),
                        });
                    }

                    debug!(
                        transition = transition.name(),
                        from = self.state.name(),
                        to = next.name(),
                        "state replaced"
                    );
                    if self.config.record_history {
                        self.history = std::mem::take(&mut self.history).record(
                            transition.name(),
                            self.state.name(),
                            next.name(),
                            Utc::now(),
                        );
                    }
                    self.state = next;
                    self.request = None;
                    self.active = None;
                }
                TransitionResult::Request(request) => {
                    debug!(
                        transition = transition.name(),
                        request = request.name(),
                        "suspended for input"
                    );
                    self.request = Some(request);
                    self.active = Some(index);
                    return Ok(());
                }
            }
        }
    }

    /// First transition whose condition holds, in declaration order.
    fn select(&self) -> Option<usize> {
        let index = self
            .transitions
            .iter()
            .position(|t| t.is_applicable(&self.state))?;
        debug!(
            transition = self.transitions[index].name(),
            state = self.state.name(),
            "selected transition"
        );
        Some(index)
    }

    /// Snapshot the machine's position for later resumption.
    pub fn checkpoint(&self) -> Checkpoint<W::State, W::Request> {
        Checkpoint::new(
            self.state.clone(),
            self.request.clone(),
            self.active_transition().map(str::to_string),
            self.history.clone(),
        )
        .with_config(self.config.clone())
    }

    /// Rebuild a machine from a checkpoint.
    ///
    /// `transitions` must contain the transition that was suspended when
    /// the checkpoint was taken, under the same name. The machine keeps the
    /// configuration stored in the checkpoint.
    pub fn resume(
        env: W::Env,
        transitions: Vec<Transition<W>>,
        checkpoint: Checkpoint<W::State, W::Request>,
    ) -> Result<Self, CheckpointError> {
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        let active = match (&checkpoint.active_transition, &checkpoint.request) {
            (Some(name), Some(_)) => Some(
                transitions
                    .iter()
                    .position(|t| t.name() == name)
                    .ok_or_else(|| CheckpointError::UnknownTransition(name.clone()))?,
            ),
            (None, None) => None,
            (Some(name), None) => {
                return Err(CheckpointError::ValidationFailed(format!(
                    "transition '{name}' is suspended without a request"
                )))
            }
            (None, Some(request)) => {
                return Err(CheckpointError::ValidationFailed(format!(
                    "request '{}' has no suspended transition",
                    request.name()
                )))
            }
        };

        debug!(
            checkpoint = %checkpoint.id,
            state = checkpoint.state.name(),
            active = checkpoint.active_transition.as_deref(),
            "resuming from checkpoint"
        );

        Ok(Self {
            env,
            config: checkpoint.config,
            transitions,
            state: checkpoint.state,
            request: checkpoint.request,
            active,
            history: checkpoint.history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransitionBuilder;
    use serde::{Deserialize, Serialize};

    crate::state_enum! {
        #[derive(Default)]
        enum Phase {
            #[default]
            Empty,
            Loaded(u32),
            Unloading(u32),
        }
    }

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Ask {
        Pick,
        Menu,
    }

    impl Request for Ask {
        fn name(&self) -> &str {
            match self {
                Self::Pick => "Pick",
                Self::Menu => "Menu",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Picked(u32);

    #[derive(Debug, Clone, PartialEq)]
    struct Bump;

    #[derive(Debug, Clone, PartialEq)]
    struct Unload;

    #[derive(Debug, Clone, PartialEq)]
    struct Ignored;

    crate::response_enum! {
        enum Answer => AnswerKind {
            Picked(Picked),
            Bump(Bump),
            Unload(Unload),
            Ignored(Ignored),
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("cannot open {0}")]
    struct OpenFailed(u32);

    #[derive(Default)]
    struct Env {
        released: usize,
    }

    struct Flow;

    impl Workflow for Flow {
        type State = Phase;
        type Request = Ask;
        type Response = Answer;
        type Env = Env;
        type Error = OpenFailed;

        fn answers(request: &Ask, response: &Answer) -> bool {
            match request {
                Ask::Pick => matches!(response, Answer::Picked(_)),
                Ask::Menu => !matches!(response, Answer::Picked(_)),
            }
        }
    }

    fn transitions() -> Vec<Transition<Flow>> {
        let load = TransitionBuilder::<Flow>::new("load")
            .condition(|s| matches!(s, Phase::Empty))
            .initial_action(|_, _| Ok(TransitionResult::Request(Ask::Pick)))
            .action(|_, _, Picked(n): Picked| {
                if n == 0 {
                    Err(OpenFailed(n))
                } else {
                    Ok(TransitionResult::NewState(Phase::Loaded(n)))
                }
            })
            .build()
            .unwrap();

        let idle = TransitionBuilder::<Flow>::new("idle")
            .condition(|s| matches!(s, Phase::Loaded(_)))
            .initial_action(|_, _| Ok(TransitionResult::Request(Ask::Menu)))
            .action(|_, state, _: Bump| match state {
                Phase::Loaded(n) => Ok(TransitionResult::NewState(Phase::Loaded(n + 1))),
                other => Ok(TransitionResult::NewState(other.clone())),
            })
            .action(|_, state, _: Unload| match state {
                Phase::Loaded(n) => Ok(TransitionResult::NewState(Phase::Unloading(*n))),
                other => Ok(TransitionResult::NewState(other.clone())),
            })
            .build()
            .unwrap();

        let unload = TransitionBuilder::<Flow>::new("unload")
            .condition(|s| matches!(s, Phase::Unloading(_)))
            .initial_action(|env: &mut Env, _| {
                env.released += 1;
                Ok(TransitionResult::NewState(Phase::Empty))
            })
            .build()
            .unwrap();

        vec![load, idle, unload]
    }

    fn machine() -> StateMachine<Flow> {
        let mut machine = StateMachine::new(Env::default());
        for transition in transitions() {
            machine.add_transition(transition);
        }
        machine
    }

    #[test]
    fn new_machine_starts_in_default_state() {
        let machine = machine();

        assert_eq!(machine.current_state(), &Phase::Empty);
        assert!(machine.current_request().is_none());
        assert!(!machine.is_suspended());
    }

    #[test]
    fn run_without_response_suspends_on_first_request() {
        let mut machine = machine();

        machine.run(None).unwrap();

        assert_eq!(machine.current_request(), Some(&Ask::Pick));
        assert_eq!(machine.active_transition(), Some("load"));
        assert_eq!(machine.current_state(), &Phase::Empty);
    }

    #[test]
    fn new_state_auto_advances_to_next_request() {
        let mut machine = machine();
        machine.run(None).unwrap();

        machine.run(Some(Picked(3).into())).unwrap();

        assert_eq!(machine.current_state(), &Phase::Loaded(3));
        assert_eq!(machine.current_request(), Some(&Ask::Menu));
        assert_eq!(machine.active_transition(), Some("idle"));
        assert_eq!(machine.history().get_path(), vec!["Empty", "Loaded"]);
    }

    #[test]
    fn unload_runs_without_driver_round_trip() {
        let mut machine = machine();
        machine.run(None).unwrap();
        machine.run(Some(Picked(3).into())).unwrap();

        machine.run(Some(Unload.into())).unwrap();

        assert_eq!(machine.current_state(), &Phase::Empty);
        assert!(machine.current_state().is_initial());
        assert_eq!(machine.current_request(), Some(&Ask::Pick));
        assert_eq!(machine.env().released, 1);
        assert_eq!(
            machine.history().transition_names(),
            vec!["load", "idle", "unload"]
        );
    }

    #[test]
    fn fatal_error_leaves_machine_untouched() {
        let mut machine = machine();
        machine.run(None).unwrap();

        let err = machine.run(Some(Picked(0).into())).unwrap_err();

        assert!(!err.is_protocol());
        assert_eq!(err.domain().map(|e| e.0), Some(0));
        assert_eq!(machine.current_state(), &Phase::Empty);
        assert_eq!(machine.current_request(), Some(&Ask::Pick));
        assert_eq!(machine.active_transition(), Some("load"));

        machine.run(Some(Picked(5).into())).unwrap();
        assert_eq!(machine.current_state(), &Phase::Loaded(5));
    }

    #[test]
    fn response_for_other_request_is_rejected() {
        let mut machine = machine();
        machine.run(None).unwrap();

        let err = machine.run(Some(Bump.into())).unwrap_err();

        assert!(matches!(err, MachineError::InvalidResponse { .. }));
        assert_eq!(machine.current_state(), &Phase::Empty);
        assert_eq!(machine.current_request(), Some(&Ask::Pick));
    }

    #[test]
    fn unregistered_response_kind_is_rejected() {
        let mut machine = machine();
        machine.run(None).unwrap();
        machine.run(Some(Picked(2).into())).unwrap();

        let err = machine.run(Some(Ignored.into())).unwrap_err();

        assert!(err.is_protocol());
        assert_eq!(machine.current_state(), &Phase::Loaded(2));
        assert_eq!(machine.current_request(), Some(&Ask::Menu));

        machine.run(Some(Bump.into())).unwrap();
        assert_eq!(machine.current_state(), &Phase::Loaded(3));
    }

    #[test]
    fn missing_response_while_suspended_is_rejected() {
        let mut machine = machine();
        machine.run(None).unwrap();

        let err = machine.run(None).unwrap_err();

        assert!(err.is_protocol());
        assert_eq!(machine.current_request(), Some(&Ask::Pick));
        assert_eq!(machine.active_transition(), Some("load"));
    }

    #[test]
    fn halted_machine_ignores_empty_run() {
        let mut machine: StateMachine<Flow> = StateMachine::new(Env::default());
        let idle = transitions().remove(1);
        machine.add_transition(idle);

        machine.run(None).unwrap();
        machine.run(None).unwrap();

        assert_eq!(machine.current_state(), &Phase::Empty);
        assert!(machine.current_request().is_none());
        assert!(machine.history().is_empty());
    }

    #[test]
    fn halted_machine_rejects_responses() {
        let mut machine: StateMachine<Flow> = StateMachine::new(Env::default());

        let err = machine.run(Some(Bump.into())).unwrap_err();

        assert!(matches!(err, MachineError::Unexpected { .. }));
        assert_eq!(machine.current_state(), &Phase::Empty);
    }

    #[test]
    fn response_on_fresh_selection_uses_dispatch_table() {
        let mut machine = machine();

        machine.run(Some(Picked(4).into())).unwrap();

        assert_eq!(machine.current_state(), &Phase::Loaded(4));
        assert_eq!(machine.current_request(), Some(&Ask::Menu));
    }

    #[test]
    fn first_applicable_transition_wins() {
        let mut machine = StateMachine::with_state(Env::default(), Phase::Loaded(1));
        machine.add_transition(
            TransitionBuilder::<Flow>::new("first")
                .condition(|s| matches!(s, Phase::Loaded(_)))
                .initial_action(|_, _| Ok(TransitionResult::Request(Ask::Menu)))
                .build()
                .unwrap(),
        );
        machine.add_transition(
            TransitionBuilder::<Flow>::new("second")
                .condition(|_| true)
                .initial_action(|_, _| Ok(TransitionResult::Request(Ask::Pick)))
                .build()
                .unwrap(),
        );

        machine.run(None).unwrap();

        assert_eq!(machine.active_transition(), Some("first"));
        assert_eq!(machine.current_request(), Some(&Ask::Menu));
    }

    #[test]
    fn initial_action_returning_same_state_is_no_progress() {
        let mut machine = StateMachine::with_state(Env::default(), Phase::Loaded(1));
        machine.add_transition(
            TransitionBuilder::<Flow>::new("spin")
                .condition(|s| matches!(s, Phase::Loaded(_)))
                .initial_action(|_, state| Ok(TransitionResult::NewState(state.clone())))
                .build()
                .unwrap(),
        );

        let err = machine.run(None).unwrap_err();

        assert!(matches!(err, MachineError::NoProgress { .. }));
        assert_eq!(machine.current_state(), &Phase::Loaded(1));
        assert!(!machine.is_suspended());
    }

    #[test]
    fn cycling_transitions_trip_step_limit() {
        let mut machine = StateMachine::with_state(Env::default(), Phase::Loaded(1))
            .with_config(MachineConfig::default().max_auto_steps(5));
        machine.add_transition(
            TransitionBuilder::<Flow>::new("out")
                .condition(|s| matches!(s, Phase::Loaded(_)))
                .initial_action(|_, _| Ok(TransitionResult::NewState(Phase::Unloading(1))))
                .build()
                .unwrap(),
        );
        machine.add_transition(
            TransitionBuilder::<Flow>::new("back")
                .condition(|s| matches!(s, Phase::Unloading(_)))
                .initial_action(|_, _| Ok(TransitionResult::NewState(Phase::Loaded(1))))
                .build()
                .unwrap(),
        );

        let err = machine.run(None).unwrap_err();

        assert!(matches!(err, MachineError::Stalled { steps: 5, .. }));
        assert_eq!(machine.current_state(), &Phase::Loaded(1));
        assert!(machine.history().is_empty());
    }

    #[test]
    fn zero_step_limit_still_runs_one_step() {
        let mut config = MachineConfig::default();
        config.max_auto_steps = 0;
        let mut machine = machine().with_config(config);

        machine.run(None).unwrap();

        assert_eq!(machine.current_request(), Some(&Ask::Pick));
    }

    #[test]
    fn failure_after_auto_advance_rolls_back_whole_call() {
        let mut machine = StateMachine::new(Env::default());
        machine.add_transition(transitions().remove(0));
        machine.add_transition(
            crate::builder::automatic::<Flow, _, _>(
                "check",
                |s| matches!(s, Phase::Loaded(_)),
                |_, state: &Phase| match state {
                    Phase::Loaded(n) => Err(OpenFailed(*n)),
                    other => Ok(other.clone()),
                },
            )
            .unwrap(),
        );
        machine.run(None).unwrap();

        let err = machine.run(Some(Picked(3).into())).unwrap_err();

        assert_eq!(err.domain().map(|e| e.0), Some(3));
        assert_eq!(machine.current_state(), &Phase::Empty);
        assert_eq!(machine.current_request(), Some(&Ask::Pick));
        assert_eq!(machine.active_transition(), Some("load"));
        assert!(machine.history().is_empty());

        // The same request is still open, so answering again reaches the handler.
        let retry = machine.run(Some(Picked(4).into())).unwrap_err();
        assert_eq!(retry.domain().map(|e| e.0), Some(4));
    }

    #[test]
    fn history_can_be_disabled() {
        let mut machine = machine().with_config(MachineConfig::default().record_history(false));
        machine.run(None).unwrap();
        machine.run(Some(Picked(1).into())).unwrap();

        assert!(machine.history().is_empty());
        assert_eq!(machine.current_state(), &Phase::Loaded(1));
    }

    #[test]
    fn checkpoint_resumes_suspended_transition() {
        let mut machine = machine();
        machine.run(None).unwrap();
        machine.run(Some(Picked(7).into())).unwrap();

        let checkpoint = machine.checkpoint();
        let restored = Checkpoint::from_json(&checkpoint.to_json().unwrap()).unwrap();
        let mut resumed = StateMachine::resume(Env::default(), transitions(), restored).unwrap();

        assert_eq!(resumed.current_state(), &Phase::Loaded(7));
        assert_eq!(resumed.active_transition(), Some("idle"));
        assert_eq!(resumed.history().len(), 1);

        resumed.run(Some(Bump.into())).unwrap();
        assert_eq!(resumed.current_state(), &Phase::Loaded(8));
    }

    #[test]
    fn resume_keeps_machine_config() {
        let config = MachineConfig::default()
            .max_auto_steps(5)
            .record_history(false);
        let mut machine = machine().with_config(config.clone());
        machine.run(None).unwrap();

        let bytes = machine.checkpoint().to_bytes().unwrap();
        let mut resumed =
            StateMachine::resume(Env::default(), transitions(), Checkpoint::from_bytes(&bytes).unwrap())
                .unwrap();

        assert_eq!(resumed.config(), &config);
        resumed.run(Some(Picked(2).into())).unwrap();
        assert!(resumed.history().is_empty());
    }

    #[test]
    fn resume_rejects_unknown_transition() {
        let mut machine = machine();
        machine.run(None).unwrap();
        let checkpoint = machine.checkpoint();

        let only_idle = vec![transitions().remove(1)];
        let result = StateMachine::<Flow>::resume(Env::default(), only_idle, checkpoint);

        assert!(matches!(result, Err(CheckpointError::UnknownTransition(name)) if name == "load"));
    }

    #[test]
    fn resume_rejects_inconsistent_checkpoint() {
        let mut checkpoint = machine().checkpoint();
        checkpoint.request = Some(Ask::Menu);

        let result = StateMachine::<Flow>::resume(Env::default(), transitions(), checkpoint);

        assert!(matches!(result, Err(CheckpointError::ValidationFailed(_))));
    }
}
