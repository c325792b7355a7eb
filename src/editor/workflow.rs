//! The dataset editor workflow: load, idle, unload.

use crate::builder::{automatic, prompt, BuildError, StateMachineBuilder, TransitionBuilder};
use crate::core::State;
use crate::dataset::{DataSetStore, StoreError};
use crate::editor::config::EditorConfig;
use crate::editor::error::EditorError;
use crate::editor::types::{
    EditResponse, EditorRequest, EditorResponse, EditorState, OverwriteResponse, SaveResponse,
    SelectResponse, Session, UnloadResponse,
};
use crate::machine::{Outcome, StateMachine, Transition, TransitionResult, Workflow};
use std::marker::PhantomData;
use tracing::{debug, info};

/// Notice shown when the user declines to overwrite.
pub const SAVE_CANCELLED: &str = "Save cancelled";

/// Everything editor transitions touch outside their state.
#[derive(Debug, Clone)]
pub struct EditorEnv<St> {
    pub store: St,
    pub config: EditorConfig,
}

impl<St: DataSetStore> EditorEnv<St> {
    pub fn new(store: St, config: EditorConfig) -> Self {
        Self { store, config }
    }

    /// Stored paths that carry the configured file ending.
    pub fn available_data_sets(&self) -> Vec<String> {
        self.store
            .paths()
            .into_iter()
            .filter(|path| path.ends_with(&self.config.file_ending))
            .collect()
    }
}

/// Workflow marker for the dataset editor over store `St`.
pub struct DataSetEditor<St>(PhantomData<fn() -> St>);

impl<St: DataSetStore + 'static> Workflow for DataSetEditor<St> {
    type State = EditorState;
    type Request = EditorRequest;
    type Response = EditorResponse;
    type Env = EditorEnv<St>;
    type Error = EditorError;

    fn answers(request: &EditorRequest, response: &EditorResponse) -> bool {
        request.accepts(response)
    }
}

impl<St: DataSetStore + 'static> DataSetEditor<St> {
    /// The editor's transitions in selection order: `load`, `idle`, `unload`.
    pub fn transitions() -> Result<Vec<Transition<Self>>, BuildError> {
        Ok(vec![load().build()?, idle().build()?, unload()?])
    }

    /// An editor machine in the `Empty` state.
    ///
    /// ```
    /// use waypoint::dataset::{DataSet, MemoryStore};
    /// use waypoint::editor::{
    ///     DataSetEditor, EditorConfig, EditorEnv, EditorRequest, SelectResponse, UnloadResponse,
    /// };
    ///
    /// let mut store = MemoryStore::new();
    /// store.insert("units.dataset", DataSet::new("Units"));
    ///
    /// let env = EditorEnv::new(store, EditorConfig::default());
    /// let mut editor = DataSetEditor::machine(env).unwrap();
    ///
    /// editor.run(None).unwrap();
    /// assert_eq!(editor.current_request(), Some(&EditorRequest::SelectDataSet));
    ///
    /// editor.run(Some(SelectResponse { path: "units.dataset".into() }.into())).unwrap();
    /// assert_eq!(editor.current_request(), Some(&EditorRequest::Idle { notice: None }));
    ///
    /// editor.run(Some(UnloadResponse.into())).unwrap();
    /// assert_eq!(editor.env().store.open_count(), 0);
    /// ```
    pub fn machine(env: EditorEnv<St>) -> Result<StateMachine<Self>, BuildError> {
        StateMachineBuilder::new()
            .transitions(Self::transitions()?)
            .build(env)
    }
}

fn load<St: DataSetStore + 'static>() -> TransitionBuilder<DataSetEditor<St>> {
    prompt::<DataSetEditor<St>, _>(
        "load",
        |s| matches!(s, EditorState::Empty),
        EditorRequest::SelectDataSet,
    )
    .action(|env: &mut EditorEnv<St>, _, select: SelectResponse| {
        let path = env.config.resolve(&select.path)?;
        let data_set = env.store.open(&path).map_err(|source| EditorError::Open {
            path: path.clone(),
            source,
        })?;

        info!(%path, name = %data_set.name, "dataset loaded");
        Ok(TransitionResult::NewState(EditorState::Loaded(Session::new(
            data_set, path,
        ))))
    })
}

fn idle<St: DataSetStore + 'static>() -> TransitionBuilder<DataSetEditor<St>> {
    prompt::<DataSetEditor<St>, _>(
        "idle",
        |s| matches!(s, EditorState::Loaded(_)),
        EditorRequest::Idle { notice: None },
    )
    .action(|env: &mut EditorEnv<St>, state, edit: EditResponse| {
        let session = loaded(state, "idle")?;
        Ok(match apply_edit(&env.config, session.clone(), &edit) {
            Ok(session) => TransitionResult::NewState(EditorState::Loaded(session)),
            Err(notice) => {
                debug!(key = %edit.key, %notice, "edit rejected");
                TransitionResult::Request(EditorRequest::Idle {
                    notice: Some(notice),
                })
            }
        })
    })
    .action(|env: &mut EditorEnv<St>, state, _: SaveResponse| {
        let session = loaded(state, "idle")?;
        save(env, session.clone(), session.owns_target())
    })
    .action(|env: &mut EditorEnv<St>, state, answer: OverwriteResponse| {
        let session = loaded(state, "idle")?;
        if !answer.confirmed {
            return Ok(TransitionResult::Request(EditorRequest::Idle {
                notice: Some(SAVE_CANCELLED.to_string()),
            }));
        }
        save(env, session.clone(), true)
    })
    .action(|_, state, _: UnloadResponse| {
        let session = loaded(state, "idle")?;
        Ok(TransitionResult::NewState(EditorState::Unloading(
            session.clone(),
        )))
    })
}

fn unload<St: DataSetStore + 'static>() -> Result<Transition<DataSetEditor<St>>, BuildError> {
    automatic::<DataSetEditor<St>, _, _>(
        "unload",
        |s| matches!(s, EditorState::Unloading(_)),
        |env: &mut EditorEnv<St>, state: &EditorState| match state {
            EditorState::Unloading(session) => {
                env.store.release(&session.source);
                info!(path = %session.source, "dataset unloaded");
                Ok(EditorState::Empty)
            }
            other => Err(unexpected("unload", other)),
        },
    )
}

fn save<St: DataSetStore>(
    env: &mut EditorEnv<St>,
    session: Session,
    overwrite: bool,
) -> Result<Outcome<DataSetEditor<St>>, EditorError>
where
    St: 'static,
{
    match env.store.save(&session.target, &session.data_set, overwrite) {
        Ok(()) => {
            info!(path = %session.target, overwrite, "dataset saved");
            Ok(TransitionResult::NewState(EditorState::Loaded(
                session.saved(),
            )))
        }
        Err(StoreError::AlreadyExists(path)) => {
            debug!(%path, "save target exists, asking to overwrite");
            Ok(TransitionResult::Request(EditorRequest::ConfirmOverwrite {
                path,
            }))
        }
        Err(source) => Err(EditorError::Save {
            path: session.target,
            source,
        }),
    }
}

/// Apply an edit command, or explain why it was rejected.
fn apply_edit(
    config: &EditorConfig,
    mut session: Session,
    edit: &EditResponse,
) -> Result<Session, String> {
    let [arg] = edit.args.as_slice() else {
        return Err(format!(
            "'{}' takes exactly one argument, got {}",
            edit.key,
            edit.args.len()
        ));
    };

    match edit.key.as_str() {
        "name" => {
            let name = arg.trim();
            if name.is_empty() {
                return Err("Name cannot be empty".to_string());
            }
            session.data_set.name = name.to_string();
        }
        "path" => {
            session.target = config.resolve(arg).map_err(|e| e.to_string())?;
        }
        other => return Err(format!("Unknown property '{other}'")),
    }
    Ok(session)
}

fn loaded<'a>(state: &'a EditorState, transition: &str) -> Result<&'a Session, EditorError> {
    match state {
        EditorState::Loaded(session) => Ok(session),
        other => Err(unexpected(transition, other)),
    }
}

fn unexpected(transition: &str, state: &EditorState) -> EditorError {
    EditorError::UnexpectedState {
        transition: transition.to_string(),
        state: state.name().to_string(),
    }
}
