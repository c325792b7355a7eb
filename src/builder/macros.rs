//! Macros for declaring workflow state and response types.

/// Generate a state enum together with its `State` implementation.
///
/// Variants may be unit variants or tuple variants carrying payload. The
/// enum derives `Clone`, `PartialEq`, `Debug`, `Serialize` and
/// `Deserialize`; derive `Default` yourself and mark the initial variant
/// with `#[default]`.
///
/// # Example
///
/// ```
/// use waypoint::core::State;
/// use waypoint::state_enum;
///
/// state_enum! {
///     #[derive(Default)]
///     pub enum PlayerState {
///         #[default]
///         Stopped,
///         Playing(String, u32),
///         Paused(String),
///     }
/// }
///
/// assert_eq!(PlayerState::Playing("intro".into(), 3).name(), "Playing");
/// assert!(PlayerState::Stopped.is_initial());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(( $($field:ty),* $(,)? ))?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $(( $($field),* ))?
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate a response enum over payload types.
///
/// Each variant wraps exactly one payload type, and every payload type may
/// appear only once. The macro emits:
/// - the response enum (deriving `Debug` plus any attributes given),
/// - a `Copy` tag enum named after `=>`, one tag per variant,
/// - `Response` for the enum with the tag enum as `Kind`,
/// - `ResponseVariant` and `From` for every payload type.
///
/// # Example
///
/// ```
/// use waypoint::core::{Response, ResponseVariant};
/// use waypoint::response_enum;
///
/// #[derive(Debug, Clone, PartialEq)]
/// pub struct Play { pub track: String }
///
/// #[derive(Debug, Clone, PartialEq)]
/// pub struct Stop;
///
/// response_enum! {
///     #[derive(Clone, PartialEq)]
///     pub enum PlayerResponse => PlayerResponseKind {
///         Play(Play),
///         Stop(Stop),
///     }
/// }
///
/// let response: PlayerResponse = Stop.into();
/// assert_eq!(response.kind(), PlayerResponseKind::Stop);
/// assert_eq!(<Play as ResponseVariant<PlayerResponse>>::KIND, PlayerResponseKind::Play);
/// assert_eq!(Stop::extract(response), Some(Stop));
/// ```
#[macro_export]
macro_rules! response_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident => $kind:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($payload:ty)
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant($payload)
            ),*
        }

        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $kind {
            $($variant),*
        }

        impl $crate::core::Response for $name {
            type Kind = $kind;

            fn kind(&self) -> $kind {
                match self {
                    $(Self::$variant(_) => $kind::$variant),*
                }
            }
        }

        $(
            impl $crate::core::ResponseVariant<$name> for $payload {
                const KIND: $kind = $kind::$variant;

                #[allow(unreachable_patterns)]
                fn extract(response: $name) -> ::std::option::Option<Self> {
                    match response {
                        $name::$variant(payload) => ::std::option::Option::Some(payload),
                        _ => ::std::option::Option::None,
                    }
                }
            }

            impl ::std::convert::From<$payload> for $name {
                fn from(payload: $payload) -> Self {
                    $name::$variant(payload)
                }
            }
        )*
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Response, ResponseVariant, State};

    state_enum! {
        #[derive(Default)]
        enum TestState {
            #[default]
            Empty,
            Loaded(String),
            Moved(String, u32),
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Select {
        path: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Unload;

    response_enum! {
        #[derive(Clone, PartialEq)]
        enum TestResponse => TestResponseKind {
            Select(Select),
            Unload(Unload),
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Empty.name(), "Empty");
        assert_eq!(TestState::Loaded("a".into()).name(), "Loaded");
        assert_eq!(TestState::Moved("a".into(), 2).name(), "Moved");
        assert!(TestState::Empty.is_initial());
        assert!(!TestState::Loaded("a".into()).is_initial());
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            #[derive(Default)]
            pub enum PublicState {
                #[default]
                A,
                B,
            }
        }

        assert_eq!(PublicState::B.name(), "B");
        assert!(PublicState::A.is_initial());
    }

    #[test]
    fn response_enum_tags_variants() {
        let select: TestResponse = Select { path: "a".into() }.into();
        let unload: TestResponse = Unload.into();

        assert_eq!(select.kind(), TestResponseKind::Select);
        assert_eq!(unload.kind(), TestResponseKind::Unload);
    }

    #[test]
    fn response_enum_extracts_payloads() {
        let select = TestResponse::Select(Select { path: "a".into() });

        assert_eq!(Unload::extract(select.clone()), None);
        assert_eq!(Select::extract(select), Some(Select { path: "a".into() }));
        assert_eq!(<Unload as ResponseVariant<TestResponse>>::KIND, TestResponseKind::Unload);
    }
}
