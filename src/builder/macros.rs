//! Macros for ergonomic state machine construction.

/// Generate a fieldless state enum and its `State` implementation.
///
/// Each state is named after its variant identifier.
///
/// # Example
///
/// ```
/// use statebag::core::State;
/// use statebag::state_enum;
///
/// state_enum! {
///     pub enum Player {
///         Idle,
///         Running,
///         Crouched,
///         Jumping,
///         WallSliding,
///     }
/// }
///
/// assert_eq!(Player::WallSliding.name(), "WallSliding");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Idle,
            Running,
            Crouched,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Running.name(), "Running");
        assert_eq!(TestState::Crouched.name(), "Crouched");
    }

    #[test]
    fn state_enum_supports_visibility_and_attributes() {
        state_enum! {
            /// Menu scenes
            pub enum Scene {
                Title,
                #[allow(dead_code)]
                Lobby,
            }
        }

        assert_eq!(Scene::Title.name(), "Title");
    }

    #[test]
    fn state_enum_round_trips_through_serde() {
        let json = serde_json::to_string(&TestState::Crouched).unwrap();
        assert_eq!(json, "\"Crouched\"");
    }
}
