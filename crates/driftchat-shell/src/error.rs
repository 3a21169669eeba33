use thiserror::Error;

/// Failures that can surface from the shell core.
///
/// The type is `Clone` because a failed lazy view activation memoizes its
/// error inside the shared handle and every later resolution observes the
/// same value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("view_activation_failed:{view}:{message}")]
    ViewActivation { view: &'static str, message: String },
    #[error("model_catalogue_failed:{message}")]
    ModelCatalogue { message: String },
    #[error("access_state_failed:{message}")]
    AccessState { message: String },
    #[error("capability_bringup_failed:{message}")]
    Capability { message: String },
    #[error("render_failed:{message}")]
    Render { message: String },
}

#[cfg(test)]
mod tests {
    use super::ShellError;

    #[test]
    fn display_strings_keep_machine_readable_shape() {
        let err = ShellError::ViewActivation {
            view: "settings",
            message: "module unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "view_activation_failed:settings:module unavailable"
        );

        let err = ShellError::Capability {
            message: "bring-up refused".to_string(),
        };
        assert_eq!(err.to_string(), "capability_bringup_failed:bring-up refused");
    }
}
