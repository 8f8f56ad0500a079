use std::fmt;

/// A degradation recorded while building the document.
///
/// Diagnostics never fail a request. They exist so that tests and operators
/// can see what the fail-open branches did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A field annotation was not recognised and was documented as a string.
    UnknownType {
        model: String,
        field: String,
        annotation: String,
    },
    /// A registration was rejected because the name was already taken.
    SchemaCollision { name: String },
    /// A route has no documentation string and was left out of `paths`.
    UndocumentedRoute { route: String },
    /// A route's documentation block could not be parsed.
    MalformedRouteDoc { route: String, message: String },
    /// A components reference points at a schema nobody registered.
    DanglingReference { name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownType {
                model,
                field,
                annotation,
            } => write!(f, "{model}.{field}: unknown type '{annotation}', documented as string"),
            Diagnostic::SchemaCollision { name } => {
                write!(f, "schema '{name}' registered twice with different definitions")
            }
            Diagnostic::UndocumentedRoute { route } => {
                write!(f, "route '{route}' has no documentation")
            }
            Diagnostic::MalformedRouteDoc { route, message } => {
                write!(f, "route '{route}' has malformed documentation: {message}")
            }
            Diagnostic::DanglingReference { name } => {
                write!(f, "reference to unregistered schema '{name}'")
            }
        }
    }
}
