//! Code elements that a comment word may refer to.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Separator between a candidate's receiver expression and its name in display form.
pub const DISPLAY_SEPARATOR: char = ':';

/// A method or constructor that can be invoked from an oracle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocableMember {
    /// Simple member name
    pub name: String,
    /// Type declaring the member
    #[serde(default)]
    pub declaring_type: String,
    /// Parameter type descriptors
    #[serde(default)]
    pub parameter_types: Vec<String>,
    /// Return type descriptor
    #[serde(default)]
    pub return_type: String,
}

impl InvocableMember {
    /// Member with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring_type: String::new(),
            parameter_types: Vec::new(),
            return_type: String::new(),
        }
    }

    /// Name followed by the parenthesized parameter types.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.parameter_types.join(","))
    }
}

/// A member invoked on a receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundCallCandidate {
    member: InvocableMember,
    receiver: String,
    #[serde(skip)]
    identifiers: OnceCell<IndexSet<String>>,
}

impl BoundCallCandidate {
    /// Bind `member` to `receiver`.
    pub fn new(receiver: impl Into<String>, member: InvocableMember) -> Self {
        Self {
            member,
            receiver: receiver.into(),
            identifiers: OnceCell::new(),
        }
    }

    /// The invoked member.
    pub fn member(&self) -> &InvocableMember {
        &self.member
    }

    /// Receiver tag.
    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    /// Identifiers derived from the member: its simple name.
    pub fn identifiers(&self) -> &IndexSet<String> {
        self.identifiers
            .get_or_init(|| IndexSet::from([self.member.name.clone()]))
    }
}

impl PartialEq for BoundCallCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.member == other.member && self.receiver == other.receiver
    }
}

impl Eq for BoundCallCandidate {}

impl Hash for BoundCallCandidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.member.hash(state);
        self.receiver.hash(state);
    }
}

/// A parameter, field or other plain expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralCandidate {
    expression: String,
    identifiers: IndexSet<String>,
}

impl GeneralCandidate {
    /// Candidate for `expression`, known by the given identifier names.
    pub fn new<I, S>(expression: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expression: expression.into(),
            identifiers: identifiers.into_iter().map(Into::into).collect(),
        }
    }

    /// Code expression the candidate stands for.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Identifier names, in insertion order.
    pub fn identifiers(&self) -> &IndexSet<String> {
        &self.identifiers
    }
}

impl Hash for GeneralCandidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Set equality ignores order, so only order-free parts are hashed.
        self.expression.hash(state);
        self.identifiers.len().hash(state);
    }
}

/// A matchable code element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Candidate {
    /// Member invocation on a receiver
    BoundCall(BoundCallCandidate),
    /// Plain identifier(s)
    General(GeneralCandidate),
}

impl Candidate {
    /// Member invocation candidate.
    pub fn bound_call(receiver: impl Into<String>, member: InvocableMember) -> Self {
        Self::BoundCall(BoundCallCandidate::new(receiver, member))
    }

    /// Plain identifier candidate.
    pub fn general<I, S>(expression: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::General(GeneralCandidate::new(expression, identifiers))
    }

    /// Identifier set used for tokenization.
    pub fn identifiers(&self) -> &IndexSet<String> {
        match self {
            Self::BoundCall(call) => call.identifiers(),
            Self::General(general) => general.identifiers(),
        }
    }

    /// Name that is split and compared against the comment: the first
    /// identifier, or the bare expression of a general candidate without any.
    pub fn match_name(&self) -> &str {
        match self.identifiers().first() {
            Some(name) => name.as_str(),
            None => match self {
                Self::BoundCall(call) => call.member.name.as_str(),
                Self::General(general) => general.expression.as_str(),
            },
        }
    }

    /// `<receiver or expression>:<member signature or identifiers>`.
    pub fn display_form(&self) -> String {
        self.to_string()
    }

    /// Whether the display form starts with `<receiver>:`.
    pub fn denotes_receiver(&self, receiver: &str) -> bool {
        let display = self.display_form();
        display
            .strip_prefix(receiver)
            .is_some_and(|rest| rest.starts_with(DISPLAY_SEPARATOR))
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoundCall(call) => write!(
                f,
                "{}{}{}",
                call.receiver,
                DISPLAY_SEPARATOR,
                call.member.signature()
            ),
            Self::General(general) => {
                let names: Vec<&str> = general.identifiers.iter().map(String::as_str).collect();
                write!(f, "{}{}{}", general.expression, DISPLAY_SEPARATOR, names.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_call_identifier_is_member_name() {
        let candidate = BoundCallCandidate::new("target", InvocableMember::new("getSize"));
        let ids: Vec<&String> = candidate.identifiers().iter().collect();
        assert_eq!(ids, vec!["getSize"]);
    }

    #[test]
    fn match_name_uses_first_identifier() {
        let general = Candidate::general("args[0]", ["capacity", "initialCapacity"]);
        assert_eq!(general.match_name(), "capacity");

        let call = Candidate::bound_call("args[0]", InvocableMember::new("isEmpty"));
        assert_eq!(call.match_name(), "isEmpty");

        let bare = Candidate::general("this", Vec::<String>::new());
        assert_eq!(bare.match_name(), "this");
    }

    #[test]
    fn display_form_and_receiver_marker() {
        let mut member = InvocableMember::new("contains");
        member.parameter_types = vec!["Object".to_string()];
        let call = Candidate::bound_call("target", member);
        assert_eq!(call.display_form(), "target:contains(Object)");
        assert!(call.denotes_receiver("target"));
        assert!(!call.denotes_receiver("targ"));

        let field = Candidate::general("args[1]", ["count"]);
        assert_eq!(field.display_form(), "args[1]:count");
        assert!(!field.denotes_receiver("target"));
    }

    #[test]
    fn equality_ignores_lazy_identifiers() {
        let a = Candidate::bound_call("target", InvocableMember::new("getSize"));
        let b = Candidate::bound_call("target", InvocableMember::new("getSize"));
        a.identifiers();
        assert_eq!(a, b);
    }

    #[test]
    fn candidates_deserialize_from_tagged_json() {
        let json = r#"[
            {"kind":"bound_call","member":{"name":"getSize"},"receiver":"target"},
            {"kind":"general","expression":"args[0]","identifiers":["size"]}
        ]"#;
        let candidates: Vec<Candidate> = serde_json::from_str(json).unwrap();
        assert!(matches!(candidates[0], Candidate::BoundCall(_)));
        assert!(matches!(candidates[1], Candidate::General(_)));
        assert_eq!(candidates[0].match_name(), "getSize");
    }
}
