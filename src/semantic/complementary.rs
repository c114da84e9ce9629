//! Getter/setter complement detection.
//!
//! A setter's documentation describes the value being stored, so the getter
//! that reads the same property back is almost always a false match for it.

use crate::core::model::DeclaredMethod;
use crate::semantic::candidate::Candidate;

/// Whether `candidate` is the getter complementary to `method`: the candidate
/// is a bound call whose name contains `get<Property>` and `method` is named
/// `set<Property>`.
pub fn is_complementary(candidate: &Candidate, method: &DeclaredMethod) -> bool {
    match candidate {
        Candidate::BoundCall(call) => getter_property(&call.member().name)
            .is_some_and(|property| is_setter_for(method.simple_name(), property)),
        Candidate::General(_) => false,
    }
}

/// Text after the first `get` that is immediately followed by an uppercase letter.
pub fn getter_property(name: &str) -> Option<&str> {
    name.match_indices("get").find_map(|(index, _)| {
        let rest = &name[index + 3..];
        rest.starts_with(|c: char| c.is_ascii_uppercase())
            .then_some(rest)
    })
}

fn is_setter_for(method_name: &str, property: &str) -> bool {
    method_name
        .strip_prefix("set")
        .is_some_and(|rest| rest == property)
}
