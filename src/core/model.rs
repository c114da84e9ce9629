//! Documented-method model consumed by the matcher and the compliance classifier.
//!
//! A [`DeclaredMethod`] identifies the method or constructor whose
//! documentation is being translated. Names are validated at construction, so
//! every value of this type carries a well-formed qualified name.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::core::errors::{DocOracleError, Result};

/// Separator between package, type, and member names.
pub const NAME_SEPARATOR: char = '.';

/// A formal parameter of a documented method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    type_name: String,
}

impl Parameter {
    /// Create a parameter from its name and type descriptor.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type descriptor.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_name, self.name)
    }
}

/// A `@throws` entry: the exception type and the comment describing when it is thrown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThrowsTag {
    exception: String,
    comment: String,
}

impl ThrowsTag {
    /// Create a throws tag.
    pub fn new(exception: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            exception: exception.into(),
            comment: comment.into(),
        }
    }

    /// Exception type name.
    pub fn exception(&self) -> &str {
        &self.exception
    }

    /// Free-text condition under which the exception is thrown.
    pub fn comment(&self) -> &str {
        &self.comment
    }
}

impl fmt::Display for ThrowsTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@throws {} {}", self.exception, self.comment)
    }
}

/// Identity of a documented method or constructor.
///
/// Equality and hashing use the return type, qualified name, parameters and
/// throws tags. The signature and the constructor flag are derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MethodDescriptor", into = "MethodDescriptor")]
pub struct DeclaredMethod {
    return_type: String,
    name: String,
    simple_name: String,
    containing_class: String,
    is_constructor: bool,
    parameters: Vec<Parameter>,
    throws_tags: Vec<ThrowsTag>,
    signature: String,
}

impl DeclaredMethod {
    /// Start building a method named `name` (`<package>.<Type>.<member>`, package optional).
    pub fn builder(
        return_type: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
    ) -> Result<DeclaredMethodBuilder> {
        DeclaredMethodBuilder::new(return_type, name, parameters)
    }

    /// Return type; always empty for constructors.
    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    /// Fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    /// Fully qualified name of the containing type.
    pub fn containing_class(&self) -> &str {
        &self.containing_class
    }

    /// Simple name of the containing type.
    pub fn containing_class_simple_name(&self) -> &str {
        simple_part(&self.containing_class)
    }

    /// Whether this member is a constructor of its containing type.
    pub fn is_constructor(&self) -> bool {
        self.is_constructor
    }

    /// Formal parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Throws tags attached to the documentation.
    pub fn throws_tags(&self) -> &[ThrowsTag] {
        &self.throws_tags
    }

    /// Signature without return type, e.g. `pkg.Foo.bar(int x,String y)`.
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl PartialEq for DeclaredMethod {
    fn eq(&self, other: &Self) -> bool {
        self.return_type == other.return_type
            && self.name == other.name
            && self.parameters == other.parameters
            && self.throws_tags == other.throws_tags
    }
}

impl Eq for DeclaredMethod {}

impl Hash for DeclaredMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.return_type.hash(state);
        self.name.hash(state);
        self.parameters.hash(state);
        self.throws_tags.hash(state);
    }
}

impl fmt::Display for DeclaredMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.return_type.is_empty() {
            write!(f, "{}", self.signature)
        } else {
            write!(f, "{} {}", self.return_type, self.signature)
        }
    }
}

/// Builder for [`DeclaredMethod`] that deduplicates throws tags.
#[derive(Debug, Clone)]
pub struct DeclaredMethodBuilder {
    return_type: String,
    name: String,
    parameters: Vec<Parameter>,
    throws_tags: Vec<ThrowsTag>,
}

impl DeclaredMethodBuilder {
    fn new(
        return_type: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
    ) -> Result<Self> {
        let name = name.into();
        validate_qualified_name(&name)?;
        Ok(Self {
            return_type: return_type.into(),
            name,
            parameters,
            throws_tags: Vec::new(),
        })
    }

    /// Attach a throws tag unless an equal tag is already present.
    pub fn tag(mut self, tag: ThrowsTag) -> Self {
        if !self.throws_tags.contains(&tag) {
            self.throws_tags.push(tag);
        }
        self
    }

    /// Finish the method, deriving its simple name, owner, constructor flag and signature.
    pub fn build(self) -> DeclaredMethod {
        let split = self
            .name
            .rfind(NAME_SEPARATOR)
            .unwrap_or_default();
        let simple_name = self.name[split + 1..].to_string();
        let containing_class = self.name[..split].to_string();
        let is_constructor = simple_name == simple_part(&containing_class);
        let return_type = if is_constructor {
            String::new()
        } else {
            self.return_type
        };

        let params: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        let signature = format!("{}({})", self.name, params.join(","));

        DeclaredMethod {
            return_type,
            name: self.name,
            simple_name,
            containing_class,
            is_constructor,
            parameters: self.parameters,
            throws_tags: self.throws_tags,
            signature,
        }
    }
}

fn validate_qualified_name(name: &str) -> Result<()> {
    if name.starts_with(NAME_SEPARATOR)
        || name.ends_with(NAME_SEPARATOR)
        || !name.contains(NAME_SEPARATOR)
    {
        return Err(DocOracleError::validation_field(
            format!(
                "'{name}' is not a qualified method name of the form <package>.<class>.<method> \
                 (package optional)"
            ),
            "name",
        ));
    }
    Ok(())
}

fn simple_part(qualified: &str) -> &str {
    qualified
        .rsplit(NAME_SEPARATOR)
        .next()
        .unwrap_or(qualified)
}

/// Serialized form of a [`DeclaredMethod`]; derived fields are recomputed on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Return type (ignored for constructors)
    #[serde(default)]
    pub return_type: String,
    /// Fully qualified name
    pub name: String,
    /// Formal parameters
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Throws tags
    #[serde(default)]
    pub throws_tags: Vec<ThrowsTag>,
}

impl TryFrom<MethodDescriptor> for DeclaredMethod {
    type Error = DocOracleError;

    fn try_from(descriptor: MethodDescriptor) -> Result<Self> {
        let builder = DeclaredMethod::builder(
            descriptor.return_type,
            descriptor.name,
            descriptor.parameters,
        )?;
        Ok(descriptor
            .throws_tags
            .into_iter()
            .fold(builder, DeclaredMethodBuilder::tag)
            .build())
    }
}

impl From<DeclaredMethod> for MethodDescriptor {
    fn from(method: DeclaredMethod) -> Self {
        Self {
            return_type: method.return_type,
            name: method.name,
            parameters: method.parameters,
            throws_tags: method.throws_tags,
        }
    }
}

/// Subject of a proposition: the phrase to resolve to a code element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject phrase as written in the comment
    pub text: String,
    /// Whether the sentence is in passive voice
    #[serde(default)]
    pub passive: bool,
}

/// Grammatical unit extracted from a comment sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    /// Subject of the sentence
    pub subject: Subject,
    /// Predicate text
    pub predicate: String,
}

impl Proposition {
    /// Create a proposition.
    pub fn new(subject: impl Into<String>, passive: bool, predicate: impl Into<String>) -> Self {
        Self {
            subject: Subject {
                text: subject.into(),
                passive,
            },
            predicate: predicate.into(),
        }
    }

    /// Whether the subject is passive-voice.
    pub fn is_passive(&self) -> bool {
        self.subject.passive
    }
}

/// Code fragment submitted to a trial compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    /// Code text
    pub text: String,
    /// Set when the compiler reported incomparable types for this snippet
    #[serde(default)]
    pub complex_signature_with_incompatible_types: bool,
}

impl CodeSnippet {
    /// Wrap code text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            complex_signature_with_incompatible_types: false,
        }
    }
}
