//! Name inference for function-like nodes
//!
//! Names are computed from local syntax only, as an ordered list of rules
//! where the first rule that produces a name wins:
//!
//! 1. explicit name: the node's own name or key
//! 2. constructor: `constructorCall:, ClassName`
//! 3. contextual: the variable, property, assignment target or call the
//!    expression is attached to
//! 4. fallback: `anonymousFunction`
//!
//! Global invariants enforced:
//! - Inference never fails; every node gets a non-empty name
//! - Only the node and its immediate parent (through one level of
//!   parentheses) are consulted

use crate::ast::{AccessPath, ComputedKey, NodeId, NodeKind, PropertyName, SyntaxTree};
use serde::{Deserialize, Serialize};

pub const ANONYMOUS_FUNCTION: &str = "anonymousFunction";
pub const ANONYMOUS_CLASS: &str = "anonymousClass";
pub const COMPUTED_PROPERTY: &str = "computedProperty";
pub const GLOBAL_CODE_PREFIX: &str = "globalCode: ";
pub const CALLBACK_PREFIX: &str = "anonymousCallbackTo: ";
pub const CONSTRUCTOR_PREFIX: &str = "constructorCall:, ";
pub const HEAP_SNAPSHOT_CONSTRUCTOR_PREFIX: &str = "classConstructorCall: ";

/// Which constructor label format to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingMode {
    /// `constructorCall:, ClassName`
    #[default]
    Default,
    /// `classConstructorCall: ClassName`, as heap-snapshot viewers expect
    HeapSnapshot,
}

impl NamingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingMode::Default => "default",
            NamingMode::HeapSnapshot => "heap-snapshot",
        }
    }
}

/// Read-only view the naming rules work against
pub struct NamingContext<'a> {
    pub tree: &'a SyntaxTree,
    pub mode: NamingMode,
}

type NamingRule = fn(&NamingContext<'_>, NodeId) -> Option<String>;

/// Rules in evaluation order; [`ANONYMOUS_FUNCTION`] applies when none match
pub const NAMING_RULES: &[(&str, NamingRule)] = &[
    ("explicit", explicit_name),
    ("constructor", constructor_name),
    ("contextual", contextual_name),
];

impl<'a> NamingContext<'a> {
    pub fn new(tree: &'a SyntaxTree, mode: NamingMode) -> Self {
        NamingContext { tree, mode }
    }

    /// Display name for a function-like node
    pub fn infer_name(&self, id: NodeId) -> String {
        NAMING_RULES
            .iter()
            .find_map(|(_, rule)| rule(self, id))
            .unwrap_or_else(|| ANONYMOUS_FUNCTION.to_string())
    }
}

/// Rule 1: the node carries its own name sub-node
pub fn explicit_name(ctx: &NamingContext<'_>, id: NodeId) -> Option<String> {
    let name = ctx.tree.node(id).name.as_ref()?;
    Some(resolve_property_name(ctx.tree, name, id))
}

/// Rule 2: constructor directly inside a class body
pub fn constructor_name(ctx: &NamingContext<'_>, id: NodeId) -> Option<String> {
    if !matches!(ctx.tree.kind(id), NodeKind::Constructor { .. }) {
        return None;
    }
    let class = ctx.tree.parent(id)?;
    if *ctx.tree.kind(class) != NodeKind::Class {
        return None;
    }

    let prefix = match ctx.mode {
        NamingMode::Default => CONSTRUCTOR_PREFIX,
        NamingMode::HeapSnapshot => HEAP_SNAPSHOT_CONSTRUCTOR_PREFIX,
    };
    Some(format!("{}{}", prefix, class_name(ctx.tree, class)))
}

/// Rule 3: unnamed function or arrow expression named after what holds it
pub fn contextual_name(ctx: &NamingContext<'_>, id: NodeId) -> Option<String> {
    let tree = ctx.tree;
    if !matches!(
        tree.kind(id),
        NodeKind::FunctionExpression | NodeKind::ArrowFunction
    ) {
        return None;
    }

    let mut child = id;
    let mut parent = tree.parent(id)?;
    if *tree.kind(parent) == NodeKind::Parenthesized {
        child = parent;
        parent = tree.parent(parent)?;
    }

    match tree.kind(parent) {
        NodeKind::VariableDeclaration
        | NodeKind::PropertyAssignment
        | NodeKind::PropertyDeclaration => match &tree.node(parent).name {
            Some(name @ PropertyName::Identifier(_)) => Some(resolve_property_name(tree, name, id)),
            _ => None,
        },
        NodeKind::Assignment { target } => match target {
            AccessPath::Property { .. } | AccessPath::Element { .. } => {
                Some(render_access_path(target))
            }
            AccessPath::Identifier(text)
            | AccessPath::StringLiteral(text)
            | AccessPath::NumericLiteral(text) => Some(text.clone()),
            AccessPath::Call { .. } | AccessPath::Other => None,
        },
        NodeKind::Call {
            callee,
            callee_range,
        } => {
            // The invoked expression itself is not a callback
            if tree.node(child).range == *callee_range {
                return None;
            }
            Some(format!("{}{}", CALLBACK_PREFIX, render_access_path(callee)))
        }
        NodeKind::New {
            callee,
            callee_range,
        } => {
            if tree.node(child).range == *callee_range {
                return None;
            }
            Some(format!("{}new {}", CALLBACK_PREFIX, render_access_path(callee)))
        }
        NodeKind::Decorator { expression } => Some(format!(
            "{}{}",
            CALLBACK_PREFIX,
            render_access_path(expression)
        )),
        _ => None,
    }
}

/// Turn a name or key sub-node into display text
///
/// Accessors get a `get `/`set ` prefix and members declared directly in a
/// class body are qualified with the class name.
pub fn resolve_property_name(tree: &SyntaxTree, name: &PropertyName, declaring: NodeId) -> String {
    let mut text = match name {
        PropertyName::Identifier(text)
        | PropertyName::PrivateIdentifier(text)
        | PropertyName::StringLiteral(text)
        | PropertyName::NumericLiteral(text) => text.clone(),
        PropertyName::Computed(ComputedKey::Identifier(text))
        | PropertyName::Computed(ComputedKey::StringLiteral(text))
        | PropertyName::Computed(ComputedKey::NumericLiteral(text)) => format!("[{}]", text),
        PropertyName::Computed(ComputedKey::Other) => COMPUTED_PROPERTY.to_string(),
    };

    match tree.kind(declaring) {
        NodeKind::GetAccessor { .. } => text = format!("get {}", text),
        NodeKind::SetAccessor { .. } => text = format!("set {}", text),
        _ => {}
    }

    if let Some(parent) = tree.parent(declaring) {
        if *tree.kind(parent) == NodeKind::Class {
            text = format!("{}.{}", class_name(tree, parent), text);
        }
    }

    text
}

/// Render a property/element access chain as dotted/bracketed text
pub fn render_access_path(path: &AccessPath) -> String {
    match path {
        AccessPath::Property { object, property } => {
            format!("{}.{}", render_access_path(object), property)
        }
        AccessPath::Element { object, index } => {
            format!("{}[{}]", render_access_path(object), index)
        }
        AccessPath::Call { text } => text.clone(),
        AccessPath::Identifier(text)
        | AccessPath::StringLiteral(text)
        | AccessPath::NumericLiteral(text) => text.clone(),
        AccessPath::Other => COMPUTED_PROPERTY.to_string(),
    }
}

fn class_name(tree: &SyntaxTree, class: NodeId) -> String {
    match &tree.node(class).name {
        Some(PropertyName::Identifier(name)) => name.clone(),
        _ => ANONYMOUS_CLASS.to_string(),
    }
}
