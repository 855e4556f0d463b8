//! Lowering from the SWC AST into [`SyntaxTree`]
//!
//! Global invariants enforced:
//! - Every expression, statement, pattern and class/object member becomes a
//!   node, so a node's parent is its true syntactic parent
//! - Wrapper types with no source-level meaning (`ExprOrSpread`, `Callee`,
//!   `Decl`, `ClassMember`) are transparent
//! - Children end up in source order
//! - Offsets index `source` as given, including a leading byte order mark

use crate::ast::{AccessPath, ComputedKey, NodeId, NodeKind, PropertyName, SyntaxTree, TextRange};
use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// Build a [`SyntaxTree`] for `program`
///
/// `base` is the position of the first byte of `source` in the source map the
/// program was parsed with. The source map drops a leading byte order mark, so
/// its length is added back to every offset.
pub fn lower_program(program: &Program, source: &str, base: BytePos) -> SyntaxTree {
    let tree = SyntaxTree::new(source.len());
    let root = tree.root();
    let lead = if source.starts_with(BYTE_ORDER_MARK) {
        BYTE_ORDER_MARK.len_utf8()
    } else {
        0
    };
    let mut builder = TreeBuilder {
        tree,
        stack: vec![root],
        source,
        base,
        lead,
        export_start: None,
    };

    program.visit_with(&mut builder);

    let mut tree = builder.tree;
    tree.sort_children();
    tree
}

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Remaining stack below which lowering continues on a fresh segment
const RED_ZONE: usize = 64 * 1024;

/// Size of each fresh stack segment
const STACK_SEGMENT: usize = 1024 * 1024;

struct TreeBuilder<'a> {
    tree: SyntaxTree,
    stack: Vec<NodeId>,
    source: &'a str,
    base: BytePos,
    /// Bytes of `source` the source map does not hold (a byte order mark)
    lead: usize,
    /// Start of the `export` keyword for the declaration about to be visited
    export_start: Option<BytePos>,
}

impl TreeBuilder<'_> {
    fn offset(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.base.0) as usize + self.lead).min(self.source.len())
    }

    fn range(&self, span: Span) -> TextRange {
        TextRange::new(self.offset(span.lo), self.offset(span.hi))
    }

    /// Range of a declaration, widened to a preceding `export` or `export default`
    fn declaration_range(&mut self, span: Span) -> TextRange {
        match self.export_start.take() {
            Some(lo) if lo < span.lo => self.range(Span::new(lo, span.hi)),
            _ => self.range(span),
        }
    }

    fn snippet(&self, span: Span) -> String {
        self.source
            .get(self.range(span).as_range())
            .unwrap_or_default()
            .to_string()
    }

    /// Record a node under the current parent and visit its children beneath it
    fn with_node(
        &mut self,
        kind: NodeKind,
        name: Option<PropertyName>,
        range: TextRange,
        visit_children: impl FnOnce(&mut Self),
    ) {
        let parent = self.stack.last().copied().unwrap_or_else(|| self.tree.root());
        let id = self.tree.push(parent, kind, name, range);
        self.stack.push(id);
        visit_children(self);
        self.stack.pop();
    }

    fn property_name(&self, key: &PropName) -> PropertyName {
        match key {
            PropName::Ident(ident) => PropertyName::Identifier(ident.sym.to_string()),
            PropName::Str(str_lit) => PropertyName::StringLiteral(str_text(str_lit)),
            PropName::Num(num) => PropertyName::NumericLiteral(number_text(num.value)),
            PropName::BigInt(big) => PropertyName::NumericLiteral(self.snippet(big.span)),
            PropName::Computed(computed) => PropertyName::Computed(match &*computed.expr {
                Expr::Ident(ident) => ComputedKey::Identifier(ident.sym.to_string()),
                Expr::Lit(Lit::Str(str_lit)) => ComputedKey::StringLiteral(str_text(str_lit)),
                Expr::Lit(Lit::Num(num)) => ComputedKey::NumericLiteral(number_text(num.value)),
                _ => ComputedKey::Other,
            }),
        }
    }

    fn access_path(&self, expr: &Expr) -> AccessPath {
        match expr {
            Expr::Member(member) => self.member_path(member),
            Expr::OptChain(chain) => match &*chain.base {
                OptChainBase::Member(member) => self.member_path(member),
                OptChainBase::Call(_) => AccessPath::Call {
                    text: self.snippet(chain.span),
                },
            },
            Expr::Call(call) => AccessPath::Call {
                text: self.snippet(call.span),
            },
            Expr::Ident(ident) => AccessPath::Identifier(ident.sym.to_string()),
            Expr::Lit(Lit::Str(str_lit)) => AccessPath::StringLiteral(str_text(str_lit)),
            Expr::Lit(Lit::Num(num)) => AccessPath::NumericLiteral(number_text(num.value)),
            _ => AccessPath::Other,
        }
    }

    fn member_path(&self, member: &MemberExpr) -> AccessPath {
        let object = Box::new(self.access_path(&member.obj));
        match &member.prop {
            MemberProp::Ident(ident) => AccessPath::Property {
                object,
                property: ident.sym.to_string(),
            },
            MemberProp::PrivateName(private) => AccessPath::Property {
                object,
                property: format!("#{}", private.name),
            },
            MemberProp::Computed(computed) => AccessPath::Element {
                object,
                index: self.snippet(computed.expr.span()),
            },
        }
    }

    fn assign_target_path(&self, target: &AssignTarget) -> AccessPath {
        match target {
            AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) => {
                AccessPath::Identifier(binding.id.sym.to_string())
            }
            AssignTarget::Simple(SimpleAssignTarget::Member(member)) => self.member_path(member),
            _ => AccessPath::Other,
        }
    }

    fn classify_expr(&self, expr: &Expr) -> NodeKind {
        match expr {
            Expr::Paren(_) => NodeKind::Parenthesized,
            Expr::Assign(assign) if assign.op == AssignOp::Assign => NodeKind::Assignment {
                target: self.assign_target_path(&assign.left),
            },
            Expr::Call(call) => {
                let (callee, callee_span) = match &call.callee {
                    Callee::Expr(callee) => (self.access_path(callee), callee.span()),
                    Callee::Super(sup) => (AccessPath::Other, sup.span),
                    Callee::Import(import) => (AccessPath::Other, import.span),
                };
                NodeKind::Call {
                    callee,
                    callee_range: self.range(callee_span),
                }
            }
            Expr::OptChain(chain) => match &*chain.base {
                OptChainBase::Call(call) => NodeKind::Call {
                    callee: self.access_path(&call.callee),
                    callee_range: self.range(call.callee.span()),
                },
                OptChainBase::Member(_) => NodeKind::Other,
            },
            Expr::New(new) => NodeKind::New {
                callee: self.access_path(&new.callee),
                callee_range: self.range(new.callee.span()),
            },
            _ => NodeKind::Other,
        }
    }
}

impl Visit for TreeBuilder<'_> {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || match stmt {
            // Declarations record their own nodes
            Stmt::Decl(_) => stmt.visit_children_with(self),
            _ => self.with_node(NodeKind::Other, None, self.range(stmt.span()), |b| {
                stmt.visit_children_with(b)
            }),
        })
    }

    fn visit_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::ExportDecl(export) => {
                if matches!(export.decl, Decl::Fn(_) | Decl::Class(_)) {
                    self.export_start = Some(export.span.lo);
                }
                decl.visit_children_with(self);
                self.export_start = None;
            }
            ModuleDecl::ExportDefaultDecl(export) => {
                self.with_node(NodeKind::Other, None, self.range(export.span), |b| {
                    if matches!(export.decl, DefaultDecl::Fn(_) | DefaultDecl::Class(_)) {
                        b.export_start = Some(export.span.lo);
                    }
                    export.visit_children_with(b);
                    b.export_start = None;
                })
            }
            _ => self.with_node(NodeKind::Other, None, self.range(decl.span()), |b| {
                decl.visit_children_with(b)
            }),
        }
    }

    fn visit_var_declarator(&mut self, declarator: &VarDeclarator) {
        let name = match &declarator.name {
            Pat::Ident(binding) => Some(PropertyName::Identifier(binding.id.sym.to_string())),
            _ => None,
        };
        self.with_node(
            NodeKind::VariableDeclaration,
            name,
            self.range(declarator.span),
            |b| declarator.visit_children_with(b),
        );
    }

    fn visit_pat(&mut self, pat: &Pat) {
        self.with_node(NodeKind::Other, None, self.range(pat.span()), |b| {
            pat.visit_children_with(b)
        });
    }

    fn visit_expr(&mut self, expr: &Expr) {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || match expr {
            // Function and class expressions record their own nodes
            Expr::Fn(_) | Expr::Arrow(_) | Expr::Class(_) => expr.visit_children_with(self),
            _ => {
                let kind = self.classify_expr(expr);
                self.with_node(kind, None, self.range(expr.span()), |b| {
                    expr.visit_children_with(b)
                });
            }
        })
    }

    fn visit_fn_decl(&mut self, decl: &FnDecl) {
        let range = self.declaration_range(decl.function.span);
        self.with_node(
            NodeKind::FunctionDeclaration {
                has_body: decl.function.body.is_some(),
            },
            Some(PropertyName::Identifier(decl.ident.sym.to_string())),
            range,
            |b| decl.visit_children_with(b),
        );
    }

    fn visit_fn_expr(&mut self, expr: &FnExpr) {
        let name = expr
            .ident
            .as_ref()
            .map(|ident| PropertyName::Identifier(ident.sym.to_string()));
        let range = self.declaration_range(expr.function.span);
        self.with_node(NodeKind::FunctionExpression, name, range, |b| {
            expr.visit_children_with(b)
        });
    }

    fn visit_arrow_expr(&mut self, arrow: &ArrowExpr) {
        self.with_node(NodeKind::ArrowFunction, None, self.range(arrow.span), |b| {
            arrow.visit_children_with(b)
        });
    }

    fn visit_class_decl(&mut self, decl: &ClassDecl) {
        let range = self.declaration_range(decl.class.span);
        self.with_node(
            NodeKind::Class,
            Some(PropertyName::Identifier(decl.ident.sym.to_string())),
            range,
            |b| decl.visit_children_with(b),
        );
    }

    fn visit_class_expr(&mut self, expr: &ClassExpr) {
        let name = expr
            .ident
            .as_ref()
            .map(|ident| PropertyName::Identifier(ident.sym.to_string()));
        let range = self.declaration_range(expr.class.span);
        self.with_node(NodeKind::Class, name, range, |b| expr.visit_children_with(b));
    }

    fn visit_class_member(&mut self, member: &ClassMember) {
        let (kind, name, span) = match member {
            ClassMember::Constructor(ctor) => (
                NodeKind::Constructor {
                    has_body: ctor.body.is_some(),
                },
                None,
                ctor.span,
            ),
            ClassMember::Method(method) => (
                method_kind(method.kind, method.function.body.is_some()),
                Some(self.property_name(&method.key)),
                method.span,
            ),
            ClassMember::PrivateMethod(method) => (
                method_kind(method.kind, method.function.body.is_some()),
                Some(PropertyName::PrivateIdentifier(format!("#{}", method.key.name))),
                method.span,
            ),
            ClassMember::ClassProp(prop) => (
                NodeKind::PropertyDeclaration,
                Some(self.property_name(&prop.key)),
                prop.span,
            ),
            ClassMember::PrivateProp(prop) => (
                NodeKind::PropertyDeclaration,
                Some(PropertyName::PrivateIdentifier(format!("#{}", prop.key.name))),
                prop.span,
            ),
            _ => (NodeKind::Other, None, member.span()),
        };

        self.with_node(kind, name, self.range(span), |b| member.visit_children_with(b));
    }

    fn visit_prop(&mut self, prop: &Prop) {
        let (kind, name, range) = match prop {
            Prop::KeyValue(kv) => (
                NodeKind::PropertyAssignment,
                Some(self.property_name(&kv.key)),
                self.range(prop.span()),
            ),
            Prop::Method(method) => {
                // The function span may not include the key
                let key = self.range(method.key.span());
                let function = self.range(method.function.span);
                (
                    NodeKind::Method {
                        has_body: method.function.body.is_some(),
                    },
                    Some(self.property_name(&method.key)),
                    TextRange::new(key.start.min(function.start), key.end.max(function.end)),
                )
            }
            Prop::Getter(getter) => (
                NodeKind::GetAccessor {
                    has_body: getter.body.is_some(),
                },
                Some(self.property_name(&getter.key)),
                self.range(getter.span),
            ),
            Prop::Setter(setter) => (
                NodeKind::SetAccessor {
                    has_body: setter.body.is_some(),
                },
                Some(self.property_name(&setter.key)),
                self.range(setter.span),
            ),
            Prop::Shorthand(_) | Prop::Assign(_) => (NodeKind::Other, None, self.range(prop.span())),
        };

        self.with_node(kind, name, range, |b| prop.visit_children_with(b));
    }

    fn visit_decorator(&mut self, decorator: &Decorator) {
        self.with_node(
            NodeKind::Decorator {
                expression: self.access_path(&decorator.expr),
            },
            None,
            self.range(decorator.span),
            |b| decorator.visit_children_with(b),
        );
    }
}

fn method_kind(kind: MethodKind, has_body: bool) -> NodeKind {
    match kind {
        MethodKind::Method => NodeKind::Method { has_body },
        MethodKind::Getter => NodeKind::GetAccessor { has_body },
        MethodKind::Setter => NodeKind::SetAccessor { has_body },
    }
}

fn str_text(str_lit: &Str) -> String {
    // Wtf8Atom to String via to_atom_lossy (borrows when possible)
    str_lit.value.to_atom_lossy().to_string()
}

/// Render a numeric literal by value the way JavaScript prints numbers
///
/// `0x10` reads `16`, `1e21` reads `1e+21` and `0.0000001` reads `1e-7`.
fn number_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    // Shortest round-trip digits, e.g. "1.25e3"
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let n = exponent + 1;
    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{}", rest)
        };
        let exponent_sign = if n - 1 < 0 { '-' } else { '+' };
        format!("{}{}e{}{}", first, fraction, exponent_sign, (n - 1).abs())
    };

    format!("{}{}", sign, body)
}
