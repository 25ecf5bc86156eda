//! Uniform views over SWC declaration and member nodes
//!
//! [`ExportedDecl`] closes the set of declaration shapes that can appear
//! in the documentation surface and gives each one the same capabilities:
//! a name, a kind, and (for classes and interfaces) a member list with the
//! structural span of its `{ ... }` body. [`Member`] does the same for
//! interface, type-literal, and class members.

use crate::node::DeclKind;
use crate::utils::swc::{expr_key_name, module_name, prop_name_str, SourceInfo};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{BytePos, Span, Spanned};

/// An exported declaration, one variant per documented kind
#[derive(Debug, Clone, Copy)]
pub enum ExportedDecl<'a> {
    Class {
        ident: Option<&'a swc_ast::Ident>,
        class: &'a swc_ast::Class,
    },
    Interface(&'a swc_ast::TsInterfaceDecl),
    TypeAlias(&'a swc_ast::TsTypeAliasDecl),
    Namespace(&'a swc_ast::TsModuleDecl),
    Variable(&'a swc_ast::VarDecl),
    Function {
        ident: Option<&'a swc_ast::Ident>,
        function: &'a swc_ast::Function,
    },
}

impl<'a> ExportedDecl<'a> {
    /// Classify the declaration of an `export` statement
    ///
    /// Enums and `using` declarations are not part of the documented surface.
    pub fn from_decl(decl: &'a swc_ast::Decl) -> Option<Self> {
        match decl {
            swc_ast::Decl::Class(c) => Some(ExportedDecl::Class {
                ident: Some(&c.ident),
                class: &c.class,
            }),
            swc_ast::Decl::Fn(f) => Some(ExportedDecl::Function {
                ident: Some(&f.ident),
                function: &f.function,
            }),
            swc_ast::Decl::Var(v) => Some(ExportedDecl::Variable(v)),
            swc_ast::Decl::TsInterface(i) => Some(ExportedDecl::Interface(i)),
            swc_ast::Decl::TsTypeAlias(t) => Some(ExportedDecl::TypeAlias(t)),
            swc_ast::Decl::TsModule(m) => Some(ExportedDecl::Namespace(m)),
            swc_ast::Decl::TsEnum(_) | swc_ast::Decl::Using(_) => None,
        }
    }

    /// Classify the declaration of an `export default` statement
    pub fn from_default_decl(decl: &'a swc_ast::DefaultDecl) -> Self {
        match decl {
            swc_ast::DefaultDecl::Class(c) => ExportedDecl::Class {
                ident: c.ident.as_ref(),
                class: &c.class,
            },
            swc_ast::DefaultDecl::Fn(f) => ExportedDecl::Function {
                ident: f.ident.as_ref(),
                function: &f.function,
            },
            swc_ast::DefaultDecl::TsInterfaceDecl(i) => ExportedDecl::Interface(i),
        }
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            ExportedDecl::Class { .. } => DeclKind::Class,
            ExportedDecl::Interface(_) => DeclKind::Interface,
            ExportedDecl::TypeAlias(_) => DeclKind::TypeAlias,
            ExportedDecl::Namespace(_) => DeclKind::Namespace,
            ExportedDecl::Variable(_) => DeclKind::Variable,
            ExportedDecl::Function { .. } => DeclKind::Function,
        }
    }

    /// The declared name; a variable statement is named by its first binding
    pub fn name(&self) -> Option<String> {
        match self {
            ExportedDecl::Class { ident, .. } | ExportedDecl::Function { ident, .. } => {
                ident.map(|i| i.sym.to_string())
            }
            ExportedDecl::Interface(i) => Some(i.id.sym.to_string()),
            ExportedDecl::TypeAlias(t) => Some(t.id.sym.to_string()),
            ExportedDecl::Namespace(m) => Some(module_name(&m.id)),
            ExportedDecl::Variable(v) => v.decls.first().and_then(|d| match &d.name {
                swc_ast::Pat::Ident(i) => Some(i.sym.to_string()),
                _ => None,
            }),
        }
    }

    /// Members of a class or interface body, in source order
    pub fn members(&self) -> Vec<Member<'a>> {
        match *self {
            ExportedDecl::Interface(i) => i.body.body.iter().map(Member::Type).collect(),
            ExportedDecl::Class { class, .. } => class
                .body
                .iter()
                .filter(|m| {
                    !matches!(
                        m,
                        swc_ast::ClassMember::Empty(_) | swc_ast::ClassMember::StaticBlock(_)
                    )
                })
                .map(Member::Class)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Span of the `{ ... }` member body, braces included
    pub fn body_span(&self, info: &SourceInfo) -> Option<Span> {
        match *self {
            ExportedDecl::Interface(i) => Some(i.body.span),
            ExportedDecl::Class { ident, class } => class_body_span(info, ident, class),
            _ => None,
        }
    }
}

/// The class body starts at the first `{` after the class header
fn class_body_span(
    info: &SourceInfo,
    ident: Option<&swc_ast::Ident>,
    class: &swc_ast::Class,
) -> Option<Span> {
    let header_end = [
        ident.map(|i| i.span.hi),
        class.type_params.as_ref().map(|t| t.span.hi),
        class.super_class.as_ref().map(|s| s.span().hi),
        class.super_type_params.as_ref().map(|t| t.span.hi),
        class.implements.last().map(|i| i.span.hi),
    ]
    .into_iter()
    .flatten()
    .max()
    .unwrap_or(class.span.lo);

    let tail = info.text_between(header_end, class.span.hi);
    let offset = tail.find('{')?;
    Some(Span::new(header_end + BytePos(offset as u32), class.span.hi))
}

/// A member of an interface, type literal, or class body
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Type(&'a swc_ast::TsTypeElement),
    Class(&'a swc_ast::ClassMember),
}

impl<'a> Member<'a> {
    pub fn span(&self) -> Span {
        match self {
            Member::Type(t) => t.span(),
            Member::Class(c) => c.span(),
        }
    }

    /// Member name; signatures without one are named `unknown`
    pub fn name(&self, info: &SourceInfo) -> String {
        let key = match self {
            Member::Type(element) => match element {
                swc_ast::TsTypeElement::TsPropertySignature(p) => Some(&p.key),
                swc_ast::TsTypeElement::TsMethodSignature(m) => Some(&m.key),
                swc_ast::TsTypeElement::TsGetterSignature(g) => Some(&g.key),
                swc_ast::TsTypeElement::TsSetterSignature(s) => Some(&s.key),
                _ => None,
            }
            .map(|key| {
                expr_key_name(key).unwrap_or_else(|| info.text_for_span(key.span()).to_string())
            }),
            Member::Class(member) => match member {
                swc_ast::ClassMember::Constructor(_) => Some("constructor".to_string()),
                swc_ast::ClassMember::Method(m) => Some(class_key_name(info, &m.key)),
                swc_ast::ClassMember::ClassProp(p) => Some(class_key_name(info, &p.key)),
                swc_ast::ClassMember::PrivateMethod(m) => Some(format!("#{}", m.key.name)),
                swc_ast::ClassMember::PrivateProp(p) => Some(format!("#{}", p.key.name)),
                _ => None,
            },
        };
        key.unwrap_or_else(|| "unknown".to_string())
    }

    /// The type literal a property is declared with, if any
    pub fn type_literal(&self) -> Option<&'a swc_ast::TsTypeLit> {
        let annotation = match *self {
            Member::Type(swc_ast::TsTypeElement::TsPropertySignature(p)) => p.type_ann.as_ref(),
            Member::Class(swc_ast::ClassMember::ClassProp(p)) => p.type_ann.as_ref(),
            _ => None,
        }?;
        match &*annotation.type_ann {
            swc_ast::TsType::TsTypeLit(lit) => Some(lit),
            _ => None,
        }
    }
}

fn class_key_name(info: &SourceInfo, key: &swc_ast::PropName) -> String {
    prop_name_str(key).unwrap_or_else(|| info.text_for_span(key.span()).to_string())
}
