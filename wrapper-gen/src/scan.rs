//! Method-set scanner
//!
//! Finds the chainable methods of a type by reading its source: public,
//! by-value `self` methods that return the type itself and take at least one
//! argument. Everything else is skipped without error.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use quote::ToTokens;
use syn::{
    FnArg, GenericArgument, ImplItem, ImplItemFn, Item, PathArguments, ReturnType, Type,
    TypeParamBound, Visibility,
};

use crate::error::GenError;

/// One non-receiver parameter of a chainable method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// The parameter type as Rust source. For a variadic parameter this is
    /// the item type of the iterator.
    pub ty: String,
    /// Trailing `impl IntoIterator<Item = _>` parameter.
    pub variadic: bool,
}

/// A chainable method to re-emit on the wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
}

impl Param {
    /// The type as it appears in a parameter list.
    pub fn declared_type(&self) -> String {
        if self.variadic {
            format!("impl IntoIterator<Item = {}>", self.ty)
        } else {
            self.ty.clone()
        }
    }
}

impl Method {
    /// A one-line signature, e.g. `limit(x0 i64, x1 i64) -> DbSession`.
    pub fn signature<'a>(&'a self, returns: &'a str) -> impl fmt::Display + 'a {
        struct Signature<'a> {
            method: &'a Method,
            returns: &'a str,
        }

        impl fmt::Display for Signature<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(", self.method.name)?;
                for (i, param) in self.method.params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    let dots = if param.variadic { "..." } else { "" };
                    write!(f, "x{} {}{}", i, dots, param.ty)?;
                }
                write!(f, ") -> {}", self.returns)
            }
        }

        Signature {
            method: self,
            returns,
        }
    }
}

/// Read and parse a Rust source file.
pub fn parse_file(path: &Path) -> Result<syn::File, GenError> {
    let source = std::fs::read_to_string(path).map_err(|source| GenError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    syn::parse_file(&source).map_err(|source| GenError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Chainable methods of `type_name`, in declaration order across all of its
/// inherent `impl` blocks.
pub fn chainable_methods(file: &syn::File, type_name: &str) -> Vec<Method> {
    inherent_fns(file, type_name)
        .filter_map(|method| select(method, type_name))
        .collect()
}

/// Names of every function defined in inherent `impl` blocks of `type_name`.
pub fn defined_names(file: &syn::File, type_name: &str) -> BTreeSet<String> {
    inherent_fns(file, type_name)
        .map(|method| method.sig.ident.to_string())
        .collect()
}

fn inherent_fns<'a>(
    file: &'a syn::File,
    type_name: &'a str,
) -> impl Iterator<Item = &'a ImplItemFn> + 'a {
    file.items
        .iter()
        .filter_map(move |item| match item {
            Item::Impl(item_impl)
                if item_impl.trait_.is_none() && is_named(&item_impl.self_ty, type_name) =>
            {
                Some(item_impl)
            }
            _ => None,
        })
        .flat_map(|item_impl| item_impl.items.iter())
        .filter_map(|item| match item {
            ImplItem::Fn(method) => Some(method),
            _ => None,
        })
}

fn select(method: &ImplItemFn, type_name: &str) -> Option<Method> {
    let sig = &method.sig;
    let name = sig.ident.to_string();

    let skip = |reason: &str| {
        tracing::debug!(method = %name, reason, "Skipping method");
        None
    };

    if !matches!(method.vis, Visibility::Public(_)) {
        return skip("not public");
    }
    if sig.asyncness.is_some() || sig.constness.is_some() || sig.unsafety.is_some() {
        return skip("async, const or unsafe");
    }
    if !sig.generics.params.is_empty() {
        return skip("explicit generic parameters");
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_none() => {}
        _ => return skip("no by-value self receiver"),
    }

    let returns_self = match &sig.output {
        ReturnType::Type(_, ty) => is_named(ty, "Self") || is_named(ty, type_name),
        ReturnType::Default => false,
    };
    if !returns_self {
        return skip("does not return its own type");
    }

    let types: Vec<&Type> = inputs
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(pat_type.ty.as_ref()),
            FnArg::Receiver(_) => None,
        })
        .collect();
    if types.is_empty() {
        return skip("no parameters");
    }

    let last = types.len() - 1;
    let params = types
        .iter()
        .enumerate()
        .map(|(i, ty)| match iterator_item(ty) {
            Some(item) if i == last => Param {
                ty: spell_type(item),
                variadic: true,
            },
            _ => Param {
                ty: spell_type(ty),
                variadic: false,
            },
        })
        .collect();

    tracing::debug!(method = %name, "Selected method");
    Some(Method { name, params })
}

/// `Self`, `Name`, or `path::to::Name` without generic arguments.
fn is_named(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .is_some_and(|seg| seg.ident == name && seg.arguments.is_empty()),
        Type::Paren(paren) => is_named(&paren.elem, name),
        _ => false,
    }
}

/// The `Item` type of an `impl IntoIterator<Item = T>` parameter.
fn iterator_item(ty: &Type) -> Option<&Type> {
    let Type::ImplTrait(impl_trait) = ty else {
        return None;
    };
    if impl_trait.bounds.len() != 1 {
        return None;
    }
    let TypeParamBound::Trait(bound) = impl_trait.bounds.first()? else {
        return None;
    };
    let segment = bound.path.segments.last()?;
    if segment.ident != "IntoIterator" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::AssocType(assoc) if assoc.ident == "Item" => Some(&assoc.ty),
        _ => None,
    })
}

/// Spell a type the way it would be written by hand (`&str`, not `& str`).
pub fn spell_type(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => spell_path(&type_path.path),
        Type::Reference(reference) => {
            let mut out = String::from("&");
            if let Some(lifetime) = &reference.lifetime {
                out.push_str(&format!("{} ", lifetime));
            }
            if reference.mutability.is_some() {
                out.push_str("mut ");
            }
            out.push_str(&spell_type(&reference.elem));
            out
        }
        Type::Slice(slice) => format!("[{}]", spell_type(&slice.elem)),
        Type::Array(array) => format!(
            "[{}; {}]",
            spell_type(&array.elem),
            array.len.to_token_stream()
        ),
        Type::Tuple(tuple) => {
            let elems: Vec<String> = tuple.elems.iter().map(spell_type).collect();
            if elems.len() == 1 {
                format!("({},)", elems[0])
            } else {
                format!("({})", elems.join(", "))
            }
        }
        Type::ImplTrait(impl_trait) => format!("impl {}", spell_bounds(&impl_trait.bounds)),
        Type::TraitObject(object) => format!("dyn {}", spell_bounds(&object.bounds)),
        Type::Paren(paren) => format!("({})", spell_type(&paren.elem)),
        Type::Never(_) => "!".to_string(),
        Type::Infer(_) => "_".to_string(),
        other => other.to_token_stream().to_string(),
    }
}

fn spell_path(path: &syn::Path) -> String {
    let mut out = String::new();
    if path.leading_colon.is_some() {
        out.push_str("::");
    }
    for (i, segment) in path.segments.iter().enumerate() {
        if i > 0 {
            out.push_str("::");
        }
        out.push_str(&segment.ident.to_string());
        match &segment.arguments {
            PathArguments::None => {}
            PathArguments::AngleBracketed(args) => {
                let args: Vec<String> = args.args.iter().map(spell_generic_arg).collect();
                out.push_str(&format!("<{}>", args.join(", ")));
            }
            PathArguments::Parenthesized(args) => {
                let inputs: Vec<String> = args.inputs.iter().map(spell_type).collect();
                out.push_str(&format!("({})", inputs.join(", ")));
                if let ReturnType::Type(_, ret) = &args.output {
                    out.push_str(&format!(" -> {}", spell_type(ret)));
                }
            }
        }
    }
    out
}

fn spell_generic_arg(arg: &GenericArgument) -> String {
    match arg {
        GenericArgument::Lifetime(lifetime) => lifetime.to_string(),
        GenericArgument::Type(ty) => spell_type(ty),
        GenericArgument::AssocType(assoc) => format!("{} = {}", assoc.ident, spell_type(&assoc.ty)),
        GenericArgument::Constraint(constraint) => {
            format!("{}: {}", constraint.ident, spell_bounds(&constraint.bounds))
        }
        other => other.to_token_stream().to_string(),
    }
}

fn spell_bounds<'a>(bounds: impl IntoIterator<Item = &'a TypeParamBound>) -> String {
    let bounds: Vec<String> = bounds
        .into_iter()
        .map(|bound| match bound {
            TypeParamBound::Trait(trait_bound) => {
                let maybe = if matches!(trait_bound.modifier, syn::TraitBoundModifier::Maybe(_)) {
                    "?"
                } else {
                    ""
                };
                format!("{}{}", maybe, spell_path(&trait_bound.path))
            }
            TypeParamBound::Lifetime(lifetime) => lifetime.to_string(),
            other => other.to_token_stream().to_string(),
        })
        .collect();
    bounds.join(" + ")
}
