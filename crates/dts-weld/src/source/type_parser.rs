//! Type parser for converting Rust types to `TypeRef`
//!
//! Parsing is strict: anything that has no declaration-file meaning is an
//! error carrying the offending tokens, never a silent `unknown`.

use crate::ir::{PrimitiveKind, TypeRef};
use quote::ToTokens;
use syn::{Error, GenericArgument, PathArguments, Type, TypePath};

/// Parse a Rust type into a `TypeRef`
///
/// # Supported Types
/// - Primitives: u8-u128, i8-i128, usize, isize, f32, f64, bool, char, String, str, Path, PathBuf
/// - Sequences: Vec<T>, VecDeque<T>, HashSet<T>, BTreeSet<T>, [T; N], [T]
/// - Maps: HashMap<K, V>, BTreeMap<K, V>
/// - Option<T>, and Result<T, E> (as T)
/// - Wrappers: Box<T>, Rc<T>, Arc<T>, Cow<T>, RefCell<T>, Cell<T>, &T, &mut T
/// - Tuples: (A, B, C)
/// - Custom types: `Named` by last path segment
pub fn parse_type(ty: &Type) -> syn::Result<TypeRef> {
    match ty {
        Type::Path(type_path) => parse_path_type(type_path),
        Type::Reference(type_ref) => parse_type(&type_ref.elem),
        Type::Tuple(type_tuple) => {
            let elements = type_tuple
                .elems
                .iter()
                .map(parse_type)
                .collect::<syn::Result<Vec<_>>>()?;
            Ok(TypeRef::tuple(elements))
        }
        Type::Slice(type_slice) => Ok(TypeRef::vector(parse_type(&type_slice.elem)?)),
        Type::Array(type_array) => Ok(TypeRef::vector(parse_type(&type_array.elem)?)),
        Type::Paren(type_paren) => parse_type(&type_paren.elem),
        Type::Group(type_group) => parse_type(&type_group.elem),
        Type::BareFn(bare_fn) => Err(Error::new_spanned(
            bare_fn,
            "bare function types cannot be declared",
        )),
        Type::ImplTrait(impl_trait) => Err(Error::new_spanned(
            impl_trait,
            "`impl Trait` types are not supported, use a concrete type",
        )),
        Type::TraitObject(trait_obj) => Err(Error::new_spanned(
            trait_obj,
            "trait object types (`dyn Trait`) are not supported, use a concrete type",
        )),
        Type::Macro(type_macro) => Err(Error::new_spanned(
            type_macro,
            "macros in type position are not supported",
        )),
        _ => Err(Error::new_spanned(
            ty,
            format!("unsupported type `{}`", ty.to_token_stream()),
        )),
    }
}

const GENERIC_WRAPPERS: &[&str] = &[
    "Option", "Vec", "VecDeque", "HashSet", "BTreeSet", "HashMap", "BTreeMap", "Result", "Box",
    "Rc", "Arc", "Cow", "RefCell", "Cell",
];

/// Parse a Type::Path into a `TypeRef`
fn parse_path_type(type_path: &TypePath) -> syn::Result<TypeRef> {
    if type_path.qself.is_some() {
        return Err(Error::new_spanned(
            type_path,
            "qualified paths (`<T as Trait>::X`) are not supported",
        ));
    }

    let last_seg = type_path
        .path
        .segments
        .last()
        .ok_or_else(|| Error::new_spanned(type_path, "empty type path"))?;
    let ident = last_seg.ident.to_string();

    let args: Vec<&Type> = match &last_seg.arguments {
        PathArguments::None => Vec::new(),
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(inner) => Some(inner),
                _ => None,
            })
            .collect(),
        PathArguments::Parenthesized(_) => {
            return Err(Error::new_spanned(
                type_path,
                "function trait types cannot be declared",
            ))
        }
    };

    if args.is_empty() {
        if let Some(kind) = PrimitiveKind::from_rust_name(&ident) {
            return Ok(TypeRef::primitive(kind));
        }
        // Lifetime-only arguments on a user type are fine
        if !GENERIC_WRAPPERS.contains(&ident.as_str()) {
            return Ok(TypeRef::named(ident));
        }
    }

    let type_args = |n: usize| -> syn::Result<Vec<TypeRef>> {
        if args.len() < n {
            return Err(Error::new_spanned(
                type_path,
                format!("`{}` expects {} type argument(s)", ident, n),
            ));
        }
        args.iter().take(n).map(|ty| parse_type(ty)).collect()
    };

    match ident.as_str() {
        "Option" => Ok(TypeRef::option(one(type_args(1)?))),
        "Vec" | "VecDeque" | "HashSet" | "BTreeSet" => Ok(TypeRef::vector(one(type_args(1)?))),
        "HashMap" | "BTreeMap" => {
            let mut kv = type_args(2)?.into_iter();
            match (kv.next(), kv.next()) {
                (Some(key), Some(value)) => Ok(TypeRef::map(key, value)),
                _ => Err(Error::new_spanned(type_path, "map expects key and value types")),
            }
        }
        // Errors surface as exceptions on the target side
        "Result" => Ok(one(type_args(1)?)),
        "Box" | "Rc" | "Arc" | "Cow" | "RefCell" | "Cell" => Ok(one(type_args(1)?)),
        _ => Err(Error::new_spanned(
            type_path,
            format!(
                "generic arguments on `{}` are not supported",
                type_path.to_token_stream()
            ),
        )),
    }
}

fn one(mut types: Vec<TypeRef>) -> TypeRef {
    types.swap_remove(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use syn::parse_quote;

    fn parse(ty: Type) -> TypeRef {
        parse_type(&ty).unwrap()
    }

    #[test]
    fn test_primitive_types() {
        assert_eq!(parse(parse_quote!(String)), TypeRef::string());
        assert_eq!(parse(parse_quote!(&str)), TypeRef::string());
        assert_eq!(parse(parse_quote!(std::path::PathBuf)), TypeRef::string());
        assert_eq!(parse(parse_quote!(u64)), TypeRef::primitive(PrimitiveKind::U64));
        assert_eq!(parse(parse_quote!(bool)), TypeRef::bool());
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            parse(parse_quote!(Vec<Option<Point>>)),
            TypeRef::vector(TypeRef::option(TypeRef::named("Point")))
        );
        assert_eq!(
            parse(parse_quote!(&[u8])),
            TypeRef::vector(TypeRef::primitive(PrimitiveKind::U8))
        );
        assert_eq!(
            parse(parse_quote!([f64; 3])),
            TypeRef::vector(TypeRef::f64())
        );
        assert_eq!(
            parse(parse_quote!(std::collections::BTreeMap<String, Vec<u32>>)),
            TypeRef::map(
                TypeRef::string(),
                TypeRef::vector(TypeRef::primitive(PrimitiveKind::U32))
            )
        );
    }

    #[test]
    fn test_wrappers_unwrap() {
        assert_eq!(parse(parse_quote!(Arc<RefCell<Point>>)), TypeRef::named("Point"));
        assert_eq!(parse(parse_quote!(Cow<'a, str>)), TypeRef::string());
        assert_eq!(parse(parse_quote!(&mut Box<Point>)), TypeRef::named("Point"));
        assert_eq!(
            parse(parse_quote!(Result<Point, JsError>)),
            TypeRef::named("Point")
        );
    }

    #[test]
    fn test_tuples_and_paths() {
        assert_eq!(
            parse(parse_quote!((String, i32))),
            TypeRef::tuple(vec![
                TypeRef::string(),
                TypeRef::primitive(PrimitiveKind::I32)
            ])
        );
        assert_eq!(parse(parse_quote!(crate::geo::Point)), TypeRef::named("Point"));
    }

    #[test]
    fn test_unsupported_types() {
        let cases: Vec<Type> = vec![
            parse_quote!(impl Iterator<Item = u8>),
            parse_quote!(Box<dyn Fn(u8)>),
            parse_quote!(fn(u8) -> u8),
            parse_quote!(Wrapper<u8>),
            parse_quote!(Option),
            parse_quote!(<T as Trait>::Output),
            parse_quote!(my_type!()),
        ];
        for ty in cases {
            assert!(parse_type(&ty).is_err(), "expected an error for {}", ty.to_token_stream());
        }
    }
}
