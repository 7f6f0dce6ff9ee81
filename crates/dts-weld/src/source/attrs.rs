//! `#[serde(...)]` and `///` attribute handling

use crate::ir::{to_camel_case, to_pascal_case, to_snake_case, EnumRepr};
use syn::{Attribute, Expr, ExprLit, Lit, LitStr, Meta, Token};

/// serde `rename_all` case conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    pub fn from_name(name: &str) -> Option<Self> {
        let rule = match name {
            "lowercase" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            "PascalCase" => RenameRule::Pascal,
            "camelCase" => RenameRule::Camel,
            "snake_case" => RenameRule::Snake,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebab,
            _ => return None,
        };
        Some(rule)
    }

    /// Apply to a snake_case field name
    pub fn apply_to_field(self, field: &str) -> String {
        match self {
            RenameRule::Lower | RenameRule::Snake => field.to_string(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => to_pascal_case(field),
            RenameRule::Camel => to_camel_case(field),
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }

    /// Apply to a PascalCase variant name
    pub fn apply_to_variant(self, variant: &str) -> String {
        match self {
            RenameRule::Pascal => variant.to_string(),
            RenameRule::Lower => variant.to_ascii_lowercase(),
            RenameRule::Upper => variant.to_ascii_uppercase(),
            RenameRule::Camel => {
                let mut chars = variant.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                }
            }
            RenameRule::Snake => to_snake_case(variant),
            RenameRule::ScreamingSnake => to_snake_case(variant).to_ascii_uppercase(),
            RenameRule::Kebab => to_snake_case(variant).replace('_', "-"),
            RenameRule::ScreamingKebab => to_snake_case(variant)
                .to_ascii_uppercase()
                .replace('_', "-"),
        }
    }
}

/// The subset of serde attributes that changes the declared shape
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SerdeAttrs {
    pub rename: Option<String>,
    pub rename_all: Option<RenameRule>,
    pub skip: bool,
    pub tag: Option<String>,
    pub content: Option<String>,
    pub untagged: bool,
    pub flatten: bool,
}

impl SerdeAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("serde") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Some(lit) = serialize_name(&meta)? {
                        out.rename = Some(lit.value());
                    }
                    return Ok(());
                }

                if meta.path.is_ident("rename_all") {
                    if let Some(lit) = serialize_name(&meta)? {
                        let rule = RenameRule::from_name(&lit.value()).ok_or_else(|| {
                            syn::Error::new(lit.span(), "unknown rename_all rule")
                        })?;
                        out.rename_all = Some(rule);
                    }
                    return Ok(());
                }

                if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    out.skip = true;
                    return Ok(());
                }

                if meta.path.is_ident("tag") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.tag = Some(lit.value());
                    return Ok(());
                }

                if meta.path.is_ident("content") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.content = Some(lit.value());
                    return Ok(());
                }

                if meta.path.is_ident("untagged") {
                    out.untagged = true;
                    return Ok(());
                }

                if meta.path.is_ident("flatten") {
                    out.flatten = true;
                    return Ok(());
                }

                skip_meta(&meta)
            })?;
        }

        Ok(out)
    }

    /// Enum tagging chosen by `tag`, `content` and `untagged`
    ///
    /// `None` when `content` is given without `tag`.
    pub fn enum_repr(&self) -> Option<EnumRepr> {
        if self.untagged {
            return Some(EnumRepr::Untagged);
        }
        match (&self.tag, &self.content) {
            (None, None) => Some(EnumRepr::External),
            (Some(tag), None) => Some(EnumRepr::Internal { tag: tag.clone() }),
            (Some(tag), Some(content)) => Some(EnumRepr::Adjacent {
                tag: tag.clone(),
                content: content.clone(),
            }),
            (None, Some(_)) => None,
        }
    }
}

/// Read `key = "x"` or the `serialize` half of `key(serialize = "x", ...)`
fn serialize_name(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse()?));
    }

    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            name = Some(inner.value()?.parse()?);
            Ok(())
        } else {
            skip_meta(&inner)
        }
    })?;
    Ok(name)
}

/// Consume an attribute argument we do not model
fn skip_meta(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}

/// Collect `///` comments into one doc string
pub fn doc_comment(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value()),
                _ => None,
            },
            _ => None,
        })
        .flat_map(|value| {
            // `#[doc = ""]` is a blank `///` line
            if value.is_empty() {
                return vec![String::new()];
            }
            value
                .lines()
                .map(|line| line.strip_prefix(' ').unwrap_or(line).trim_end().to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    let start = lines.iter().position(|l| !l.is_empty())?;
    let end = lines.iter().rposition(|l| !l.is_empty())?;
    Some(lines[start..=end].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use syn::parse_quote;

    #[test]
    fn test_rename_rules() {
        let rule = RenameRule::from_name("camelCase").unwrap();
        assert_eq!(rule.apply_to_field("created_at"), "createdAt");
        assert_eq!(rule.apply_to_variant("NotFound"), "notFound");

        let rule = RenameRule::from_name("SCREAMING-KEBAB-CASE").unwrap();
        assert_eq!(rule.apply_to_field("created_at"), "CREATED-AT");
        assert_eq!(rule.apply_to_variant("NotFound"), "NOT-FOUND");

        assert_eq!(RenameRule::Snake.apply_to_variant("NotFound"), "not_found");
        assert_eq!(RenameRule::Pascal.apply_to_field("created_at"), "CreatedAt");
        assert!(RenameRule::from_name("Title Case").is_none());
    }

    #[test]
    fn test_serde_attrs() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[derive(Serialize)]),
            parse_quote!(#[serde(rename = "Vec2", deny_unknown_fields)]),
            parse_quote!(#[serde(rename_all = "camelCase", default = "Point::origin")]),
        ];
        let serde = SerdeAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(serde.rename.as_deref(), Some("Vec2"));
        assert_eq!(serde.rename_all, Some(RenameRule::Camel));
        assert!(!serde.skip);
    }

    #[test]
    fn test_serialize_half_of_split_rename() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[serde(rename(serialize = "out", deserialize = "in"))]),
            parse_quote!(#[serde(skip_serializing, with = "my_module")]),
        ];
        let serde = SerdeAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(serde.rename.as_deref(), Some("out"));
        assert!(serde.skip);
    }

    #[test]
    fn test_enum_tagging_attrs() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(tag = "t", content = "c")])];
        let serde = SerdeAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(
            serde.enum_repr(),
            Some(EnumRepr::Adjacent {
                tag: "t".to_string(),
                content: "c".to_string()
            })
        );

        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(tag = "kind")])];
        let serde = SerdeAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(serde.enum_repr(), Some(EnumRepr::Internal { tag: "kind".to_string() }));

        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(untagged)])];
        let serde = SerdeAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(serde.enum_repr(), Some(EnumRepr::Untagged));

        assert_eq!(SerdeAttrs::default().enum_repr(), Some(EnumRepr::External));

        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(content = "c")])];
        let serde = SerdeAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(serde.enum_repr(), None);
    }

    #[test]
    fn test_flatten_attr() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(flatten)])];
        assert!(SerdeAttrs::from_attrs(&attrs).unwrap().flatten);
    }

    #[test]
    fn test_unknown_rename_all_rule() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(rename_all = "Train-Case")])];
        assert!(SerdeAttrs::from_attrs(&attrs).is_err());
    }

    #[test]
    fn test_doc_comment() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[doc = ""]),
            parse_quote!(#[doc = " A point in space."]),
            parse_quote!(#[doc = ""]),
            parse_quote!(#[doc = " Units are metres.  "]),
            parse_quote!(#[derive(Debug)]),
        ];
        assert_eq!(
            doc_comment(&attrs).as_deref(),
            Some("A point in space.\n\nUnits are metres.")
        );
        assert_eq!(doc_comment(&[]), None);
    }
}
