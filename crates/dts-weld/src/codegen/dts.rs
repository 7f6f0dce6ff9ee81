//! TypeScript declaration (.d.ts) generator
//!
//! Renders a resolved [`DeclarationSet`] as a declaration artifact: header
//! lines, one block per type in resolver order, then one signature line per
//! function in input order.

use crate::codegen::render::{property_key, TypeRenderer};
use crate::codegen::DtsConfig;
use crate::error::GenerateResult;
use crate::ir::{
    AliasDecl, EnumDecl, EnumRepr, FunctionDecl, StructDecl, TypeDecl, TypeRef, VariantDecl,
    VariantShape,
};
use crate::policy;
use crate::resolve::DeclarationSet;
use tracing::debug;

/// Generator for .d.ts declaration files
pub struct DtsGenerator<'a> {
    set: &'a DeclarationSet<'a>,
    config: &'a DtsConfig,
    types: TypeRenderer<'a>,
}

impl<'a> DtsGenerator<'a> {
    /// Create a new generator for a resolved set
    pub fn new(set: &'a DeclarationSet<'a>, config: &'a DtsConfig) -> Self {
        Self {
            set,
            config,
            types: TypeRenderer::new(set.universe(), config),
        }
    }

    /// Generate the complete declaration artifact
    ///
    /// Collision and ordering checks run first; on failure no text is
    /// produced.
    pub fn generate(&self) -> GenerateResult<String> {
        policy::check(self.set)?;

        let mut output = String::new();

        for line in &self.config.header {
            output.push_str(line);
            output.push('\n');
        }

        let mut type_count = 0;
        for (_, decl) in self.set.types() {
            if type_count > 0 {
                output.push('\n');
            }
            output.push_str(&self.generate_type(decl));
            type_count += 1;
        }

        let functions = self.set.functions();
        if type_count > 0 && !functions.is_empty() {
            output.push('\n');
        }
        for function in functions {
            output.push_str(&self.generate_function(function));
        }

        debug!(
            "emitted {} type declarations and {} functions",
            type_count,
            functions.len()
        );
        Ok(output)
    }

    fn generate_type(&self, decl: &TypeDecl) -> String {
        match decl {
            TypeDecl::Struct(s) => self.generate_interface(s),
            TypeDecl::Enum(e) => self.generate_enum(e),
            TypeDecl::Alias(a) => self.generate_alias(a),
        }
    }

    /// Generate an interface from a StructDecl
    ///
    /// A struct with flattened fields has no interface form and becomes an
    /// intersection alias instead.
    fn generate_interface(&self, s: &StructDecl) -> String {
        let mut output = String::new();
        let name = s.rename.as_deref().unwrap_or(&s.id);

        if let Some(doc) = &s.doc {
            output.push_str(&doc_block(doc.lines().map(str::to_string), ""));
        }

        let flattened: Vec<String> = s
            .fields
            .iter()
            .filter(|f| f.flatten)
            .map(|f| self.types.render_flattened(&f.ty))
            .collect();
        let has_properties = s.fields.iter().any(|f| !f.flatten);

        if !has_properties && flattened.is_empty() {
            output.push_str(&format!(
                "{}interface {} {{}}\n",
                self.config.export_prefix(),
                name
            ));
            return output;
        }

        if !has_properties {
            output.push_str(&format!(
                "{}type {} = {};\n",
                self.config.export_prefix(),
                name,
                flattened.join(" & ")
            ));
            return output;
        }

        if flattened.is_empty() {
            output.push_str(&format!(
                "{}interface {} {{\n",
                self.config.export_prefix(),
                name
            ));
        } else {
            output.push_str(&format!(
                "{}type {} = {{\n",
                self.config.export_prefix(),
                name
            ));
        }

        let indent = " ".repeat(self.config.indent);
        for field in s.fields.iter().filter(|f| !f.flatten) {
            if let Some(doc) = &field.doc {
                output.push_str(&doc_block(doc.lines().map(str::to_string), &indent));
            }
            output.push_str(&format!("{}{};\n", indent, self.types.render_field(field)));
        }

        if flattened.is_empty() {
            output.push_str("}\n");
        } else {
            output.push_str(&format!("}} & {};\n", flattened.join(" & ")));
        }
        output
    }

    /// Generate a union type from an EnumDecl
    ///
    /// Each variant becomes one union member shaped by the enum's tagging.
    /// When any variant carries docs, members go one per line so each doc
    /// block sits above its member.
    fn generate_enum(&self, e: &EnumDecl) -> String {
        let mut output = String::new();
        let name = e.rename.as_deref().unwrap_or(&e.id);

        if let Some(doc) = &e.doc {
            output.push_str(&doc_block(doc.lines().map(str::to_string), ""));
        }

        let prefix = self.config.export_prefix();
        if e.variants.is_empty() {
            output.push_str(&format!("{}type {} = never;\n", prefix, name));
            return output;
        }

        let members: Vec<String> = e
            .variants
            .iter()
            .map(|v| self.variant_member(&e.repr, v))
            .collect();

        if e.variants.iter().all(|v| v.doc.is_none()) {
            output.push_str(&format!(
                "{}type {} = {};\n",
                prefix,
                name,
                members.join(" | ")
            ));
            return output;
        }

        output.push_str(&format!("{}type {} =\n", prefix, name));
        let indent = " ".repeat(self.config.indent);
        let last = members.len() - 1;
        for (i, (variant, member)) in e.variants.iter().zip(&members).enumerate() {
            if let Some(doc) = &variant.doc {
                output.push_str(&doc_block(doc.lines().map(str::to_string), &indent));
            }
            let end = if i == last { ";" } else { "" };
            output.push_str(&format!("{}| {}{}\n", indent, member, end));
        }
        output
    }

    /// Render one variant as a union member
    fn variant_member(&self, repr: &EnumRepr, v: &VariantDecl) -> String {
        let literal = format!("{:?}", v.name);
        let tuple = |elements: &[TypeRef]| {
            let elements: Vec<String> = elements.iter().map(|t| self.types.render(t)).collect();
            format!("[{}]", elements.join(", "))
        };

        match repr {
            EnumRepr::External => {
                let tag = property_key(&v.name);
                match &v.shape {
                    VariantShape::Unit => literal,
                    VariantShape::Newtype(ty) => {
                        format!("{{ {}: {} }}", tag, self.types.render(ty))
                    }
                    VariantShape::Tuple(elements) => {
                        format!("{{ {}: {} }}", tag, tuple(elements))
                    }
                    VariantShape::Struct(fields) => {
                        format!("{{ {}: {} }}", tag, self.types.render_object(&[], fields))
                    }
                }
            }
            EnumRepr::Internal { tag } => {
                let tag_property = format!("{}: {}", property_key(tag), literal);
                match &v.shape {
                    VariantShape::Unit => format!("{{ {} }}", tag_property),
                    VariantShape::Newtype(ty) => {
                        format!("({{ {} }} & {})", tag_property, self.types.render(ty))
                    }
                    // Rejected during validation
                    VariantShape::Tuple(elements) => {
                        format!("({{ {} }} & {})", tag_property, tuple(elements))
                    }
                    VariantShape::Struct(fields) => {
                        parenthesize(self.types.render_object(&[tag_property], fields))
                    }
                }
            }
            EnumRepr::Adjacent { tag, content } => {
                let tag_property = format!("{}: {}", property_key(tag), literal);
                let content = property_key(content);
                match &v.shape {
                    VariantShape::Unit => format!("{{ {} }}", tag_property),
                    VariantShape::Newtype(ty) => format!(
                        "{{ {}; {}: {} }}",
                        tag_property,
                        content,
                        self.types.render(ty)
                    ),
                    VariantShape::Tuple(elements) => format!(
                        "{{ {}; {}: {} }}",
                        tag_property,
                        content,
                        tuple(elements)
                    ),
                    VariantShape::Struct(fields) => format!(
                        "{{ {}; {}: {} }}",
                        tag_property,
                        content,
                        self.types.render_object(&[], fields)
                    ),
                }
            }
            EnumRepr::Untagged => match &v.shape {
                VariantShape::Unit => self.config.null_type.keyword().to_string(),
                VariantShape::Newtype(ty) => self.types.render(ty),
                VariantShape::Tuple(elements) => tuple(elements),
                VariantShape::Struct(fields) => {
                    parenthesize(self.types.render_object(&[], fields))
                }
            },
        }
    }

    fn generate_alias(&self, a: &AliasDecl) -> String {
        let mut output = String::new();
        let name = a.rename.as_deref().unwrap_or(&a.id);

        if let Some(doc) = &a.doc {
            output.push_str(&doc_block(doc.lines().map(str::to_string), ""));
        }

        output.push_str(&format!(
            "{}type {} = {};\n",
            self.config.export_prefix(),
            name,
            self.types.render(&a.target)
        ));
        output
    }

    /// Generate a function signature line
    fn generate_function(&self, f: &FunctionDecl) -> String {
        let mut output = String::new();

        let params: Vec<String> = f
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, self.types.render(&p.ty)))
            .collect();
        let return_type = self.types.render_return(&f.ret, f.synchrony);

        let mut doc_lines: Vec<String> = f
            .doc
            .as_deref()
            .map(|doc| doc.lines().map(str::to_string).collect())
            .unwrap_or_default();

        if self.config.jsdoc {
            for p in &f.params {
                let mut tag = format!("@param {{{}}} {}", self.types.render(&p.ty), p.name);
                if p.is_borrowed() {
                    tag.push_str(" - borrowed; the callee does not retain it");
                }
                doc_lines.push(tag);
            }
            if return_type != "void" {
                doc_lines.push(format!("@returns {{{}}}", return_type));
            }
        }

        if !doc_lines.is_empty() {
            output.push_str(&doc_block(doc_lines.into_iter(), ""));
        }

        output.push_str(&format!(
            "{}function {}({}): {};\n",
            self.config.export_prefix(),
            f.name,
            params.join(", "),
            return_type
        ));
        output
    }
}

/// Wrap an intersection so it stays one member inside a union
fn parenthesize(member: String) -> String {
    if member.contains(" & ") {
        format!("({})", member)
    } else {
        member
    }
}

/// Format lines as a `/** ... */` comment block
///
/// A `*/` inside the text would end the comment early, so it is written
/// as `*\/`.
fn doc_block(lines: impl Iterator<Item = String>, indent: &str) -> String {
    let mut output = format!("{}/**\n", indent);
    for line in lines {
        let line = line.trim_end().replace("*/", "*\\/");
        if line.is_empty() {
            output.push_str(&format!("{} *\n", indent));
        } else {
            output.push_str(&format!("{} * {}\n", indent, line));
        }
    }
    output.push_str(&format!("{} */\n", indent));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::NullType;
    use crate::ir::{AliasDecl, FieldDecl, ParamDecl, PrimitiveKind, TypeUniverse};
    use crate::resolve::resolve;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn emit(types: Vec<TypeDecl>, functions: Vec<FunctionDecl>, config: &DtsConfig) -> String {
        let universe = TypeUniverse::new(types).unwrap();
        let set = resolve(&universe, &functions).unwrap();
        DtsGenerator::new(&set, config).generate().unwrap()
    }

    fn union(name: &str, members: &[&str]) -> String {
        format!("export type {} = {};\n", name, members.join(" | "))
    }

    fn point() -> TypeDecl {
        StructDecl::new("Point")
            .field(FieldDecl::new("x", TypeRef::f64()))
            .field(FieldDecl::new("y", TypeRef::f64()))
            .into()
    }

    #[test]
    fn test_interface_and_functions() {
        let output = emit(
            vec![point()],
            vec![
                FunctionDecl::new("consume")
                    .param(ParamDecl::new("point", TypeRef::named("Point"))),
                FunctionDecl::new("into_js").returns(TypeRef::named("Point")),
                FunctionDecl::new("vector_into_js")
                    .returns(TypeRef::vector(TypeRef::named("Point"))),
                FunctionDecl::new("accept_point_ref_async")
                    .async_fn()
                    .param(ParamDecl::borrowed("point", TypeRef::named("Point"))),
            ],
            &DtsConfig::default(),
        );

        assert_eq!(
            output,
            indoc! {"
                /* tslint:disable */
                /* eslint-disable */
                export interface Point {
                    x: number;
                    y: number;
                }

                export function consume(point: Point): void;
                export function into_js(): Point;
                export function vector_into_js(): Point[];
                export function accept_point_ref_async(point: Point): Promise<void>;
            "}
        );
    }

    #[test]
    fn test_docs_and_empty_struct() {
        let output = emit(
            vec![
                StructDecl::new("Empty").exported().into(),
                StructDecl::new("Labelled")
                    .field(FieldDecl::new("label", TypeRef::string()).with_doc("Display label"))
                    .with_doc("A labelled thing\n\nwith two paragraphs")
                    .exported()
                    .into(),
            ],
            vec![],
            &DtsConfig::default().header(Vec::<String>::new()).indent(2),
        );

        assert_eq!(
            output,
            indoc! {"
                export interface Empty {}

                /**
                 * A labelled thing
                 *
                 * with two paragraphs
                 */
                export interface Labelled {
                  /**
                   * Display label
                   */
                  label: string;
                }
            "}
        );
    }

    #[test]
    fn test_enum_union() {
        let output = emit(
            vec![
                StructDecl::new("Foo").into(),
                EnumDecl::new("External")
                    .variant(VariantDecl::new(
                        "Struct",
                        VariantShape::Struct(vec![
                            FieldDecl::new("x", TypeRef::string()),
                            FieldDecl::new("y", TypeRef::primitive(PrimitiveKind::I32)),
                        ]),
                    ))
                    .variant(VariantDecl::new("EmptyStruct", VariantShape::Struct(vec![])))
                    .variant(VariantDecl::new(
                        "Tuple",
                        VariantShape::Tuple(vec![
                            TypeRef::primitive(PrimitiveKind::I32),
                            TypeRef::string(),
                        ]),
                    ))
                    .variant(VariantDecl::new(
                        "Newtype",
                        VariantShape::Newtype(TypeRef::named("Foo")),
                    ))
                    .variant(VariantDecl::unit("Unit"))
                    .exported()
                    .into(),
                EnumDecl::new("Void").exported().into(),
            ],
            vec![],
            &DtsConfig::default().header(Vec::<String>::new()),
        );

        let external = union(
            "External",
            &[
                "{ Struct: { x: string; y: number } }",
                "{ EmptyStruct: {} }",
                "{ Tuple: [number, string] }",
                "{ Newtype: Foo }",
                r#""Unit""#,
            ],
        );
        assert_eq!(
            output,
            format!(
                "export interface Foo {{}}\n\n{}\nexport type Void = never;\n",
                external
            )
        );
    }

    /// All variant shapes, for exercising each tagging form
    fn shapes(id: &str, repr: EnumRepr, tuples: bool) -> TypeDecl {
        let mut decl = EnumDecl::new(id)
            .with_repr(repr)
            .variant(VariantDecl::new(
                "Struct",
                VariantShape::Struct(vec![
                    FieldDecl::new("x", TypeRef::string()),
                    FieldDecl::new("y", TypeRef::primitive(PrimitiveKind::I32)),
                ]),
            ))
            .variant(VariantDecl::new("EmptyStruct", VariantShape::Struct(vec![])));
        if tuples {
            decl = decl
                .variant(VariantDecl::new(
                    "Tuple",
                    VariantShape::Tuple(vec![
                        TypeRef::primitive(PrimitiveKind::I32),
                        TypeRef::string(),
                    ]),
                ))
                .variant(VariantDecl::new("EmptyTuple", VariantShape::Tuple(vec![])));
        }
        decl.variant(VariantDecl::new("Newtype", VariantShape::Newtype(TypeRef::named("Foo"))))
            .variant(VariantDecl::unit("Unit"))
            .exported()
            .into()
    }

    #[test]
    fn test_internally_tagged_enum() {
        let internal = EnumRepr::Internal { tag: "t".to_string() };
        let output = emit(
            vec![StructDecl::new("Foo").into(), shapes("Internal", internal, false)],
            vec![],
            &DtsConfig::default().header(Vec::<String>::new()),
        );

        assert!(output.contains(&union(
            "Internal",
            &[
                r#"{ t: "Struct"; x: string; y: number }"#,
                r#"{ t: "EmptyStruct" }"#,
                r#"({ t: "Newtype" } & Foo)"#,
                r#"{ t: "Unit" }"#,
            ],
        )));
    }

    #[test]
    fn test_adjacently_tagged_enum() {
        let adjacent = EnumRepr::Adjacent {
            tag: "t".to_string(),
            content: "c".to_string(),
        };
        let output = emit(
            vec![StructDecl::new("Foo").into(), shapes("Adjacent", adjacent, true)],
            vec![],
            &DtsConfig::default().header(Vec::<String>::new()),
        );

        assert!(output.contains(&union(
            "Adjacent",
            &[
                r#"{ t: "Struct"; c: { x: string; y: number } }"#,
                r#"{ t: "EmptyStruct"; c: {} }"#,
                r#"{ t: "Tuple"; c: [number, string] }"#,
                r#"{ t: "EmptyTuple"; c: [] }"#,
                r#"{ t: "Newtype"; c: Foo }"#,
                r#"{ t: "Unit" }"#,
            ],
        )));
    }

    #[test]
    fn test_untagged_enum() {
        let output = emit(
            vec![StructDecl::new("Foo").into(), shapes("Untagged", EnumRepr::Untagged, true)],
            vec![],
            &DtsConfig::default().header(Vec::<String>::new()),
        );
        assert!(output.contains(&union(
            "Untagged",
            &["{ x: string; y: number }", "{}", "[number, string]", "[]", "Foo", "null"],
        )));

        let output = emit(
            vec![StructDecl::new("Foo").into(), shapes("Untagged", EnumRepr::Untagged, false)],
            vec![],
            &DtsConfig::default()
                .header(Vec::<String>::new())
                .null_type(NullType::Undefined),
        );
        assert!(output.contains(" | Foo | undefined;\n"));
    }

    #[test]
    fn test_flattened_fields_become_intersections() {
        let output = emit(
            vec![
                StructDecl::new("A").field(FieldDecl::new("a", TypeRef::string())).into(),
                StructDecl::new("C").field(FieldDecl::new("z", TypeRef::bool())).into(),
                StructDecl::new("B")
                    .field(FieldDecl::new("c", TypeRef::f64()))
                    .field(FieldDecl::new("a", TypeRef::named("A")).flattened())
                    .field(
                        FieldDecl::new("extra", TypeRef::option(TypeRef::named("C"))).flattened(),
                    )
                    .exported()
                    .into(),
                StructDecl::new("Only")
                    .field(FieldDecl::new("a", TypeRef::named("A")).flattened())
                    .exported()
                    .into(),
                EnumDecl::new("Wrapped")
                    .variant(VariantDecl::new(
                        "V",
                        VariantShape::Struct(vec![
                            FieldDecl::new("c", TypeRef::f64()),
                            FieldDecl::new("a", TypeRef::named("A")).flattened(),
                        ]),
                    ))
                    .exported()
                    .into(),
            ],
            vec![],
            &DtsConfig::default().header(Vec::<String>::new()),
        );

        assert_eq!(
            output,
            indoc! {"
                export interface A {
                    a: string;
                }

                export interface C {
                    z: boolean;
                }

                export type B = {
                    c: number;
                } & A & (C | {});

                export type Only = A;

                export type Wrapped = { V: { c: number } & A };
            "}
        );
    }

    #[test]
    fn test_variant_docs_split_the_union() {
        let output = emit(
            vec![EnumDecl::new("Status")
                .variant(VariantDecl::unit("Active").with_doc("Currently running"))
                .variant(VariantDecl::new("Failed", VariantShape::Newtype(TypeRef::string())))
                .exported()
                .into()],
            vec![],
            &DtsConfig::default().header(Vec::<String>::new()),
        );

        assert_eq!(
            output,
            indoc! {r#"
                export type Status =
                    /**
                     * Currently running
                     */
                    | "Active"
                    | { Failed: string };
            "#}
        );
    }

    #[test]
    fn test_comment_terminator_in_docs_is_escaped() {
        let output = emit(
            vec![StructDecl::new("Point")
                .field(FieldDecl::new("x", TypeRef::f64()).with_doc("x */ y"))
                .with_doc("Ends early */ export const x = 1;")
                .exported()
                .into()],
            vec![],
            &DtsConfig::default().header(Vec::<String>::new()),
        );

        assert_eq!(
            output,
            indoc! {r#"
                /**
                 * Ends early *\/ export const x = 1;
                 */
                export interface Point {
                    /**
                     * x *\/ y
                     */
                    x: number;
                }
            "#}
        );
        for line in output.lines().filter(|line| line.contains("*/")) {
            assert_eq!(line.trim(), "*/");
        }
    }

    #[test]
    fn test_alias_and_declare_mode() {
        let output = emit(
            vec![AliasDecl::new("Meters", TypeRef::f64()).exported().into()],
            vec![FunctionDecl::new("measure").returns(TypeRef::named("Meters"))],
            &DtsConfig::default().header(Vec::<String>::new()).export(false),
        );

        assert_eq!(
            output,
            indoc! {"
                declare type Meters = number;

                declare function measure(): Meters;
            "}
        );
    }

    #[test]
    fn test_jsdoc_tags_note_borrowed_params() {
        let output = emit(
            vec![point()],
            vec![FunctionDecl::new("return_point")
                .param(ParamDecl::borrowed("point", TypeRef::named("Point")))
                .returns(TypeRef::named("Point"))
                .with_doc("Echo a point")],
            &DtsConfig::default().header(Vec::<String>::new()).jsdoc(true),
        );

        assert!(output.contains(indoc! {"
            /**
             * Echo a point
             * @param {Point} point - borrowed; the callee does not retain it
             * @returns {Point}
             */
            export function return_point(point: Point): Point;
        "}));
    }

    #[test]
    fn test_ownership_does_not_change_signature() {
        let owned = emit(
            vec![point()],
            vec![FunctionDecl::new("f").param(ParamDecl::new("point", TypeRef::named("Point")))],
            &DtsConfig::default(),
        );
        let borrowed = emit(
            vec![point()],
            vec![FunctionDecl::new("f")
                .param(ParamDecl::borrowed("point", TypeRef::named("Point")))],
            &DtsConfig::default(),
        );
        assert_eq!(owned, borrowed);
    }

    #[test]
    fn test_collision_produces_no_text() {
        let universe = TypeUniverse::new(vec![point()]).unwrap();
        let functions = vec![
            FunctionDecl::new("Point").param(ParamDecl::new("p", TypeRef::named("Point"))),
        ];
        let set = resolve(&universe, &functions).unwrap();
        let config = DtsConfig::default();

        assert!(DtsGenerator::new(&set, &config).generate().is_err());
    }
}
