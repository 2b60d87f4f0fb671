use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta};

/// Derive macro describing the columns a sheet row is read from.
///
/// For each named field it records:
/// - the column header (respects `#[serde(rename = "...")]`)
/// - alternative headers from `#[serde(alias = "...")]`
/// - the value kind, from `#[column(kind = "...")]` (defaults to `"text"`)
/// - a description taken from the field's doc comments
///
/// Generates `COLUMNS: &[&str]` in declaration order and
/// `columns() -> &'static [ColumnSpec]`. `ColumnSpec` must be in scope.
#[proc_macro_derive(SheetColumns, attributes(serde, column))]
pub fn derive_sheet_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "SheetColumns needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "SheetColumns only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut columns = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let (rename, aliases) = get_serde_names(&field.attrs);
        let header = rename.unwrap_or_else(|| ident.to_string());
        let kind = match get_column_kind(&field.attrs) {
            Ok(kind) => kind.unwrap_or_else(|| "text".to_string()),
            Err(err) => return err.to_compile_error().into(),
        };
        let doc = get_doc_comment(&field.attrs);
        columns.push((header, aliases, kind, doc));
    }

    let headers = columns.iter().map(|(header, _, _, _)| header);
    let specs = columns.iter().map(|(header, aliases, kind, desc)| {
        quote! {
            ColumnSpec {
                name: #header,
                aliases: &[#(#aliases),*],
                kind: #kind,
                description: #desc,
            }
        }
    });

    let expanded = quote! {
        impl #name {
            pub const COLUMNS: &'static [&'static str] = &[#(#headers),*];

            pub fn columns() -> &'static [ColumnSpec] {
                static SPECS: &[ColumnSpec] = &[
                    #(#specs),*
                ];
                SPECS
            }
        }
    };

    TokenStream::from(expanded)
}

fn get_serde_names(attrs: &[syn::Attribute]) -> (Option<String>, Vec<String>) {
    let mut rename = None;
    let mut aliases = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        // Other serde keys (default, deserialize_with, ...) are skipped.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
            } else if meta.path.is_ident("alias") {
                let value: LitStr = meta.value()?.parse()?;
                aliases.push(value.value());
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }
    (rename, aliases)
}

fn get_column_kind(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut kind = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("column")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                let value: LitStr = meta.value()?.parse()?;
                kind = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported column attribute, expected `kind`"))
            }
        })?;
    }
    Ok(kind)
}

fn get_doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}
